//! Signal-Parsing (`<signals>/<signal>`).

use super::objects::parse_validity;
use super::ParseContext;
use crate::core::{Road, RoadSignalSpecification, RoadSignalUnit};
use crate::xml::attributes::{optional_str, required_f64, required_str};
use crate::xml::dom::XmlElement;
use crate::xml::error::ParseError;

pub(super) fn parse_signals(
    ctx: &mut ParseContext<'_>,
    road_element: &XmlElement,
    road: &mut Road,
) -> Result<(), ParseError> {
    let Some(signals_element) = road_element.first_child("signals") else {
        return Ok(());
    };

    for signal_element in signals_element.children_named("signal") {
        let signal = parse_signal(ctx, signal_element)?;
        if !signal.check_boundaries() {
            return Err(ParseError::fatal(
                signal_element,
                format!("Signal {} verletzt die zulaessigen Wertebereiche", signal.id),
            ));
        }
        log::debug!(
            "Signal {} ({} {}) bei s={}",
            signal.id,
            signal.signal_type,
            signal.subtype,
            signal.s
        );
        road.add_road_signal(signal);
    }
    Ok(())
}

fn parse_signal(
    ctx: &mut ParseContext<'_>,
    element: &XmlElement,
) -> Result<RoadSignalSpecification, ParseError> {
    let unit_str = optional_str(element, "unit", "");
    let unit = RoadSignalUnit::from_xml_str(unit_str).ok_or_else(|| {
        ParseError::fatal(element, format!("Unbekannte Einheit '{}'", unit_str))
    })?;

    let dependency_ids = element
        .children_named("dependency")
        .map(|dependency| required_str(dependency, "id").map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RoadSignalSpecification {
        s: required_f64(element, "s")?,
        t: required_f64(element, "t")?,
        z_offset: required_f64(element, "zOffset")?,
        id: required_str(element, "id")?.to_string(),
        orientation: required_str(element, "orientation")?.to_string(),
        signal_type: required_str(element, "type")?.to_string(),
        subtype: required_str(element, "subtype")?.to_string(),
        dynamic: optional_str(element, "dynamic", "no").to_string(),
        name: optional_str(element, "name", "").to_string(),
        country: optional_str(element, "country", "").to_string(),
        text: optional_str(element, "text", "").to_string(),
        value: ctx.optional_f64(element, "value", 0.0),
        unit,
        h_offset: ctx.optional_f64(element, "hOffset", 0.0),
        pitch: ctx.optional_f64(element, "pitch", 0.0),
        roll: ctx.optional_f64(element, "roll", 0.0),
        height: ctx.optional_f64(element, "height", 0.0),
        width: ctx.optional_f64(element, "width", 0.0),
        validity: parse_validity(element)?,
        dependency_ids,
    })
}
