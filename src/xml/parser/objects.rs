//! Objekt-Parsing inklusive `<repeat>`-Expansion und `<validity>`.

use super::ParseContext;
use crate::core::{
    Interval, ObjectRepeat, Road, RoadElementOrientation, RoadElementValidity,
    RoadObjectSpecification, RoadObjectType,
};
use crate::xml::attributes::{optional, optional_str, required, required_f64, required_str};
use crate::xml::dom::XmlElement;
use crate::xml::error::ParseError;

pub(super) fn parse_objects(
    ctx: &mut ParseContext<'_>,
    road_element: &XmlElement,
    road: &mut Road,
) -> Result<(), ParseError> {
    let Some(objects_element) = road_element.first_child("objects") else {
        return Ok(());
    };

    for object_element in objects_element.children_named("object") {
        let mut object = parse_object(ctx, object_element)?;
        if !object.check_standard_compliance() {
            return Err(ParseError::fatal(
                object_element,
                format!("Objekt {} verletzt die OpenDRIVE-Wertebereiche", object.id),
            ));
        }
        object.convert_radius();

        // Wiederholungen nur für Objekte, die der Simulator übernimmt
        if !object.check_simulator_compliance(&ctx.options.simulator_limits) {
            reject(ctx, object_element, &object);
            continue;
        }

        let repeats: Vec<_> = object_element.children_named("repeat").collect();
        if repeats.is_empty() {
            road.add_road_object(object);
            continue;
        }

        for repeat_element in repeats {
            let repeat = parse_repeat(repeat_element, ctx.options.max_repeat_instances)?;
            let instances = repeat.expand(&object);
            log::debug!(
                "Objekt {}: repeat s={} length={} distance={} -> {} Instanzen",
                object.id,
                repeat.s,
                repeat.length,
                repeat.distance,
                instances.len()
            );
            for instance in instances {
                if !instance.check_standard_compliance() {
                    return Err(ParseError::fatal(
                        repeat_element,
                        format!(
                            "Wiederholtes Objekt {} bei s={} verletzt die OpenDRIVE-Wertebereiche",
                            instance.id, instance.s
                        ),
                    ));
                }
                if instance.check_simulator_compliance(&ctx.options.simulator_limits) {
                    road.add_road_object(instance);
                } else {
                    reject(ctx, repeat_element, &instance);
                }
            }
        }
    }
    Ok(())
}

fn reject(ctx: &mut ParseContext<'_>, element: &XmlElement, object: &RoadObjectSpecification) {
    ctx.warn(ParseError::recoverable(
        element,
        format!(
            "Objekt {} bei s={} wird verworfen: vom Simulator nicht unterstuetzt (width={}, length={}, height={})",
            object.id, object.s, object.width, object.length, object.height
        ),
    ));
}

fn parse_object(
    ctx: &mut ParseContext<'_>,
    element: &XmlElement,
) -> Result<RoadObjectSpecification, ParseError> {
    Ok(RoadObjectSpecification {
        id: required_str(element, "id")?.to_string(),
        s: required_f64(element, "s")?,
        t: required_f64(element, "t")?,
        z_offset: required_f64(element, "zOffset")?,
        object_type: ctx.optional_enum(
            element,
            "type",
            RoadObjectType::None,
            RoadObjectType::from_xml_str,
        ),
        name: optional_str(element, "name", "").to_string(),
        valid_length: ctx.optional_f64(element, "validLength", 0.0),
        orientation: ctx.optional_enum(
            element,
            "orientation",
            RoadElementOrientation::default(),
            RoadElementOrientation::from_xml_str,
        ),
        width: ctx.optional_f64(element, "width", 0.0),
        length: ctx.optional_f64(element, "length", 0.0),
        height: ctx.optional_f64(element, "height", 0.0),
        radius: ctx.optional_f64(element, "radius", 0.0),
        hdg: ctx.optional_f64(element, "hdg", 0.0),
        pitch: ctx.optional_f64(element, "pitch", 0.0),
        roll: ctx.optional_f64(element, "roll", 0.0),
        continuous: false,
        validity: parse_validity(element)?,
    })
}

/// `<validity>` eines Objekts oder Signals; fehlt es, gilt das Element für alle Lanes.
pub(super) fn parse_validity(element: &XmlElement) -> Result<RoadElementValidity, ParseError> {
    let Some(validity) = element.first_child("validity") else {
        return Ok(RoadElementValidity::All);
    };
    let from_lane: i32 = required(validity, "fromLane")?;
    let to_lane: i32 = required(validity, "toLane")?;
    Ok(RoadElementValidity::from_range(from_lane, to_lane))
}

/// `max_instances` begrenzt die Anzahl der erzeugten Objekte.
pub(super) fn parse_repeat(
    element: &XmlElement,
    max_instances: usize,
) -> Result<ObjectRepeat, ParseError> {
    let repeat = ObjectRepeat {
        s: required_f64(element, "s")?,
        length: required_f64(element, "length")?,
        distance: required_f64(element, "distance")?,
        t: parse_interval(element, "tStart", "tEnd")?,
        width: parse_interval(element, "widthStart", "widthEnd")?,
        height: parse_interval(element, "heightStart", "heightEnd")?,
        z_offset: parse_interval(element, "zOffsetStart", "zOffsetEnd")?,
    };
    if !repeat.check_limits() {
        return Err(ParseError::fatal(
            element,
            "repeat: s, length und distance muessen >= 0 sein",
        ));
    }
    let count = repeat.instance_count();
    if count > max_instances {
        return Err(ParseError::fatal(
            element,
            format!(
                "repeat erzeugt {} Objekte, erlaubt sind hoechstens {}",
                count, max_instances
            ),
        ));
    }
    Ok(repeat)
}

/// Start/End-Paar; nur eine der beiden Grenzen ist ein fataler Fehler.
pub(super) fn parse_interval(
    element: &XmlElement,
    start_key: &str,
    end_key: &str,
) -> Result<Option<Interval>, ParseError> {
    let start = optional::<f64>(element, start_key).map_err(ParseError::into_fatal)?;
    let end = optional::<f64>(element, end_key).map_err(ParseError::into_fatal)?;
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) if start.is_finite() && end.is_finite() => {
            Ok(Some(Interval { start, end }))
        }
        (Some(_), Some(_)) => Err(ParseError::fatal(
            element,
            format!("{}/{} muessen endliche Zahlen sein", start_key, end_key),
        )),
        _ => Err(ParseError::fatal(
            element,
            format!("{} und {} muessen gemeinsam angegeben werden", start_key, end_key),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::MAX_REPEAT_INSTANCES;
    use crate::xml::dom::parse_document;

    #[test]
    fn test_validity_range_and_default() {
        let with = parse_document("<object><validity fromLane=\"1\" toLane=\"-2\"/></object>").unwrap();
        assert_eq!(
            parse_validity(&with).unwrap(),
            RoadElementValidity::Lanes(-2..=1)
        );

        let without = parse_document("<object/>").unwrap();
        assert_eq!(parse_validity(&without).unwrap(), RoadElementValidity::All);
    }

    #[test]
    fn test_interval_requires_both_bounds() {
        let e = parse_document("<repeat s=\"0\" length=\"10\" distance=\"2\" tStart=\"1\"/>").unwrap();
        let err = parse_interval(&e, "tStart", "tEnd").unwrap_err();
        assert!(err.is_fatal());
        assert!(parse_repeat(&e, MAX_REPEAT_INSTANCES).is_err());

        let e = parse_document("<repeat widthStart=\"1\" widthEnd=\"3\"/>").unwrap();
        assert_eq!(
            parse_interval(&e, "widthStart", "widthEnd").unwrap(),
            Some(Interval { start: 1.0, end: 3.0 })
        );
    }

    #[test]
    fn test_repeat_with_negative_distance_is_fatal() {
        let e = parse_document("<repeat s=\"0\" length=\"10\" distance=\"-1\"/>").unwrap();
        assert!(parse_repeat(&e, MAX_REPEAT_INSTANCES).unwrap_err().is_fatal());
    }

    #[test]
    fn test_repeat_instance_count_is_limited() {
        let e = parse_document("<repeat s=\"0\" length=\"1e9\" distance=\"0.001\"/>").unwrap();
        let err = parse_repeat(&e, MAX_REPEAT_INSTANCES).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.message.contains("hoechstens"));

        let e = parse_document("<repeat s=\"0\" length=\"10\" distance=\"2\"/>").unwrap();
        assert!(parse_repeat(&e, 5).is_ok());
        assert!(parse_repeat(&e, 4).is_err());
    }
}
