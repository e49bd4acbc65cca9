//! Lane-Parsing: Lane-Offset, Lane-Sections, Lanes und Fahrbahnmarkierungen.

use super::ParseContext;
use crate::core::{
    Lane, LaneChange, LaneSection, LaneSide, LaneType, Road, RoadMark, RoadMarkColor,
    RoadMarkType, RoadMarkWeight,
};
use crate::xml::attributes::{required, required_f64, required_str};
use crate::xml::dom::XmlElement;
use crate::xml::error::{AtElement, ParseError};

const LANE_GROUPS: [LaneSide; 3] = [LaneSide::Left, LaneSide::Center, LaneSide::Right];

pub(super) fn parse_road_lanes(
    ctx: &mut ParseContext<'_>,
    road_element: &XmlElement,
    road: &mut Road,
) -> Result<(), ParseError> {
    let lanes_element = road_element
        .first_child("lanes")
        .ok_or_else(|| ParseError::fatal(road_element, "Tag lanes fehlt"))?;

    for offset in lanes_element.children_named("laneOffset") {
        let s = ctx.optional_f64(offset, "s", 0.0);
        let a = ctx.optional_f64(offset, "a", 0.0);
        let b = ctx.optional_f64(offset, "b", 0.0);
        let c = ctx.optional_f64(offset, "c", 0.0);
        let d = ctx.optional_f64(offset, "d", 0.0);
        road.add_lane_offset(s, a, b, c, d).at(offset)?;
    }

    if lanes_element.first_child("laneSection").is_none() {
        return Err(ParseError::fatal(lanes_element, "Tag laneSection fehlt"));
    }

    for section_element in lanes_element.children_named("laneSection") {
        let start = required_f64(section_element, "s")?;
        let section = road.add_lane_section(start).at(section_element)?;

        for side in LANE_GROUPS {
            if let Some(group) = section_element.first_child(side.tag()) {
                parse_lanes(ctx, group, side, section)?;
            }
        }

        if ctx.options.require_contiguous_lane_ids {
            section.validate_lane_ids().at(section_element)?;
        }
        log::debug!(
            "Lane-Section s={}: Lanes {:?}",
            section.start,
            section.lane_ids()
        );
    }
    Ok(())
}

fn parse_lanes(
    ctx: &mut ParseContext<'_>,
    group: &XmlElement,
    side: LaneSide,
    section: &mut LaneSection,
) -> Result<(), ParseError> {
    for lane_element in group.children_named("lane") {
        let id: i32 = required(lane_element, "id")?;
        let type_str = required_str(lane_element, "type")?;
        let lane_type = LaneType::from_xml_str(type_str).ok_or_else(|| {
            ParseError::fatal(lane_element, format!("Unbekannter Lane-Typ '{}'", type_str))
        })?;

        if LaneSide::of_lane(id) != side {
            ctx.warn(ParseError::recoverable(
                lane_element,
                format!("Lane {} liegt nicht in Gruppe <{}>", id, side.tag()),
            ));
        }

        let lane = section.add_lane(Lane::new(id, lane_type)).at(lane_element)?;

        if id != 0 {
            parse_lane_geometry(lane_element, lane)?;
        }
        parse_lane_links(lane_element, lane)?;
        parse_road_marks(ctx, lane_element, lane);

        log::debug!(
            "Lane {} ({:?}): {} Breiten, {} Raender, {} Markierungen",
            id,
            lane.lane_type,
            lane.widths().len(),
            lane.borders().len(),
            lane.road_marks().len()
        );
    }
    Ok(())
}

/// Breite zuerst, sonst Rand. Eine Lane ohne beides ist ungültig.
fn parse_lane_geometry(lane_element: &XmlElement, lane: &mut Lane) -> Result<(), ParseError> {
    let tag = if lane_element.first_child("width").is_some() {
        "width"
    } else if lane_element.first_child("border").is_some() {
        "border"
    } else {
        return Err(ParseError::fatal(
            lane_element,
            format!("Lane {} hat weder width noch border", lane.id),
        ));
    };

    for record in lane_element.children_named(tag) {
        let s_offset = required_f64(record, "sOffset")?;
        let a = required_f64(record, "a")?;
        let b = required_f64(record, "b")?;
        let c = required_f64(record, "c")?;
        let d = required_f64(record, "d")?;
        if tag == "width" {
            lane.add_width(s_offset, a, b, c, d).at(record)?;
        } else {
            lane.add_border(s_offset, a, b, c, d).at(record)?;
        }
    }
    Ok(())
}

fn parse_lane_links(lane_element: &XmlElement, lane: &mut Lane) -> Result<(), ParseError> {
    let Some(link) = lane_element.first_child("link") else {
        return Ok(());
    };

    for predecessor in link.children_named("predecessor") {
        let id: i32 = required(predecessor, "id")?;
        lane.set_predecessor(id).at(predecessor)?;
    }
    for successor in link.children_named("successor") {
        let id: i32 = required(successor, "id")?;
        lane.set_successor(id).at(successor)?;
    }
    Ok(())
}

fn parse_road_marks(ctx: &mut ParseContext<'_>, lane_element: &XmlElement, lane: &mut Lane) {
    let side = lane.side();
    for mark_element in lane_element.children_named("roadMark") {
        let mut mark = RoadMark::new(ctx.optional_f64(mark_element, "sOffset", 0.0), side);

        mark.mark_type = ctx.defaulted_enum(
            mark_element,
            "type",
            RoadMarkType::None,
            RoadMarkType::Undefined,
            RoadMarkType::from_xml_str,
        );
        mark.color = ctx.defaulted_enum(
            mark_element,
            "color",
            RoadMarkColor::White,
            RoadMarkColor::Undefined,
            RoadMarkColor::from_xml_str,
        );
        mark.weight = ctx.defaulted_enum(
            mark_element,
            "weight",
            RoadMarkWeight::Standard,
            RoadMarkWeight::Undefined,
            RoadMarkWeight::from_xml_str,
        );
        mark.lane_change = ctx.optional_enum(
            mark_element,
            "laneChange",
            LaneChange::Undefined,
            LaneChange::from_xml_str,
        );

        lane.add_road_mark(mark);
    }
}
