//! Junction-Parsing: Connections, Lane-Links und Vorfahrtsregeln.

use crate::core::{ContactPoint, Junction, Priority, Scenery};
use crate::xml::attributes::{required, required_str};
use crate::xml::dom::XmlElement;
use crate::xml::error::ParseError;

pub(super) fn parse_junctions(root: &XmlElement, scenery: &mut Scenery) -> Result<(), ParseError> {
    for junction_element in root.children_named("junction") {
        let id = required_str(junction_element, "id")?;
        let Some(junction) = scenery.add_junction(id) else {
            return Err(ParseError::fatal(
                junction_element,
                format!("Junction-ID {} ist nicht eindeutig", id),
            ));
        };

        parse_connections(junction_element, junction)?;
        parse_priorities(junction_element, junction)?;

        log::debug!(
            "Junction {}: {} Connections, {} Prioritaeten",
            id,
            junction.connection_count(),
            junction.priorities().len()
        );
    }
    Ok(())
}

fn parse_connections(junction_element: &XmlElement, junction: &mut Junction) -> Result<(), ParseError> {
    if junction_element.first_child("connection").is_none() {
        return Err(ParseError::fatal(junction_element, "Tag connection fehlt"));
    }

    for connection_element in junction_element.children_named("connection") {
        let id = required_str(connection_element, "id")?;
        let incoming_road = required_str(connection_element, "incomingRoad")?;
        let connecting_road = required_str(connection_element, "connectingRoad")?;
        let contact_point_str = required_str(connection_element, "contactPoint")?;
        let contact_point = ContactPoint::from_xml_str(contact_point_str).ok_or_else(|| {
            ParseError::fatal(
                connection_element,
                format!("Ungueltiger contactPoint '{}'", contact_point_str),
            )
        })?;

        let Some(connection) =
            junction.add_connection(id, incoming_road, connecting_road, contact_point)
        else {
            return Err(ParseError::fatal(
                connection_element,
                format!("Connection-ID {} ist nicht eindeutig", id),
            ));
        };

        for link_element in connection_element.children_named("laneLink") {
            let from: i32 = required(link_element, "from")?;
            let to: i32 = required(link_element, "to")?;
            connection.add_link(from, to);
        }
    }
    Ok(())
}

fn parse_priorities(junction_element: &XmlElement, junction: &mut Junction) -> Result<(), ParseError> {
    for priority_element in junction_element.children_named("priority") {
        let high = required_str(priority_element, "high")?;
        let low = required_str(priority_element, "low")?;
        junction.add_priority(Priority {
            high: high.to_string(),
            low: low.to_string(),
        });
    }
    Ok(())
}
