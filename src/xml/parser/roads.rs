//! Straßen-Parsing: Kopf, Referenzlinie, Höhenprofil, Links und Straßentypen.

use road_geometry::{CubicPolynomial, ParamPoly3Parameters, ParamRange, RoadGeometry};

use super::{lanes, objects, signals, ParseContext};
use crate::core::{
    ContactPoint, LinkKind, Road, RoadLink, RoadLinkElementType, RoadTypeInformation,
    RoadTypeSpecification, Scenery, NO_JUNCTION,
};
use crate::xml::attributes::{optional_str, required_f64, required_str};
use crate::xml::dom::XmlElement;
use crate::xml::error::{AtElement, ParseError};

/// Reihenfolge, in der die Geometrie-Typen gesucht werden
const GEOMETRY_TAGS: [&str; 5] = ["line", "arc", "spiral", "poly3", "paramPoly3"];

/// Erlaubter Versatz zwischen Segmentende und nächstem Segmentanfang (nach Rundung)
const GEOMETRY_GAP_TOLERANCE: f64 = 2e-3;

pub(super) fn parse_roads(
    ctx: &mut ParseContext<'_>,
    root: &XmlElement,
    scenery: &mut Scenery,
) -> Result<(), ParseError> {
    if root.first_child("road").is_none() {
        return Err(ParseError::fatal(root, "Tag road fehlt"));
    }

    for road_element in root.children_named("road") {
        let id = required_str(road_element, "id")?;
        let Some(road) = scenery.add_road(id) else {
            return Err(ParseError::fatal(
                road_element,
                format!("Straße {} konnte nicht angelegt werden: ID bereits vergeben", id),
            ));
        };
        road.set_junction_id(optional_str(road_element, "junction", NO_JUNCTION));
        log::debug!("Straße {} (junction {})", id, road.junction_id());

        parse_geometries(ctx, road_element, road)?;
        parse_elevation_profile(ctx, road_element, road)?;
        parse_road_links(road_element, road)?;
        lanes::parse_road_lanes(ctx, road_element, road)?;
        objects::parse_objects(ctx, road_element, road)?;
        signals::parse_signals(ctx, road_element, road)?;
        parse_road_types(road_element, road)?;
    }
    Ok(())
}

fn read_cubic(element: &XmlElement, keys: [&str; 4]) -> Result<CubicPolynomial, ParseError> {
    Ok(CubicPolynomial::new(
        required_f64(element, keys[0])?,
        required_f64(element, keys[1])?,
        required_f64(element, keys[2])?,
        required_f64(element, keys[3])?,
    ))
}

fn parse_geometries(
    ctx: &mut ParseContext<'_>,
    road_element: &XmlElement,
    road: &mut Road,
) -> Result<(), ParseError> {
    let plan_view = road_element
        .first_child("planView")
        .ok_or_else(|| ParseError::fatal(road_element, "Tag planView fehlt"))?;
    if plan_view.first_child("geometry").is_none() {
        return Err(ParseError::fatal(plan_view, "Tag geometry fehlt"));
    }

    let options = ctx.options;
    for header in plan_view.children_named("geometry") {
        let s = options.round_position(required_f64(header, "s")?);
        let x = options.round_position(required_f64(header, "x")?);
        let y = options.round_position(required_f64(header, "y")?);
        let hdg = options.round_heading(required_f64(header, "hdg")?);
        let length = options.round_position(required_f64(header, "length")?);

        let Some(shape) = GEOMETRY_TAGS
            .iter()
            .find_map(|tag| header.first_child(tag))
        else {
            return Err(ParseError::fatal(header, "Ungueltige Geometrie"));
        };

        let geometry = match shape.name.as_str() {
            "line" => RoadGeometry::line(s, x, y, hdg, length),
            "arc" => RoadGeometry::arc(s, x, y, hdg, length, required_f64(shape, "curvature")?),
            "spiral" => RoadGeometry::spiral_with_epsilon(
                s,
                x,
                y,
                hdg,
                length,
                required_f64(shape, "curvStart")?,
                required_f64(shape, "curvEnd")?,
                options.spiral_curvature_epsilon,
            ),
            "poly3" => RoadGeometry::poly3(s, x, y, hdg, length, read_cubic(shape, ["a", "b", "c", "d"])?),
            _ => {
                let params = ParamPoly3Parameters {
                    u: read_cubic(shape, ["aU", "bU", "cU", "dU"])?,
                    v: read_cubic(shape, ["aV", "bV", "cV", "dV"])?,
                    range: ctx.optional_enum(
                        shape,
                        "pRange",
                        ParamRange::Normalized,
                        ParamRange::from_xml_str,
                    ),
                };
                RoadGeometry::param_poly3(s, x, y, hdg, length, params)
            }
        }
        .at(shape)?;

        let expected_s = road
            .geometries()
            .last()
            .map_or(0.0, |previous| previous.s + previous.length);
        if (geometry.s - expected_s).abs() > GEOMETRY_GAP_TOLERANCE {
            ctx.warn(ParseError::recoverable(
                header,
                format!(
                    "Geometrie beginnt bei s={}, erwartet s={}; Referenzlinie hat eine Luecke",
                    geometry.s, expected_s
                ),
            ));
        }
        road.add_geometry(geometry).at(shape)?;
        log::debug!(
            "Geometrie {}: s={}, x={}, y={}, hdg={}, length={}",
            shape.name,
            s,
            x,
            y,
            hdg,
            length
        );
    }
    Ok(())
}

fn parse_elevation_profile(
    ctx: &mut ParseContext<'_>,
    road_element: &XmlElement,
    road: &mut Road,
) -> Result<(), ParseError> {
    let Some(profile) = road_element.first_child("elevationProfile") else {
        return Ok(());
    };
    if profile.first_child("elevation").is_none() {
        ctx.warn(ParseError::recoverable(
            profile,
            format!("Straße {}: elevationProfile ohne elevation", road.id()),
        ));
    }

    for elevation in profile.children_named("elevation") {
        let s = required_f64(elevation, "s")?;
        let poly = read_cubic(elevation, ["a", "b", "c", "d"])?;
        road.add_elevation(s, poly.a, poly.b, poly.c, poly.d)
            .at(elevation)?;
    }
    Ok(())
}

fn parse_road_links(road_element: &XmlElement, road: &mut Road) -> Result<(), ParseError> {
    let Some(link_element) = road_element.first_child("link") else {
        return Ok(());
    };

    for item in &link_element.children {
        let kind = LinkKind::from_xml_str(&item.name)
            .ok_or_else(|| ParseError::fatal(item, "Ungueltiger Road-Link-Typ"))?;

        let element_type_str = required_str(item, "elementType")?;
        let element_type = RoadLinkElementType::from_xml_str(element_type_str).ok_or_else(|| {
            ParseError::fatal(
                item,
                format!("Ungueltiger elementType '{}'", element_type_str),
            )
        })?;
        let element_id = required_str(item, "elementId")?;

        let contact_point = match element_type {
            RoadLinkElementType::Road => {
                let raw = required_str(item, "contactPoint")?;
                ContactPoint::from_xml_str(raw).ok_or_else(|| {
                    ParseError::fatal(item, format!("Ungueltiger contactPoint '{}'", raw))
                })?
            }
            RoadLinkElementType::Junction => ContactPoint::Undefined,
        };

        log::debug!(
            "Road-Link {}: {:?} -> {:?} {} ({:?})",
            road.id(),
            kind,
            element_type,
            element_id,
            contact_point
        );

        road.add_link(RoadLink {
            kind,
            element_type,
            element_id: element_id.to_string(),
            contact_point,
        })
        .at(item)?;
    }
    Ok(())
}

fn parse_road_types(road_element: &XmlElement, road: &mut Road) -> Result<(), ParseError> {
    for type_element in road_element.children_named("type") {
        let s = required_f64(type_element, "s")?;
        let type_str = required_str(type_element, "type")?;
        let road_type = RoadTypeInformation::from_xml_str(type_str).ok_or_else(|| {
            ParseError::fatal(type_element, format!("Unbekannter Straßentyp '{}'", type_str))
        })?;
        road.add_road_type(RoadTypeSpecification { s, road_type });
    }
    Ok(())
}
