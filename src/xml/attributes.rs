//! Lesen von Pflicht- und optionalen Attributen.
//!
//! Zahlen werden ausschließlich mit `str::parse` gelesen: Dezimaltrenner ist
//! immer `.`, unabhängig von der Locale des Systems.

use std::str::FromStr;

use super::dom::XmlElement;
use super::error::ParseError;

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("Attribut {} hat einen ungueltigen Wert: '{}'", key, raw))
}

/// Pflicht-Attribut als String
pub fn required_str<'a>(element: &'a XmlElement, key: &str) -> Result<&'a str, ParseError> {
    element
        .attribute(key)
        .ok_or_else(|| ParseError::fatal(element, format!("Attribut {} fehlt", key)))
}

/// Pflicht-Attribut als Zahl (`f64`, `i32`, ...)
pub fn required<T: FromStr>(element: &XmlElement, key: &str) -> Result<T, ParseError> {
    let raw = required_str(element, key)?;
    parse_value(key, raw).map_err(|message| ParseError::fatal(element, message))
}

/// Endliche Pflicht-Zahl; `inf`/`NaN` werden abgelehnt
pub fn required_f64(element: &XmlElement, key: &str) -> Result<f64, ParseError> {
    let value: f64 = required(element, key)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::fatal(
            element,
            format!("Attribut {} ist keine endliche Zahl", key),
        ))
    }
}

/// Optionales Attribut als String mit Default
pub fn optional_str<'a>(element: &'a XmlElement, key: &str, default: &'a str) -> &'a str {
    element.attribute(key).unwrap_or(default)
}

/// Optionales Attribut als Zahl.
///
/// Fehlt das Attribut: `Ok(None)`. Ist es nicht lesbar: `Err` mit Schwere
/// `Recoverable`; der Aufrufer verwendet dann seinen Default.
pub fn optional<T: FromStr>(element: &XmlElement, key: &str) -> Result<Option<T>, ParseError> {
    match element.attribute(key) {
        None => Ok(None),
        Some(raw) => parse_value(key, raw)
            .map(Some)
            .map_err(|message| ParseError::recoverable(element, message)),
    }
}
