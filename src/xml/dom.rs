//! Kleiner Element-Baum auf Basis der `quick-xml`-Events.
//!
//! Der Importer greift wiederholt auf Kind-Elemente und Attribute zu
//! (`<planView>` vor `<lanes>` usw.), deshalb wird das Dokument einmal
//! vollständig eingelesen. Text-Inhalte werden verworfen.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::ParseError;
use crate::shared::MAX_ELEMENT_DEPTH;

/// Ein XML-Element mit Attributen und Kind-Elementen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Zeile des öffnenden Tags (1-basiert)
    pub line: usize,
}

impl XmlElement {
    /// Wert eines Attributs (unescaped)
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Erstes Kind-Element mit dem Namen `name`
    pub fn first_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Alle Kind-Elemente mit dem Namen `name` in Dokument-Reihenfolge
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Zählt Zeilen inkrementell, Positionen müssen monoton steigen.
struct LineTracker<'a> {
    source: &'a [u8],
    position: usize,
    line: usize,
}

impl<'a> LineTracker<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            position: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, position: usize) -> usize {
        let position = position.min(self.source.len());
        if position > self.position {
            self.line += self.source[self.position..position]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.position = position;
        }
        self.line
    }

    /// Zeile des Tags, das unmittelbar vor `end` endet
    fn line_of_tag(&mut self, end: usize) -> usize {
        let end = end.min(self.source.len());
        let start = self.source[..end]
            .iter()
            .rposition(|b| *b == b'<')
            .unwrap_or(end);
        self.line_at(start.max(self.position))
    }
}

fn read_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    line: usize,
) -> Result<XmlElement, ParseError> {
    let to_error = |e: &dyn std::fmt::Display| ParseError::document(line, e.to_string());

    let name = start.name();
    let name = reader
        .decoder()
        .decode(name.as_ref())
        .map_err(|e| to_error(&e))?
        .into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| to_error(&e))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|e| to_error(&e))?
            .into_owned();
        let value = attr.unescape_value().map_err(|e| to_error(&e))?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        line,
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::fatal(&element, "Dokument hat mehr als ein Wurzelelement"));
    }
    *root = Some(element);
    Ok(())
}

/// `open` Elemente sind bereits offen, das nächste läge auf Tiefe `open + 1`
fn check_depth(open: usize, max_depth: usize, line: usize) -> Result<(), ParseError> {
    if open >= max_depth {
        return Err(ParseError::document(
            line,
            format!("Elemente sind tiefer als {} Ebenen verschachtelt", max_depth),
        ));
    }
    Ok(())
}

/// Liest das Dokument mit der Standard-Tiefengrenze [`MAX_ELEMENT_DEPTH`].
pub fn parse_document(source: &str) -> Result<XmlElement, ParseError> {
    parse_document_with_depth(source, MAX_ELEMENT_DEPTH)
}

/// Liest das Dokument und liefert das Wurzelelement.
///
/// Fehlerhafte Syntax, nicht geschlossene Elemente, ein fehlendes
/// Wurzelelement und Verschachtelung tiefer als `max_depth` sind fatale Fehler.
pub fn parse_document_with_depth(source: &str, max_depth: usize) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut buffer = Vec::new();
    let mut lines = LineTracker::new(source);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event_into(&mut buffer);
        let end = reader.buffer_position() as usize;

        match event {
            Ok(Event::Start(ref e)) => {
                let line = lines.line_of_tag(end);
                check_depth(stack.len(), max_depth, line)?;
                stack.push(read_element(&reader, e, line)?);
            }
            Ok(Event::Empty(ref e)) => {
                let line = lines.line_of_tag(end);
                check_depth(stack.len(), max_depth, line)?;
                let element = read_element(&reader, e, line)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err(ParseError::document(
                        lines.line_at(end),
                        "Schliessendes Tag ohne oeffnendes Tag",
                    ));
                };
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ParseError::document(
                    lines.line_at(end),
                    format!("Fehler beim Parsen des XML: {}", err),
                ));
            }
            _ => {}
        }

        buffer.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::fatal(open, "Element wird nicht geschlossen"));
    }

    root.ok_or_else(|| ParseError::document(0, "Dokument enthaelt kein Wurzelelement"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_tree_with_lines_and_attributes() {
        let xml = "<?xml version=\"1.0\"?>\n<OpenDRIVE>\n  <road id=\"1\" name=\"a &amp; b\">\n    <planView/>\n  </road>\n</OpenDRIVE>\n";
        let root = parse_document(xml).unwrap();

        assert_eq!(root.name, "OpenDRIVE");
        assert_eq!(root.line, 2);
        let road = root.first_child("road").unwrap();
        assert_eq!(road.line, 3);
        assert_eq!(road.attribute("id"), Some("1"));
        assert_eq!(road.attribute("name"), Some("a & b"));
        assert!(!road.has_attribute("junction"));
        assert_eq!(road.first_child("planView").map(|e| e.line), Some(4));
    }

    #[test]
    fn test_children_named_keeps_order() {
        let root = parse_document("<r><a id=\"1\"/><b/><a id=\"2\"/></r>").unwrap();
        let ids: Vec<_> = root
            .children_named("a")
            .filter_map(|e| e.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_unbalanced_document_is_rejected() {
        assert!(parse_document("<OpenDRIVE><road>").is_err());
        assert!(parse_document("<OpenDRIVE></road>").is_err());
    }

    #[test]
    fn test_nesting_depth_is_limited() {
        let nested = |depth: usize| format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));

        assert!(parse_document_with_depth(&nested(3), 3).is_ok());
        let err = parse_document_with_depth(&nested(4), 3).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.message.contains("3 Ebenen"));

        // Leere Elemente zählen ebenfalls
        assert!(parse_document_with_depth("<a><b><c/></b></a>", 2).is_err());
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let err = parse_document("   ").unwrap_err();
        assert!(err.is_fatal());
    }
}
