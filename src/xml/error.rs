//! Strukturierte Fehler des Szenerie-Imports.

use std::fmt;

use serde::Serialize;

use super::dom::XmlElement;

/// Schwere eines Import-Befunds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// Betroffenes Element wird verworfen, Import läuft weiter
    Recoverable,
    /// Import bricht ab
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Warnung"),
            Self::Fatal => write!(f, "Fehler"),
        }
    }
}

/// Befund mit Element-Name und Zeilennummer (1-basiert, 0 = ohne Position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{severity} in <{element}> (Zeile {line}): {message}")]
pub struct ParseError {
    pub severity: Severity,
    pub element: String,
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn fatal(element: &XmlElement, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            element: element.name.clone(),
            line: element.line,
            message: message.into(),
        }
    }

    pub fn recoverable(element: &XmlElement, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Recoverable,
            element: element.name.clone(),
            line: element.line,
            message: message.into(),
        }
    }

    /// Fehler ohne konkretes Element (Datei, Dokumentstruktur)
    pub fn document(line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            element: "document".to_string(),
            line,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    /// Hebt einen Befund auf `Fatal` an (z.B. unlesbare Pflichtwerte)
    pub fn into_fatal(self) -> Self {
        Self {
            severity: Severity::Fatal,
            ..self
        }
    }
}

/// Ordnet einen Modellfehler dem auslösenden XML-Element zu.
pub(crate) trait AtElement<T> {
    fn at(self, element: &XmlElement) -> Result<T, ParseError>;
}

impl<T, E: fmt::Display> AtElement<T> for Result<T, E> {
    fn at(self, element: &XmlElement) -> Result<T, ParseError> {
        self.map_err(|e| ParseError::fatal(element, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_element_and_line() {
        let error = ParseError::document(7, "Wurzelelement fehlt");
        assert_eq!(
            error.to_string(),
            "Fehler in <document> (Zeile 7): Wurzelelement fehlt"
        );
        assert!(error.is_fatal());
    }
}
