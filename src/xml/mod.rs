//! OpenDRIVE-Import.
//!
//! Das Dokument wird mit `quick-xml` in einen kleinen Element-Baum gelesen
//! ([`dom`]) und anschließend subtree-weise in eine [`Scenery`](crate::core::Scenery)
//! übersetzt ([`parser`]).

pub mod attributes;
pub mod dom;
pub mod error;
pub mod parser;

pub use dom::{parse_document, parse_document_with_depth, XmlElement};
pub use error::{ParseError, Severity};
pub use parser::{parse_scenery, ImportReport, SceneryImporter, ScenerySummary, ROOT_TAG};
