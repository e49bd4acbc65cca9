//! Importer für OpenDRIVE-Szenerien.
//!
//! Reihenfolge: Junctions, dann Straßen (Geometrie, Höhenprofil, Links,
//! Lanes, Objekte, Signale, Straßentypen), zuletzt die Prüfung der
//! Referenzen zwischen Junctions und Straßen.

mod junctions;
mod lanes;
mod objects;
mod roads;
mod signals;

use std::path::Path;

use serde::Serialize;

use super::attributes;
use super::dom::{parse_document_with_depth, XmlElement};
use super::error::{ParseError, Severity};
use crate::core::{RoadLinkElementType, Scenery};
use crate::shared::ImportOptions;

/// Name des Wurzelelements
pub const ROOT_TAG: &str = "OpenDRIVE";

/// Ergebnis eines erfolgreichen Imports.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub scenery: Scenery,
    /// Nicht-fatale Befunde (verworfene Objekte, offene Road-Links, ...)
    pub warnings: Vec<ParseError>,
}

/// Kennzahlen einer importierten Szenerie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenerySummary {
    pub roads: usize,
    pub junctions: usize,
    pub connections: usize,
    pub lane_sections: usize,
    pub lanes: usize,
    pub objects: usize,
    pub signals: usize,
    pub total_length: f64,
    pub warnings: Vec<ParseError>,
}

impl ImportReport {
    pub fn summary(&self) -> ScenerySummary {
        let roads: Vec<_> = self.scenery.roads().collect();
        let sections = roads.iter().flat_map(|road| road.lane_sections());
        ScenerySummary {
            roads: roads.len(),
            junctions: self.scenery.junction_count(),
            connections: self
                .scenery
                .junctions()
                .map(|junction| junction.connection_count())
                .sum(),
            lane_sections: roads.iter().map(|road| road.lane_sections().len()).sum(),
            lanes: sections.map(|section| section.physical_lane_count()).sum(),
            objects: roads.iter().map(|road| road.objects().len()).sum(),
            signals: roads.iter().map(|road| road.signals().len()).sum(),
            total_length: roads.iter().map(|road| road.length()).sum(),
            warnings: self.warnings.clone(),
        }
    }
}

/// Gemeinsamer Zustand während eines Imports.
pub(crate) struct ParseContext<'a> {
    pub options: &'a ImportOptions,
    warnings: Vec<ParseError>,
}

impl<'a> ParseContext<'a> {
    fn new(options: &'a ImportOptions) -> Self {
        Self {
            options,
            warnings: Vec::new(),
        }
    }

    /// Nimmt einen nicht-fatalen Befund auf
    pub fn warn(&mut self, warning: ParseError) {
        log::warn!("{}", warning);
        self.warnings.push(ParseError {
            severity: Severity::Recoverable,
            ..warning
        });
    }

    /// Optionale Zahl; fehlerhafte Werte werden gemeldet und durch `default` ersetzt
    pub fn optional_f64(&mut self, element: &XmlElement, key: &str, default: f64) -> f64 {
        match attributes::optional::<f64>(element, key) {
            Ok(Some(value)) if value.is_finite() => value,
            Ok(Some(value)) => {
                self.warn(ParseError::recoverable(
                    element,
                    format!("Attribut {} ist keine endliche Zahl: {}", key, value),
                ));
                default
            }
            Ok(None) => default,
            Err(warning) => {
                self.warn(warning);
                default
            }
        }
    }

    /// Optionaler Tabellenwert; unbekannte Werte werden gemeldet und durch `default` ersetzt
    pub fn optional_enum<T>(
        &mut self,
        element: &XmlElement,
        key: &str,
        default: T,
        lookup: fn(&str) -> Option<T>,
    ) -> T {
        let Some(raw) = element.attribute(key) else {
            return default;
        };
        match lookup(raw) {
            Some(value) => value,
            None => {
                self.warn(ParseError::recoverable(
                    element,
                    format!("Unbekannter Wert '{}' fuer Attribut {}", raw, key),
                ));
                default
            }
        }
    }

    /// Wie [`Self::optional_enum`], aber ein fehlendes Attribut gilt als `missing`
    pub fn defaulted_enum<T>(
        &mut self,
        element: &XmlElement,
        key: &str,
        missing: T,
        unknown: T,
        lookup: fn(&str) -> Option<T>,
    ) -> T {
        if element.attribute(key).is_none() {
            return missing;
        }
        self.optional_enum(element, key, unknown, lookup)
    }
}

/// Liest OpenDRIVE-Dateien in eine [`Scenery`].
#[derive(Debug, Clone, Default)]
pub struct SceneryImporter {
    options: ImportOptions,
}

impl SceneryImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Importiert `path` nach `scenery`.
    ///
    /// Bei Erfolg wird `scenery` ersetzt und `true` geliefert. Bei jedem
    /// fatalen Fehler wird dieser geloggt, `scenery` bleibt unverändert und
    /// das Ergebnis ist `false`.
    pub fn import(&self, path: impl AsRef<Path>, scenery: &mut Scenery) -> bool {
        match self.import_file(path.as_ref()) {
            Ok(report) => {
                *scenery = report.scenery;
                true
            }
            Err(e) => {
                log::error!("Szenerie-Import fehlgeschlagen: {}", e);
                false
            }
        }
    }

    /// Liest und importiert eine Datei
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportReport, ParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParseError::document(
                0,
                format!("Datei {} konnte nicht gelesen werden: {}", path.display(), e),
            )
        })?;
        log::info!("Importiere Szenerie: {}", path.display());
        self.parse_str(&content)
    }

    /// Importiert ein OpenDRIVE-Dokument aus einem String
    pub fn parse_str(&self, xml_content: &str) -> Result<ImportReport, ParseError> {
        let root = parse_document_with_depth(xml_content, self.options.max_element_depth)?;
        if root.name != ROOT_TAG {
            return Err(ParseError::fatal(
                &root,
                format!("Wurzelelement muss <{}> sein", ROOT_TAG),
            ));
        }

        let mut ctx = ParseContext::new(&self.options);
        let mut scenery = Scenery::new();

        junctions::parse_junctions(&root, &mut scenery)?;
        roads::parse_roads(&mut ctx, &root, &mut scenery)?;
        check_references(&mut ctx, &root, &scenery)?;

        log::info!(
            "Szenerie geladen: {} Straßen, {} Junctions, {} Warnungen",
            scenery.road_count(),
            scenery.junction_count(),
            ctx.warnings.len()
        );

        Ok(ImportReport {
            scenery,
            warnings: ctx.warnings,
        })
    }
}

/// Importiert ein Dokument mit Standard-Optionen
pub fn parse_scenery(xml_content: &str) -> Result<ImportReport, ParseError> {
    SceneryImporter::default().parse_str(xml_content)
}

fn element_with_id<'a>(root: &'a XmlElement, tag: &'a str, id: &str) -> Option<&'a XmlElement> {
    root.children_named(tag)
        .find(|element| element.attribute("id") == Some(id))
}

fn finding(root: &XmlElement, tag: &str, id: &str, severity: Severity, message: String) -> ParseError {
    match element_with_id(root, tag, id) {
        Some(element) if severity == Severity::Fatal => ParseError::fatal(element, message),
        Some(element) => ParseError::recoverable(element, message),
        None => ParseError {
            severity,
            ..ParseError::document(0, message)
        },
    }
}

/// Prüft die Referenzen zwischen Junctions und Straßen.
///
/// Straßen einer Connection müssen existieren (fatal). Road-Links auf
/// unbekannte Elemente werden als Warnung gemeldet.
fn check_references(
    ctx: &mut ParseContext<'_>,
    root: &XmlElement,
    scenery: &Scenery,
) -> Result<(), ParseError> {
    for junction in scenery.junctions() {
        for connection in junction.connections() {
            for road_id in [connection.incoming_road(), connection.connecting_road()] {
                if scenery.road(road_id).is_none() {
                    return Err(finding(
                        root,
                        "junction",
                        junction.id(),
                        Severity::Fatal,
                        format!(
                            "Connection {} verweist auf unbekannte Straße {}",
                            connection.id(),
                            road_id
                        ),
                    ));
                }
            }
        }
    }

    for road in scenery.roads() {
        for link in road.links() {
            let exists = match link.element_type {
                RoadLinkElementType::Road => scenery.road(&link.element_id).is_some(),
                RoadLinkElementType::Junction => scenery.junction(&link.element_id).is_some(),
            };
            if !exists {
                ctx.warn(finding(
                    root,
                    "road",
                    road.id(),
                    Severity::Recoverable,
                    format!(
                        "Straße {}: {:?} verweist auf unbekanntes Element {:?} {}",
                        road.id(),
                        link.kind,
                        link.element_type,
                        link.element_id
                    ),
                ));
            }
        }
    }

    Ok(())
}
