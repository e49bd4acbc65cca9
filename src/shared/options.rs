//! Zentrale Konfiguration des Szenerie-Imports.
//!
//! `ImportOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Referenzlinie ───────────────────────────────────────────────────

/// Nachkommastellen für s, x, y und length der Geometrie-Header.
pub const POSITION_DECIMALS: u32 = 3;
/// Nachkommastellen für hdg der Geometrie-Header.
pub const HEADING_DECIMALS: u32 = 6;
/// Spiral-Krümmungen mit kleinerem Betrag werden auf 0 gesetzt.
pub const SPIRAL_CURVATURE_EPSILON: f64 = road_geometry::SPIRAL_CURVATURE_EPSILON;

// ── Lanes ───────────────────────────────────────────────────────────

/// Lane-IDs einer Section müssen von der Mitte aus lückenlos sein.
pub const REQUIRE_CONTIGUOUS_LANE_IDS: bool = true;

// ── Eingabe-Grenzen ─────────────────────────────────────────────────

/// Maximale Verschachtelungstiefe der XML-Elemente.
pub const MAX_ELEMENT_DEPTH: usize = 256;
/// Maximale Anzahl Instanzen, die ein einzelnes `<repeat>` erzeugen darf.
pub const MAX_REPEAT_INSTANCES: usize = 100_000;

// ── Simulator-Grenzen ───────────────────────────────────────────────

/// Obergrenzen für Objekte, die der Simulator übernimmt.
///
/// Objekte außerhalb dieser Grenzen werden mit Warnung verworfen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorLimits {
    /// Maximale Objektbreite in Metern
    pub max_object_width: f64,
    /// Maximale Objektlänge in Metern
    pub max_object_length: f64,
    /// Maximale Objekthöhe in Metern
    pub max_object_height: f64,
}

impl Default for SimulatorLimits {
    fn default() -> Self {
        Self {
            max_object_width: f64::INFINITY,
            max_object_length: f64::INFINITY,
            max_object_height: f64::INFINITY,
        }
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Import-Optionen.
/// Wird als TOML neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub position_decimals: u32,
    pub heading_decimals: u32,
    pub spiral_curvature_epsilon: f64,
    pub simulator_limits: SimulatorLimits,
    pub require_contiguous_lane_ids: bool,
    pub max_element_depth: usize,
    pub max_repeat_instances: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            position_decimals: POSITION_DECIMALS,
            heading_decimals: HEADING_DECIMALS,
            spiral_curvature_epsilon: SPIRAL_CURVATURE_EPSILON,
            simulator_limits: SimulatorLimits::default(),
            require_contiguous_lane_ids: REQUIRE_CONTIGUOUS_LANE_IDS,
            max_element_depth: MAX_ELEMENT_DEPTH,
            max_repeat_instances: MAX_REPEAT_INSTANCES,
        }
    }
}

impl ImportOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("scenery-check"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("scenery-check.toml")
    }

    /// Rundet einen Positionswert (s, x, y, length) auf `position_decimals`.
    pub fn round_position(&self, value: f64) -> f64 {
        road_geometry::round_to_decimals(value, self.position_decimals)
    }

    /// Rundet einen Kurswinkel auf `heading_decimals`.
    pub fn round_heading(&self, value: f64) -> f64 {
        road_geometry::round_to_decimals(value, self.heading_decimals)
    }
}
