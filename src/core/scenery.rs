//! Die Scenery: besitzt alle Straßen und Junctions, adressiert über ihre ID.

use indexmap::IndexMap;

use super::{Junction, Road};

/// Container für das gesamte Straßennetz eines Simulationslaufs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenery {
    roads: IndexMap<String, Road>,
    junctions: IndexMap<String, Junction>,
}

impl Scenery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legt eine neue Straße an. Bei bereits vergebener ID: `None` (und Log).
    pub fn add_road(&mut self, id: &str) -> Option<&mut Road> {
        if self.roads.contains_key(id) {
            log::error!("Straße mit ID {} existiert bereits", id);
            return None;
        }
        let (index, _) = self.roads.insert_full(id.to_string(), Road::new(id));
        self.roads.get_index_mut(index).map(|(_, road)| road)
    }

    /// Legt eine neue Junction an. Bei bereits vergebener ID: `None` (und Log).
    pub fn add_junction(&mut self, id: &str) -> Option<&mut Junction> {
        if self.junctions.contains_key(id) {
            log::error!("Junction mit ID {} existiert bereits", id);
            return None;
        }
        let (index, _) = self
            .junctions
            .insert_full(id.to_string(), Junction::new(id));
        self.junctions.get_index_mut(index).map(|(_, junction)| junction)
    }

    pub fn road(&self, id: &str) -> Option<&Road> {
        self.roads.get(id)
    }

    pub fn road_mut(&mut self, id: &str) -> Option<&mut Road> {
        self.roads.get_mut(id)
    }

    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junctions.get(id)
    }

    pub fn junction_mut(&mut self, id: &str) -> Option<&mut Junction> {
        self.junctions.get_mut(id)
    }

    /// Alle Straßen in Dokument-Reihenfolge
    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    /// Alle Junctions in Dokument-Reihenfolge
    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.values()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty() && self.junctions.is_empty()
    }

    /// Entfernt alle Straßen und Junctions
    pub fn clear(&mut self) {
        self.roads.clear();
        self.junctions.clear();
    }
}
