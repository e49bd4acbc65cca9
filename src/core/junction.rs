//! Junctions mit ihren Connections und Vorfahrtsregeln.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use super::types::ContactPoint;

/// Verbindung einer Zufahrtsstraße mit einer Verbindungsstraße innerhalb der Junction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    id: String,
    incoming_road: String,
    connecting_road: String,
    contact_point: ContactPoint,
    /// Lane der Zufahrt → Lane der Verbindungsstraße
    links: BTreeMap<i32, i32>,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        incoming_road: impl Into<String>,
        connecting_road: impl Into<String>,
        contact_point: ContactPoint,
    ) -> Self {
        Self {
            id: id.into(),
            incoming_road: incoming_road.into(),
            connecting_road: connecting_road.into(),
            contact_point,
            links: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn incoming_road(&self) -> &str {
        &self.incoming_road
    }

    pub fn connecting_road(&self) -> &str {
        &self.connecting_road
    }

    pub fn contact_point(&self) -> ContactPoint {
        self.contact_point
    }

    /// Fügt einen Lane-Link hinzu; ein wiederholtes `from` überschreibt den alten Eintrag
    pub fn add_link(&mut self, from: i32, to: i32) {
        if let Some(previous) = self.links.insert(from, to) {
            log::debug!(
                "Connection {}: Lane-Link {} -> {} ersetzt {} -> {}",
                self.id,
                from,
                to,
                from,
                previous
            );
        }
    }

    pub fn links(&self) -> &BTreeMap<i32, i32> {
        &self.links
    }

    /// Ziel-Lane auf der Verbindungsstraße für eine Lane der Zufahrt
    pub fn linked_lane(&self, from: i32) -> Option<i32> {
        self.links.get(&from).copied()
    }
}

/// Vorfahrtsregel: `high` hat Vorrang vor `low` (Straßen-IDs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Priority {
    pub high: String,
    pub low: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    id: String,
    connections: IndexMap<String, Connection>,
    priorities: Vec<Priority>,
}

impl Junction {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            connections: IndexMap::new(),
            priorities: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Legt eine Connection an. Doppelte IDs werden abgelehnt (`None`).
    pub fn add_connection(
        &mut self,
        id: &str,
        incoming_road: &str,
        connecting_road: &str,
        contact_point: ContactPoint,
    ) -> Option<&mut Connection> {
        if self.connections.contains_key(id) {
            log::error!(
                "Junction {}: Connection-ID {} ist bereits vergeben",
                self.id,
                id
            );
            return None;
        }
        let connection = Connection::new(id, incoming_road, connecting_road, contact_point);
        let (index, _) = self.connections.insert_full(id.to_string(), connection);
        self.connections.get_index_mut(index).map(|(_, c)| c)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Alle Connections in Dokument-Reihenfolge
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Hängt eine Vorfahrtsregel an (ohne Deduplizierung oder Zyklusprüfung)
    pub fn add_priority(&mut self, priority: Priority) {
        self.priorities.push(priority);
    }

    pub fn priorities(&self) -> &[Priority] {
        &self.priorities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_connection_id_is_rejected() {
        let mut junction = Junction::new("J1");
        assert!(junction
            .add_connection("0", "1", "10", ContactPoint::Start)
            .is_some());
        assert!(junction
            .add_connection("0", "2", "11", ContactPoint::End)
            .is_none());
        assert_eq!(junction.connection_count(), 1);
        assert_eq!(
            junction.connection("0").map(Connection::incoming_road),
            Some("1")
        );
    }

    #[test]
    fn test_lane_link_last_write_wins() {
        let mut connection = Connection::new("0", "1", "10", ContactPoint::Start);
        connection.add_link(-1, -1);
        connection.add_link(-1, -2);
        connection.add_link(-2, -3);
        assert_eq!(connection.linked_lane(-1), Some(-2));
        assert_eq!(connection.links().len(), 2);
    }

    #[test]
    fn test_priorities_keep_order_and_duplicates() {
        let mut junction = Junction::new("J1");
        let priority = Priority {
            high: "1".into(),
            low: "2".into(),
        };
        junction.add_priority(priority.clone());
        junction.add_priority(priority.clone());
        assert_eq!(junction.priorities(), &[priority.clone(), priority]);
    }

    #[test]
    fn test_connections_keep_document_order() {
        let mut junction = Junction::new("J1");
        for id in ["c", "a", "b"] {
            junction.add_connection(id, "1", "2", ContactPoint::Start);
        }
        let ids: Vec<&str> = junction.connections().map(Connection::id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
