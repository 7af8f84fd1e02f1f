#![forbid(unsafe_code)]

//! Wire-level records for org charts. Field names on the wire stay camelCase
//! so payloads written by older frontends keep decoding.

use serde::{Deserialize, Serialize};

/// Canvas coordinates of a node, in canvas units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Person payload carried by a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub name: String,
    pub title: String,
    pub department: String,
}

impl NodeData {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            department: department.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartNode {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
}

/// Directed reporting edge; `source` manages `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// One named saved chart. Timestamps are unix epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub name: String,
    pub nodes: Vec<ChartNode>,
    pub edges: Vec<ChartEdge>,
    #[serde(rename = "createdAt")]
    pub created_at_ms: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uses_camel_case_timestamps_on_the_wire() {
        let snapshot = ChartSnapshot {
            name: "Q4".to_string(),
            nodes: vec![ChartNode {
                id: "1".to_string(),
                position: Position { x: 250.0, y: 5.0 },
                data: NodeData::new("Morgan Reed", "CEO", "Executive"),
            }],
            edges: Vec::new(),
            created_at_ms: 1_700_000_000_000,
            updated_at_ms: 1_700_000_001_000,
        };

        let raw = serde_json::to_string(&snapshot).expect("snapshot should serialize");
        assert!(raw.contains("\"createdAt\":1700000000000"), "raw: {raw}");
        assert!(raw.contains("\"updatedAt\":1700000001000"), "raw: {raw}");
        assert!(!raw.contains("created_at_ms"), "raw: {raw}");

        let back: ChartSnapshot = serde_json::from_str(&raw).expect("snapshot should round-trip");
        assert_eq!(back, snapshot);
    }

    #[test]
    fn decode_tolerates_extra_fields_from_newer_writers() {
        let raw = r#"{
            "name": "Seeded",
            "nodes": [
                {
                    "id": "1",
                    "type": "orgNode",
                    "position": {"x": 100.0, "y": 200.0},
                    "data": {"name": "Riley Chen", "title": "Director", "department": "Sales", "avatar": "x.png"}
                }
            ],
            "edges": [{"id": "e1-1", "source": "1", "target": "1", "animated": false}],
            "createdAt": 1,
            "updatedAt": 2,
            "schemaVersion": 9
        }"#;
        let snapshot: ChartSnapshot = serde_json::from_str(raw).expect("extra fields are ignored");
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.nodes[0].data.title, "Director");
        assert_eq!(snapshot.edges[0].id, "e1-1");
    }

    #[test]
    fn decode_rejects_records_missing_required_fields() {
        let raw = r#"{"name": "Broken", "nodes": [{"id": "1"}], "edges": [], "createdAt": 1, "updatedAt": 1}"#;
        assert!(serde_json::from_str::<ChartSnapshot>(raw).is_err());
    }
}
