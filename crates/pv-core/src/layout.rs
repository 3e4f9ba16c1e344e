use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::node::NodeId;

/// A presentational link between two nodes.
///
/// Edges only exist so authoring tools can redraw a graph the way it was
/// laid out. They say nothing about which replies lead where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Node the edge starts at.
    pub from: NodeId,
    /// Node the edge ends at.
    pub to: NodeId,
}

impl Edge {
    /// Create an edge between two nodes.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Canvas coordinates of a node, serialized as `[x, y]`.
///
/// Deserialization rejects coordinates that do not fit a finite `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position(pub f32, pub f32);

impl Position {
    /// Whether both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (x, y) = <(f32, f32)>::deserialize(deserializer)?;
        let position = Position(x, y);
        if !position.is_finite() {
            return Err(de::Error::custom(format!(
                "position coordinates out of range: [{x}, {y}]"
            )));
        }
        Ok(position)
    }
}

/// Editor companion data stored alongside a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Visual connections between nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,
    /// Canvas positions keyed by node.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "unique_positions"
    )]
    pub positions: BTreeMap<NodeId, Position>,
}

impl Layout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Place a node on the canvas.
    pub fn with_position(mut self, node: impl Into<NodeId>, position: Position) -> Self {
        self.positions.insert(node.into(), position);
        self
    }

    /// True when the layout carries no data at all.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.positions.is_empty()
    }

    /// Edges touching a node, in either direction.
    pub fn edges_of<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| &e.from == node || &e.to == node)
    }
}

/// Positions map that fails on a node listed twice instead of keeping the last.
fn unique_positions<'de, D>(deserializer: D) -> Result<BTreeMap<NodeId, Position>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PositionsVisitor;

    impl<'de> Visitor<'de> for PositionsVisitor {
        type Value = BTreeMap<NodeId, Position>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from node id to [x, y]")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut positions = BTreeMap::new();
            while let Some((node, position)) = map.next_entry::<NodeId, Position>()? {
                if positions.contains_key(&node) {
                    return Err(de::Error::custom(format!(
                        "position of node \"{node}\" given twice"
                    )));
                }
                positions.insert(node, position);
            }
            Ok(positions)
        }
    }

    deserializer.deserialize_map(PositionsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_builder() {
        let layout = Layout::new()
            .with_edge(Edge::new("a", "b"))
            .with_edge(Edge::new("b", "c"))
            .with_position("a", Position(10.0, 20.0));

        assert!(!layout.is_empty());
        assert_eq!(layout.edges_of(&NodeId::new("b")).count(), 2);
        assert_eq!(layout.edges_of(&NodeId::new("c")).count(), 1);
        assert_eq!(layout.positions[&NodeId::new("a")], Position(10.0, 20.0));
    }

    #[test]
    fn empty_layout_serializes_to_empty_object() {
        let json = serde_json::to_string(&Layout::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn positions_serialize_as_pairs() {
        let layout = Layout::new().with_position("a", Position(1.5, -2.0));
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(json, r#"{"positions":{"a":[1.5,-2.0]}}"#);
    }

    #[test]
    fn overflowing_coordinates_are_rejected() {
        let err = serde_json::from_str::<Position>("[1e39, 0]").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(serde_json::from_str::<Position>("[-1e39, 0]").is_err());
        assert_eq!(
            serde_json::from_str::<Position>("[3.5, -1]").unwrap(),
            Position(3.5, -1.0)
        );
    }

    #[test]
    fn duplicate_positions_are_rejected() {
        let err = serde_json::from_str::<Layout>(r#"{"positions":{"a":[1,2],"a":[3,4]}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("given twice"));
    }

    #[test]
    fn finite_check() {
        assert!(Position(1.0, -2.0).is_finite());
        assert!(!Position(f32::INFINITY, 0.0).is_finite());
        assert!(!Position(0.0, f32::NAN).is_finite());
    }
}
