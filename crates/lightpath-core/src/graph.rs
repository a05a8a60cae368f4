use crate::element::{Link, Node, Position, link_label};
use crate::id::{LinkId, NodeId};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use slotmap::SlotMap;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors detected while building or freezing a topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node '{node}' lists unknown neighbor '{neighbor}'")]
    UnknownNeighbor { node: String, neighbor: String },
    #[error("node '{0}' lists itself as a neighbor")]
    SelfLoop(String),
    #[error("duplicate link label '{0}'")]
    DuplicateLink(String),
    #[error("node '{0}' has a non-finite position")]
    InvalidPosition(String),
    #[error("link '{0}' has a non-finite length")]
    InvalidLength(String),
    #[error("topology is not wired; call connect() first")]
    Unwired,
}

// ---------------------------------------------------------------------------
// Input description
// ---------------------------------------------------------------------------

/// One entry of a topology description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub position: [f64; 2],
    #[serde(default)]
    pub connected_nodes: Vec<String>,
}

/// Label-keyed adjacency description. Keys are kept sorted so node order is
/// deterministic regardless of the source format.
///
/// Deserializes from a plain map (`{"A": {"position": [..], "connected_nodes": [..]}}`)
/// and rejects duplicate labels instead of letting the last one win.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TopologyDescription {
    pub nodes: BTreeMap<String, NodeDescription>,
}

impl TopologyDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with_node<I, S>(mut self, label: &str, position: [f64; 2], connected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(label, position, connected);
        self
    }

    /// Insert or replace a node entry.
    pub fn insert<I, S>(&mut self, label: &str, position: [f64; 2], connected: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.insert(
            label.to_string(),
            NodeDescription {
                position,
                connected_nodes: connected.into_iter().map(Into::into).collect(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'de> Deserialize<'de> for TopologyDescription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DescriptionVisitor;

        impl<'de> Visitor<'de> for DescriptionVisitor {
            type Value = TopologyDescription;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of node label to node description")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut nodes = BTreeMap::new();
                while let Some((label, node)) = map.next_entry::<String, NodeDescription>()? {
                    if label.is_empty() {
                        return Err(serde::de::Error::custom("empty node label"));
                    }
                    if nodes.contains_key(&label) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate node label '{label}'"
                        )));
                    }
                    nodes.insert(label, node);
                }
                Ok(TopologyDescription { nodes })
            }
        }

        deserializer.deserialize_map(DescriptionVisitor)
    }
}

// ---------------------------------------------------------------------------
// Topology (construction + wiring)
// ---------------------------------------------------------------------------

/// Arena storage shared by the unwired and wired graph forms.
#[derive(Debug, Clone, Default)]
struct Arena {
    nodes: SlotMap<NodeId, Node>,
    lines: SlotMap<LinkId, Link>,
    node_index: BTreeMap<String, NodeId>,
    line_index: BTreeMap<String, LinkId>,
}

/// A topology under construction. Nodes and links exist, but successor maps
/// stay empty until [`connect`](Self::connect) runs.
#[derive(Debug, Clone)]
pub struct Topology {
    arena: Arena,
    wired: bool,
}

impl Topology {
    /// Create every node, then one directed link per declared adjacency with
    /// its length taken from the two endpoint positions.
    pub fn build(description: &TopologyDescription) -> Result<Self, GraphError> {
        let mut arena = Arena::default();

        // Phase 1: nodes.
        for (label, entry) in &description.nodes {
            let position = Position::from(entry.position);
            if !position.is_finite() {
                return Err(GraphError::InvalidPosition(label.clone()));
            }
            let id = arena.nodes.insert(Node::new(
                label.clone(),
                position,
                entry.connected_nodes.clone(),
            ));
            arena.node_index.insert(label.clone(), id);
        }

        // Phase 2: links (resolve neighbor labels).
        for (label, &id) in &arena.node_index {
            let node = &arena.nodes[id];
            for neighbor in node.connected_nodes() {
                if neighbor == label {
                    return Err(GraphError::SelfLoop(label.clone()));
                }
                let &neighbor_id =
                    arena
                        .node_index
                        .get(neighbor)
                        .ok_or_else(|| GraphError::UnknownNeighbor {
                            node: label.clone(),
                            neighbor: neighbor.clone(),
                        })?;
                let key = link_label(label, neighbor);
                if arena.line_index.contains_key(&key) {
                    return Err(GraphError::DuplicateLink(key));
                }
                let length = node.position().distance(&arena.nodes[neighbor_id].position());
                if !length.is_finite() {
                    return Err(GraphError::InvalidLength(key));
                }
                let link_id = arena
                    .lines
                    .insert(Link::new(label.clone(), neighbor.clone(), length));
                arena.line_index.insert(key, link_id);
            }
        }

        debug!(
            nodes = arena.nodes.len(),
            lines = arena.lines.len(),
            "topology built"
        );
        Ok(Self {
            arena,
            wired: false,
        })
    }

    /// Populate node -> link and link -> node successor maps. Each map is
    /// rebuilt from scratch, so repeated calls leave the same state.
    pub fn connect(&mut self) {
        let Arena {
            nodes,
            lines,
            node_index,
            line_index,
        } = &mut self.arena;

        for node in nodes.values_mut() {
            let successive = node
                .connected_nodes()
                .iter()
                .filter_map(|neighbor| {
                    let key = link_label(node.label(), neighbor);
                    line_index.get(&key).map(|&id| (key, id))
                })
                .collect();
            node.set_successive(successive);
        }

        for line in lines.values_mut() {
            let successive = node_index
                .get(line.destination())
                .map(|&id| (line.destination().to_string(), id))
                .into_iter()
                .collect();
            line.set_successive(successive);
        }

        self.wired = true;
        debug!(lines = lines.len(), "topology wired");
    }

    pub fn is_wired(&self) -> bool {
        self.wired
            && self.arena.nodes.values().all(Node::is_wired)
            && self.arena.lines.values().all(Link::is_wired)
    }

    pub fn node_count(&self) -> usize {
        self.arena.nodes.len()
    }

    pub fn line_count(&self) -> usize {
        self.arena.lines.len()
    }

    /// Freeze into a read-only [`Network`]. Fails with
    /// [`GraphError::Unwired`] unless every successor map is populated.
    pub fn into_network(self) -> Result<Network, GraphError> {
        if !self.is_wired() {
            return Err(GraphError::Unwired);
        }
        Ok(Network { arena: self.arena })
    }
}

// ---------------------------------------------------------------------------
// Network (wired, read-only)
// ---------------------------------------------------------------------------

/// A fully wired topology. Immutable; propagation only mutates the
/// per-run [`SignalInformation`](crate::signal::SignalInformation).
#[derive(Debug, Clone)]
pub struct Network {
    arena: Arena,
}

impl Network {
    /// Build, wire and freeze in one step.
    pub fn from_description(description: &TopologyDescription) -> Result<Self, GraphError> {
        let mut topology = Topology::build(description)?;
        topology.connect();
        topology.into_network()
    }

    pub fn node(&self, label: &str) -> Option<&Node> {
        self.node_id(label).map(|id| &self.arena.nodes[id])
    }

    pub fn link(&self, label: &str) -> Option<&Link> {
        self.arena
            .line_index
            .get(label)
            .map(|&id| &self.arena.lines[id])
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.arena.node_index.get(label).copied()
    }

    pub(crate) fn node_by_id(&self, id: NodeId) -> &Node {
        &self.arena.nodes[id]
    }

    pub(crate) fn link_by_id(&self, id: LinkId) -> &Link {
        &self.arena.lines[id]
    }

    /// Nodes in label order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.arena
            .node_index
            .values()
            .map(|&id| &self.arena.nodes[id])
    }

    /// Links in label order.
    pub fn lines(&self) -> impl Iterator<Item = &Link> {
        self.arena
            .line_index
            .values()
            .map(|&id| &self.arena.lines[id])
    }

    /// Node labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.arena.node_index.keys().map(String::as_str)
    }

    /// Source and destination nodes of a link, for drawing edges.
    pub fn endpoints(&self, link: &str) -> Option<(&Node, &Node)> {
        let link = self.link(link)?;
        Some((self.node(link.source())?, self.node(link.destination())?))
    }

    pub fn node_count(&self) -> usize {
        self.arena.nodes.len()
    }

    pub fn line_count(&self) -> usize {
        self.arena.lines.len()
    }
}
