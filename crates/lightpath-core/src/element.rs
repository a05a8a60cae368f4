use crate::id::{LinkId, NodeId};
use crate::propagate::{Cursor, PropagationError};
use crate::signal::SignalInformation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Fraction of `c` at which the signal travels in fibre.
pub const VELOCITY_FACTOR: f64 = 2.0 / 3.0;

/// Noise generated per watt of signal per metre of link.
pub const NOISE_COEFFICIENT: f64 = 1e-9;

/// Label of the directed link from `source` to `destination`.
pub fn link_label(source: &str, destination: &str) -> String {
    let mut label = String::with_capacity(source.len() + destination.len());
    label.push_str(source);
    label.push_str(destination);
    label
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// 2D node coordinate in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance. `hypot` ignores operand signs, so swapping the
    /// endpoints gives a bit-identical result, and it does not overflow on
    /// large finite coordinates. Still infinite when a difference overflows.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A network endpoint. Owns its adjacency list and, once wired, a map from
/// outgoing link label to link.
#[derive(Debug, Clone)]
pub struct Node {
    label: String,
    position: Position,
    connected_nodes: Vec<String>,
    successive: BTreeMap<String, LinkId>,
}

impl Node {
    pub(crate) fn new(label: String, position: Position, connected_nodes: Vec<String>) -> Self {
        Self {
            label,
            position,
            connected_nodes,
            successive: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Neighbor labels in declaration order.
    pub fn connected_nodes(&self) -> &[String] {
        &self.connected_nodes
    }

    pub fn successive(&self) -> &BTreeMap<String, LinkId> {
        &self.successive
    }

    pub(crate) fn set_successive(&mut self, successive: BTreeMap<String, LinkId>) {
        self.successive = successive;
    }

    /// True when every neighbor has its outgoing link registered.
    pub fn is_wired(&self) -> bool {
        self.connected_nodes
            .iter()
            .all(|n| self.successive.contains_key(&link_label(&self.label, n)))
    }

    /// Node transition. With more than one label left, consumes the head of
    /// the path and moves onto the link named by the first two labels;
    /// otherwise the propagation terminates here.
    pub fn forward(
        &self,
        mut signal: SignalInformation,
    ) -> Result<(Cursor, SignalInformation), PropagationError> {
        let next_link = match signal.path() {
            [current, next, ..] => link_label(current, next),
            _ => return Ok((Cursor::Terminated, signal)),
        };
        signal.advance();

        let link = self
            .successive
            .get(&next_link)
            .copied()
            .ok_or_else(|| PropagationError::MissingLink {
                node: self.label.clone(),
                link: next_link,
            })?;
        Ok((Cursor::AtLink(link), signal))
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// A directed physical connection. A bidirectional fibre is two links with
/// reversed labels and equal length.
#[derive(Debug, Clone)]
pub struct Link {
    label: String,
    source: String,
    destination: String,
    length: f64,
    successive: BTreeMap<String, NodeId>,
}

impl Link {
    pub(crate) fn new(source: String, destination: String, length: f64) -> Self {
        Self {
            label: link_label(&source, &destination),
            source,
            destination,
            length,
            successive: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Length in metres.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn successive(&self) -> &BTreeMap<String, NodeId> {
        &self.successive
    }

    pub(crate) fn set_successive(&mut self, successive: BTreeMap<String, NodeId>) {
        self.successive = successive;
    }

    pub fn is_wired(&self) -> bool {
        self.successive.contains_key(&self.destination)
    }

    /// Propagation delay across this link, in seconds.
    pub fn latency_generation(&self) -> f64 {
        self.length / (VELOCITY_FACTOR * SPEED_OF_LIGHT)
    }

    /// Noise added across this link for a given launch power, in watts.
    pub fn noise_generation(&self, signal_power: f64) -> f64 {
        NOISE_COEFFICIENT * signal_power * self.length
    }

    /// Link transition: accumulate noise and latency, then hand the signal to
    /// the node at the head of its remaining path.
    pub fn forward(
        &self,
        mut signal: SignalInformation,
    ) -> Result<(Cursor, SignalInformation), PropagationError> {
        signal.add_noise(self.noise_generation(signal.signal_power()));
        signal.add_latency(self.latency_generation());

        let next_node = signal.path().first().cloned().unwrap_or_default();
        let node = self
            .successive
            .get(&next_node)
            .copied()
            .ok_or_else(|| PropagationError::MissingNode {
                link: self.label.clone(),
                node: next_node,
            })?;
        Ok((Cursor::AtNode(node), signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(0.1, 7.3e5);
        let b = Position::new(-4.2e5, 1.9);
        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(Position::new(3.0, 0.0).distance(&Position::new(0.0, 4.0)), 5.0);
    }

    #[test]
    fn distance_survives_large_coordinates() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(1e200, 1e200);
        let d = a.distance(&b);
        assert!(d.is_finite());
        assert!((d / 1e200 - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert_eq!(d, b.distance(&a));

        let far = Position::new(-f64::MAX, 0.0).distance(&Position::new(f64::MAX, 0.0));
        assert_eq!(far, f64::INFINITY);
    }

    #[test]
    fn link_generation_formulas() {
        let link = Link::new("A".into(), "B".into(), 3.0e8);
        assert_eq!(link.label(), "AB");
        let expected_latency = 3.0e8 / (2.0 / 3.0 * SPEED_OF_LIGHT);
        assert!((link.latency_generation() - expected_latency).abs() < 1e-12);
        assert!((link.noise_generation(1e-3) - 1e-9 * 1e-3 * 3.0e8).abs() < 1e-15);
    }

    #[test]
    fn zero_length_link_adds_nothing() {
        let link = Link::new("A".into(), "B".into(), 0.0);
        assert_eq!(link.latency_generation(), 0.0);
        assert_eq!(link.noise_generation(1.0), 0.0);
    }

    #[test]
    fn unwired_node_fails_on_forward() {
        let node = Node::new("A".into(), Position::new(0.0, 0.0), vec!["B".into()]);
        assert!(!node.is_wired());
        let err = node
            .forward(SignalInformation::from_labels(1.0, ["A", "B"]))
            .unwrap_err();
        assert_eq!(
            err,
            PropagationError::MissingLink {
                node: "A".into(),
                link: "AB".into()
            }
        );
    }

    #[test]
    fn unwired_link_fails_on_forward() {
        let link = Link::new("A".into(), "B".into(), 10.0);
        assert!(!link.is_wired());
        let err = link
            .forward(SignalInformation::from_labels(1.0, ["B"]))
            .unwrap_err();
        assert!(matches!(err, PropagationError::MissingNode { .. }));
    }

    #[test]
    fn node_with_single_label_terminates() {
        let node = Node::new("A".into(), Position::new(0.0, 0.0), vec![]);
        let (cursor, signal) = node
            .forward(SignalInformation::from_labels(1.0, ["A"]))
            .unwrap();
        assert_eq!(cursor, Cursor::Terminated);
        assert_eq!(signal.path().len(), 1);
    }

    #[test]
    fn wired_node_and_link_hand_off() {
        let mut links: SlotMap<LinkId, ()> = SlotMap::with_key();
        let mut nodes: SlotMap<NodeId, ()> = SlotMap::with_key();
        let ab = links.insert(());
        let b = nodes.insert(());

        let mut node = Node::new("A".into(), Position::new(0.0, 0.0), vec!["B".into()]);
        node.set_successive(BTreeMap::from([("AB".to_string(), ab)]));
        let mut link = Link::new("A".into(), "B".into(), 1000.0);
        link.set_successive(BTreeMap::from([("B".to_string(), b)]));

        let (cursor, signal) = node
            .forward(SignalInformation::from_labels(1.0, ["A", "B"]))
            .unwrap();
        assert_eq!(cursor, Cursor::AtLink(ab));
        assert_eq!(signal.path(), &["B".to_string()]);

        let (cursor, signal) = link.forward(signal).unwrap();
        assert_eq!(cursor, Cursor::AtNode(b));
        assert_eq!(signal.noise_power(), link.noise_generation(1.0));
        assert_eq!(signal.latency(), link.latency_generation());
    }
}
