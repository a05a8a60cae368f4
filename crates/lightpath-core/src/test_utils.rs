//! Shared fixture topologies for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::graph::{Network, TopologyDescription};

// ===========================================================================
// Descriptions
// ===========================================================================

/// Two nodes `length` metres apart, connected both ways.
pub fn two_node_line(length: f64) -> TopologyDescription {
    TopologyDescription::new()
        .with_node("A", [0.0, 0.0], ["B"])
        .with_node("B", [0.0, length], ["A"])
}

/// Fully connected 3-4-5 triangle (300 km, 400 km, 500 km sides).
pub fn triangle() -> TopologyDescription {
    TopologyDescription::new()
        .with_node("A", [0.0, 0.0], ["B", "C"])
        .with_node("B", [300_000.0, 0.0], ["A", "C"])
        .with_node("C", [0.0, 400_000.0], ["A", "B"])
}

/// Six-node regional mesh with bidirectional links, positions in metres.
pub fn six_node_mesh() -> TopologyDescription {
    TopologyDescription::new()
        .with_node("A", [-350_000.0, 150_000.0], ["B", "C", "D"])
        .with_node("B", [-100_000.0, 400_000.0], ["A", "D", "F"])
        .with_node("C", [-450_000.0, -250_000.0], ["A", "D", "E"])
        .with_node("D", [100_000.0, 0.0], ["A", "B", "C", "E", "F"])
        .with_node("E", [50_000.0, -400_000.0], ["C", "D", "F"])
        .with_node("F", [450_000.0, 300_000.0], ["B", "D", "E"])
}

/// `n` nodes on a line, each linked both ways to its neighbors, `spacing`
/// metres apart. Labels are `N0`, `N1`, ...
pub fn chain(n: usize, spacing: f64) -> TopologyDescription {
    let mut description = TopologyDescription::new();
    for i in 0..n {
        let mut neighbors = Vec::new();
        if i > 0 {
            neighbors.push(format!("N{}", i - 1));
        }
        if i + 1 < n {
            neighbors.push(format!("N{}", i + 1));
        }
        description.insert(&format!("N{i}"), [i as f64 * spacing, 0.0], neighbors);
    }
    description
}

// ===========================================================================
// Wired networks
// ===========================================================================

pub fn triangle_network() -> Network {
    Network::from_description(&triangle()).expect("triangle fixture is valid")
}

pub fn mesh_network() -> Network {
    Network::from_description(&six_node_mesh()).expect("mesh fixture is valid")
}
