//! Lightpath Core -- signal propagation over a fixed optical network topology.
//!
//! This crate provides the topology graph (nodes and directed links), the
//! exhaustive simple-path search, and the propagation state machine that
//! drives a signal along a path while it accumulates latency and noise.
//!
//! # Pipeline
//!
//! 1. **Build** -- [`graph::Topology::build`] creates nodes and one directed
//!    link per declared adjacency, with lengths derived from node positions.
//! 2. **Wire** -- [`graph::Topology::connect`] fills the node -> link and
//!    link -> node successor maps.
//! 3. **Freeze** -- [`graph::Topology::into_network`] hands back an immutable
//!    [`graph::Network`]; simulation code never sees an unwired graph.
//! 4. **Enumerate** -- [`graph::Network::find_paths`] lists every simple path
//!    between two labels.
//! 5. **Propagate** -- [`graph::Network::propagate`] walks a
//!    [`signal::SignalInformation`] through alternating node and link
//!    transitions until one label remains in its path.
//!
//! ```rust
//! use lightpath_core::graph::{Network, TopologyDescription};
//! use lightpath_core::signal::SignalInformation;
//!
//! let description = TopologyDescription::new()
//!     .with_node("A", [0.0, 0.0], ["B"])
//!     .with_node("B", [0.0, 1000.0], ["A"]);
//! let network = Network::from_description(&description).unwrap();
//!
//! let paths = network.find_paths("A", "B").unwrap();
//! assert_eq!(paths, vec![vec!["A".to_string(), "B".to_string()]]);
//!
//! let signal = network
//!     .propagate(SignalInformation::new(1e-3, paths[0].clone()))
//!     .unwrap();
//! assert!(signal.latency() > 0.0);
//! ```
//!
//! # Key Types
//!
//! - [`graph::Network`] -- Wired, read-only topology. `Sync`, so it can be
//!   shared across parallel propagation runs.
//! - [`element::Node`] / [`element::Link`] -- Graph elements and their
//!   single-step transitions.
//! - [`propagate::Propagation`] -- Explicit `AtNode -> AtLink -> ... ->
//!   Terminated` state machine.
//! - [`metrics::PathMetrics`] -- Per-path latency, noise and SNR.

pub mod config;
pub mod element;
pub mod graph;
pub mod id;
pub mod metrics;
pub mod paths;
pub mod propagate;
pub mod signal;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
