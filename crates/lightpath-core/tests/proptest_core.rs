//! Property-based tests for path enumeration and propagation.
//!
//! Uses proptest to generate random small topologies, then checks the
//! structural and accumulation invariants on every enumerated path.

use lightpath_core::element::link_label;
use lightpath_core::graph::{Network, TopologyDescription};
use lightpath_core::propagate::Cursor;
use lightpath_core::signal::SignalInformation;
use proptest::prelude::*;
use std::collections::BTreeSet;

// ===========================================================================
// Generators
// ===========================================================================

/// Random directed topology with up to `max_nodes` nodes.
fn arb_description(max_nodes: usize) -> impl Strategy<Value = TopologyDescription> {
    (2..=max_nodes).prop_flat_map(|n| {
        (
            proptest::collection::vec((-1.0e6..1.0e6f64, -1.0e6..1.0e6f64), n),
            proptest::collection::vec(any::<bool>(), n * n),
        )
            .prop_map(move |(positions, edges)| {
                let mut description = TopologyDescription::new();
                for (i, &(x, y)) in positions.iter().enumerate() {
                    let neighbors: Vec<String> = (0..n)
                        .filter(|&j| j != i && edges[i * n + j])
                        .map(|j| format!("N{j}"))
                        .collect();
                    description.insert(&format!("N{i}"), [x, y], neighbors);
                }
                description
            })
    })
}

/// Same as [`arb_description`] but every adjacency is mirrored.
fn arb_symmetric_description(max_nodes: usize) -> impl Strategy<Value = TopologyDescription> {
    arb_description(max_nodes).prop_map(|mut description| {
        let pairs: Vec<(String, String)> = description
            .nodes
            .iter()
            .flat_map(|(a, node)| node.connected_nodes.iter().map(move |b| (a.clone(), b.clone())))
            .collect();
        for (a, b) in pairs {
            if let Some(back) = description.nodes.get_mut(&b)
                && !back.connected_nodes.contains(&a)
            {
                back.connected_nodes.push(a);
            }
        }
        description
    })
}

/// Reference enumeration by plain recursion, independent of the engine.
fn reference_paths(description: &TopologyDescription, source: &str, destination: &str) -> BTreeSet<Vec<String>> {
    fn walk(
        description: &TopologyDescription,
        path: &mut Vec<String>,
        destination: &str,
        out: &mut BTreeSet<Vec<String>>,
    ) {
        let Some(current) = path.last().cloned() else {
            return;
        };
        if current == destination {
            out.insert(path.clone());
            return;
        }
        for next in &description.nodes[&current].connected_nodes {
            if !path.contains(next) {
                path.push(next.clone());
                walk(description, path, destination, out);
                path.pop();
            }
        }
    }

    let mut out = BTreeSet::new();
    walk(description, &mut vec![source.to_string()], destination, &mut out);
    out
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every returned path is simple, starts at the source, ends at the
    /// destination and only uses declared adjacencies.
    #[test]
    fn paths_are_simple_and_complete(description in arb_description(6)) {
        let network = Network::from_description(&description).unwrap();
        for (a, b) in network.all_pairs() {
            for path in network.find_paths(a, b).unwrap() {
                let unique: BTreeSet<_> = path.iter().collect();
                prop_assert_eq!(unique.len(), path.len());
                prop_assert_eq!(path.first().map(String::as_str), Some(a));
                prop_assert_eq!(path.last().map(String::as_str), Some(b));
                for hop in path.windows(2) {
                    prop_assert!(network.node(&hop[0]).unwrap().connected_nodes().contains(&hop[1]));
                }
            }
        }
    }

    /// The engine finds exactly the reference set, with no duplicates.
    #[test]
    fn enumeration_is_exhaustive(description in arb_description(6)) {
        let network = Network::from_description(&description).unwrap();
        for (a, b) in network.all_pairs() {
            let found = network.find_paths(a, b).unwrap();
            let as_set: BTreeSet<_> = found.iter().cloned().collect();
            prop_assert_eq!(as_set.len(), found.len());
            prop_assert_eq!(as_set, reference_paths(&description, a, b));
        }
    }

    /// Noise and latency never decrease at any transition, and the run ends
    /// with only the destination left in the path.
    #[test]
    fn accumulation_is_monotonic(description in arb_description(5), power in 1e-6..1.0f64) {
        let network = Network::from_description(&description).unwrap();
        for (a, b) in network.all_pairs() {
            for path in network.find_paths(a, b).unwrap() {
                let mut run = network.propagation(SignalInformation::new(power, path)).unwrap();
                let (mut noise, mut latency) = (0.0, 0.0);
                while run.step().unwrap() != Cursor::Terminated {
                    prop_assert!(run.signal().noise_power() >= noise);
                    prop_assert!(run.signal().latency() >= latency);
                    prop_assert_eq!(run.signal().signal_power(), power);
                    noise = run.signal().noise_power();
                    latency = run.signal().latency();
                }
                prop_assert!(run.signal().noise_power() >= 0.0);
                prop_assert_eq!(run.signal().path(), &[b.to_string()]);
            }
        }
    }

    /// Totals equal the per-link sums along the path.
    #[test]
    fn totals_are_additive(description in arb_description(5)) {
        let network = Network::from_description(&description).unwrap();
        for (a, b) in network.all_pairs() {
            for path in network.find_paths(a, b).unwrap() {
                let m = network.simulate_path(&path, 1e-3).unwrap();
                let (mut latency, mut noise) = (0.0, 0.0);
                for hop in path.windows(2) {
                    let link = network.link(&link_label(&hop[0], &hop[1])).unwrap();
                    latency += link.latency_generation();
                    noise += link.noise_generation(1e-3);
                }
                prop_assert_eq!(m.latency, latency);
                prop_assert_eq!(m.noise_power, noise);
            }
        }
    }

    /// Reversed links of a mirrored adjacency have bit-identical lengths.
    #[test]
    fn reversed_links_are_symmetric(description in arb_symmetric_description(6)) {
        let network = Network::from_description(&description).unwrap();
        for line in network.lines() {
            let back = network.link(&link_label(line.destination(), line.source())).unwrap();
            prop_assert_eq!(line.length(), back.length());
        }
    }

    /// Two independent builds of the same description produce identical
    /// enumeration order and metrics.
    #[test]
    fn simulation_is_deterministic(description in arb_description(5)) {
        let first = Network::from_description(&description).unwrap();
        let second = Network::from_description(&description).unwrap();
        for (a, b) in first.all_pairs() {
            prop_assert_eq!(first.find_paths(a, b).unwrap(), second.find_paths(a, b).unwrap());
        }
        let config = lightpath_core::config::SimulationConfig::default();
        prop_assert_eq!(first.simulate_all(&config).unwrap(), second.simulate_all(&config).unwrap());
    }
}
