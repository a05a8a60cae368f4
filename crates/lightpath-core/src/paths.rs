//! Exhaustive simple-path enumeration.
//!
//! Depth-first with an explicit LIFO frontier, so result order is fixed by
//! neighbor declaration order alone and there is no recursion depth limit.

use crate::element::Node;
use crate::graph::Network;

/// Ordered node labels from source to destination.
pub type Path = Vec<String>;

/// Errors from path queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("unknown node '{0}'")]
    UnknownNode(String),
}

impl Network {
    /// All simple paths from `source` to `destination`.
    ///
    /// Unknown endpoints are an error rather than an empty result. When
    /// `source == destination` the single-label path is the only result.
    pub fn find_paths(&self, source: &str, destination: &str) -> Result<Vec<Path>, PathError> {
        let start = self
            .node(source)
            .ok_or_else(|| PathError::UnknownNode(source.to_string()))?;
        if self.node(destination).is_none() {
            return Err(PathError::UnknownNode(destination.to_string()));
        }

        let mut paths = Vec::new();
        let mut frontier: Vec<(&Node, Path)> = vec![(start, vec![source.to_string()])];

        while let Some((node, path)) = frontier.pop() {
            if node.label() == destination {
                paths.push(path);
                continue;
            }
            for neighbor in node.connected_nodes() {
                if path.contains(neighbor) {
                    continue;
                }
                // Neighbors were resolved when the topology was built.
                let Some(next) = self.node(neighbor) else {
                    continue;
                };
                let mut extended = Vec::with_capacity(path.len() + 1);
                extended.extend_from_slice(&path);
                extended.push(neighbor.clone());
                frontier.push((next, extended));
            }
        }

        Ok(paths)
    }

    /// Every ordered `(source, destination)` pair of distinct labels, in label
    /// order.
    pub fn all_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels().flat_map(move |source| {
            self.labels()
                .filter(move |&destination| destination != source)
                .map(move |destination| (source, destination))
        })
    }
}
