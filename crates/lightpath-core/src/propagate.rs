//! Propagation state machine.
//!
//! A signal alternates between nodes and links following its remaining path:
//! `AtNode -> AtLink -> AtNode -> ... -> Terminated`. The only exit is a node
//! seeing a single label left in the path. Each [`Propagation::step`] runs
//! one transition, so callers can observe the accumulators between hops.

use crate::graph::Network;
use crate::id::{LinkId, NodeId};
use crate::signal::SignalInformation;
use tracing::trace;

/// Errors raised while driving a signal. All of them abort the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropagationError {
    #[error("signal path is empty")]
    EmptyPath,
    #[error("path starts at unknown node '{0}'")]
    UnknownStart(String),
    #[error("node '{node}' has no outgoing link '{link}'")]
    MissingLink { node: String, link: String },
    #[error("link '{link}' does not lead to node '{node}'")]
    MissingNode { link: String, node: String },
}

/// Where the signal currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    AtNode(NodeId),
    AtLink(LinkId),
    Terminated,
}

/// One in-progress propagation run over a borrowed network.
#[derive(Debug)]
pub struct Propagation<'a> {
    network: &'a Network,
    cursor: Cursor,
    signal: SignalInformation,
}

impl Propagation<'_> {
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn signal(&self) -> &SignalInformation {
        &self.signal
    }

    pub fn is_terminated(&self) -> bool {
        self.cursor == Cursor::Terminated
    }

    /// Run one transition and return the new cursor. Stepping a terminated
    /// run is a no-op. After an error the run is terminated and its signal
    /// is reset to the default value.
    pub fn step(&mut self) -> Result<Cursor, PropagationError> {
        let signal = std::mem::take(&mut self.signal);
        let outcome = match self.cursor {
            Cursor::AtNode(id) => self.network.node_by_id(id).forward(signal),
            Cursor::AtLink(id) => self.network.link_by_id(id).forward(signal),
            Cursor::Terminated => Ok((Cursor::Terminated, signal)),
        };

        match outcome {
            Ok((cursor, signal)) => {
                trace!(
                    ?cursor,
                    remaining = signal.path().len(),
                    noise = signal.noise_power(),
                    latency = signal.latency(),
                    "transition"
                );
                self.cursor = cursor;
                self.signal = signal;
                Ok(cursor)
            }
            Err(e) => {
                self.cursor = Cursor::Terminated;
                Err(e)
            }
        }
    }

    /// Step until terminated and hand back the final signal.
    pub fn run(mut self) -> Result<SignalInformation, PropagationError> {
        while !self.is_terminated() {
            self.step()?;
        }
        Ok(self.signal)
    }
}

impl Network {
    /// Start a propagation run at the node named by the head of the signal's
    /// path. Empty paths are rejected here.
    pub fn propagation(
        &self,
        signal: SignalInformation,
    ) -> Result<Propagation<'_>, PropagationError> {
        let first = signal.path().first().ok_or(PropagationError::EmptyPath)?;
        let start = self
            .node_id(first)
            .ok_or_else(|| PropagationError::UnknownStart(first.clone()))?;
        Ok(Propagation {
            network: self,
            cursor: Cursor::AtNode(start),
            signal,
        })
    }

    /// Drive `signal` along its path and return it with final latency and
    /// noise. On success exactly one label (the destination) remains in the
    /// path. A single-label path is valid and comes back with zero latency
    /// and zero noise.
    pub fn propagate(
        &self,
        signal: SignalInformation,
    ) -> Result<SignalInformation, PropagationError> {
        self.propagation(signal)?.run()
    }
}
