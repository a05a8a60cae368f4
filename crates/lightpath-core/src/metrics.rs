//! Per-path quality metrics and the all-pairs simulation driver.

use crate::config::{ConfigError, SimulationConfig};
use crate::graph::Network;
use crate::paths::{Path, PathError};
use crate::propagate::PropagationError;
use crate::signal::SignalInformation;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Errors from a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Propagation(#[from] PropagationError),
}

/// Final accumulated values for one simulated path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    pub source: String,
    pub destination: String,
    pub path: Path,
    /// Seconds.
    pub latency: f64,
    /// Watts.
    pub noise_power: f64,
    /// Watts.
    pub signal_power: f64,
    /// Decibels. `+inf` when no noise was accumulated. Non-finite values
    /// are written as the strings `"inf"`, `"-inf"` or `"NaN"`.
    #[serde(with = "float_or_text")]
    pub snr_db: f64,
}

/// Serde adapter for floats that may be non-finite. Formats without an
/// infinity literal (JSON writes `null`) get a string instead, which parses
/// back to the same value.
mod float_or_text {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.collect_str(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text.parse().map_err(|_| {
                serde::de::Error::custom(format!("expected a number, inf or NaN, got '{text}'"))
            }),
        }
    }
}

impl PathMetrics {
    /// Read the metrics off a propagated signal. `path` is the full original
    /// path, since the signal itself only keeps the destination.
    pub fn from_signal(path: Path, signal: &SignalInformation) -> Self {
        Self {
            source: path.first().cloned().unwrap_or_default(),
            destination: path.last().cloned().unwrap_or_default(),
            path,
            latency: signal.latency(),
            noise_power: signal.noise_power(),
            signal_power: signal.signal_power(),
            snr_db: signal.snr_db(),
        }
    }

    /// `A->B->C`.
    pub fn path_string(&self) -> String {
        self.path.join("->")
    }
}

impl Network {
    /// Propagate a fresh signal of `input_power` watts along `path`.
    pub fn simulate_path(
        &self,
        path: &[String],
        input_power: f64,
    ) -> Result<PathMetrics, PropagationError> {
        let signal = self.propagate(SignalInformation::new(input_power, path.to_vec()))?;
        let metrics = PathMetrics::from_signal(path.to_vec(), &signal);
        if metrics.snr_db.is_infinite() {
            warn!(path = %metrics.path_string(), "no accumulated noise, SNR is infinite");
        }
        Ok(metrics)
    }

    /// Enumerate and simulate every path of every configured pair.
    ///
    /// Output order is pair order (label order when `pairs` is `None`), then
    /// path discovery order within a pair. The `parallel` feature spreads the
    /// per-path work over rayon and keeps the same order.
    pub fn simulate_all(
        &self,
        config: &SimulationConfig,
    ) -> Result<Vec<PathMetrics>, SimulationError> {
        config.validate()?;

        let pairs: Vec<(String, String)> = match &config.pairs {
            Some(pairs) => pairs.clone(),
            None => self
                .all_pairs()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        };

        let mut tasks: Vec<Path> = Vec::new();
        for (source, destination) in &pairs {
            tasks.extend(self.find_paths(source, destination)?);
        }

        let metrics = self.run_tasks(&tasks, config.input_power)?;
        debug!(pairs = pairs.len(), paths = metrics.len(), "simulation complete");
        Ok(metrics)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_tasks(
        &self,
        tasks: &[Path],
        input_power: f64,
    ) -> Result<Vec<PathMetrics>, PropagationError> {
        tasks
            .iter()
            .map(|path| self.simulate_path(path, input_power))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn run_tasks(
        &self,
        tasks: &[Path],
        input_power: f64,
    ) -> Result<Vec<PathMetrics>, PropagationError> {
        use rayon::prelude::*;

        tasks
            .par_iter()
            .map(|path| self.simulate_path(path, input_power))
            .collect()
    }
}
