use serde::{Deserialize, Serialize};

/// In-flight signal state: remaining power, accumulated impairments, and the
/// labels still to be visited.
///
/// A fresh value is created per simulated path and moved through every
/// transition of one propagation run. It is never shared between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalInformation {
    signal_power: f64,
    noise_power: f64,
    latency: f64,
    path: Vec<String>,
}

impl SignalInformation {
    /// Create a signal with `signal_power` watts, zero noise and zero latency.
    pub fn new(signal_power: f64, path: Vec<String>) -> Self {
        Self {
            signal_power,
            noise_power: 0.0,
            latency: 0.0,
            path,
        }
    }

    /// Convenience constructor from any iterator of labels.
    pub fn from_labels<I, S>(signal_power: f64, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(signal_power, labels.into_iter().map(Into::into).collect())
    }

    pub fn signal_power(&self) -> f64 {
        self.signal_power
    }

    pub fn noise_power(&self) -> f64 {
        self.noise_power
    }

    pub fn latency(&self) -> f64 {
        self.latency
    }

    /// Labels not yet consumed. The first entry is the node the signal is at
    /// (or heading to, while on a link).
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Reduce the signal power by `decrement` watts. Power never goes below zero
    /// and never increases.
    pub fn attenuate(&mut self, decrement: f64) {
        if decrement.is_finite() && decrement > 0.0 {
            self.signal_power = (self.signal_power - decrement).max(0.0);
        }
    }

    /// Accumulate noise. Negative and NaN increments are ignored so the
    /// accumulator stays non-decreasing. `+inf` is kept and saturates it.
    pub fn add_noise(&mut self, increment: f64) {
        if increment > 0.0 {
            self.noise_power += increment;
        }
    }

    /// Accumulate latency. Same monotonic rule as [`add_noise`](Self::add_noise).
    pub fn add_latency(&mut self, increment: f64) {
        if increment > 0.0 {
            self.latency += increment;
        }
    }

    /// Consume the visited node at the head of the path.
    pub(crate) fn advance(&mut self) -> Option<String> {
        if self.path.is_empty() {
            None
        } else {
            Some(self.path.remove(0))
        }
    }

    /// Signal-to-noise ratio in decibels. See [`snr_db`].
    pub fn snr_db(&self) -> f64 {
        snr_db(self.signal_power, self.noise_power)
    }
}

/// `10 * log10(signal / noise)`.
///
/// Zero noise with positive signal yields `+inf`; zero signal and zero noise
/// yields NaN. Neither case panics.
pub fn snr_db(signal_power: f64, noise_power: f64) -> f64 {
    10.0 * (signal_power / noise_power).log10()
}
