pub mod logger;
pub mod analyzer;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Energy,
    Latency,
    Trust,
    Detection,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Energy, Metric::Latency, Metric::Trust, Metric::Detection];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Energy => "energy",
            Metric::Latency => "latency",
            Metric::Trust => "trust",
            Metric::Detection => "detection",
        }
    }

    /// Only meaningful for protocols that keep trust scores.
    pub fn needs_trust(&self) -> bool {
        matches!(self, Metric::Trust | Metric::Detection)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundMetrics {
    pub round: usize,
    /// Joules spent network wide this round
    pub energy: f64,
    /// Seconds
    pub latency: f64,
    /// Mean trust of honest sensors
    pub trust: f64,
    /// Detected malicious / total malicious
    pub detection: f64,
}

/// The four per-round series of one run, index aligned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub protocol: String,
    pub seed: u64,
    /// False when trust and detection are placeholders (PoW)
    pub tracks_trust: bool,
    pub energy: Vec<f64>,
    pub latency: Vec<f64>,
    pub trust: Vec<f64>,
    pub detection: Vec<f64>,
}

impl RunMetrics {
    pub fn new(protocol: impl Into<String>, seed: u64, tracks_trust: bool) -> Self {
        Self {
            protocol: protocol.into(),
            seed,
            tracks_trust,
            ..Default::default()
        }
    }

    pub fn push(&mut self, round: &RoundMetrics) {
        self.energy.push(round.energy);
        self.latency.push(round.latency);
        self.trust.push(round.trust);
        self.detection.push(round.detection);
    }

    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    pub fn round(&self, round: usize) -> Option<RoundMetrics> {
        Some(RoundMetrics {
            round,
            energy: *self.energy.get(round)?,
            latency: *self.latency.get(round)?,
            trust: *self.trust.get(round)?,
            detection: *self.detection.get(round)?,
        })
    }

    pub fn rounds(&self) -> impl Iterator<Item = RoundMetrics> + '_ {
        (0..self.len()).filter_map(|r| self.round(r))
    }

    pub fn series(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Energy => &self.energy,
            Metric::Latency => &self.latency,
            Metric::Trust => &self.trust,
            Metric::Detection => &self.detection,
        }
    }

    pub fn total_energy(&self) -> f64 {
        self.energy.iter().sum()
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
