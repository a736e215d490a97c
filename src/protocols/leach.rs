use super::Protocol;
use crate::network::NetworkSnapshot;
use crate::simulation::SimConfig;
use crate::trust::{TrustSample, fixed_blend};
use rand::rngs::StdRng;

const HISTORY_WEIGHT: f64 = 0.7;
const REPUTATION_REWARD: f64 = 0.8;
const REPUTATION_PENALTY: f64 = 0.2;
const DETECTION_THRESHOLD: f64 = 0.5;

/// LEACH style clustering with a naive fixed-weight trust score and no
/// consensus step.
#[derive(Debug, Clone)]
pub struct Leach {
    latency_overhead: f64,
}

impl Leach {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            latency_overhead: config.latency.leach,
        }
    }
}

impl Protocol for Leach {
    fn name(&self) -> &str {
        "LEACH"
    }

    fn reputation(&self, behaves_maliciously: bool) -> f64 {
        if behaves_maliciously {
            REPUTATION_PENALTY
        } else {
            REPUTATION_REWARD
        }
    }

    fn update_trust(&self, sample: TrustSample) -> f64 {
        fixed_blend(sample.prior, sample.reputation, HISTORY_WEIGHT)
    }

    fn detection_threshold(&self) -> f64 {
        DETECTION_THRESHOLD
    }

    fn settle(&self, _round: usize, _network: &mut NetworkSnapshot, _rng: &mut StdRng) -> f64 {
        0.0
    }

    fn latency_overhead(&self) -> f64 {
        self.latency_overhead
    }
}
