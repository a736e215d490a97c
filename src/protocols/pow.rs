use super::Protocol;
use crate::energy::EnergyModel;
use crate::network::NetworkSnapshot;
use crate::simulation::SimConfig;
use crate::trust::TrustSample;
use rand::rngs::StdRng;
use rand::seq::index;

/// Proof-of-Work baseline: no clustering or trust, a random slice of the live
/// nodes burns a large mining cost every round.
#[derive(Debug, Clone)]
pub struct ProofOfWork {
    miner_ratio: f64,
    mining_cost: f64,
    latency_overhead: f64,
}

impl ProofOfWork {
    pub fn new(config: &SimConfig) -> Self {
        let energy = EnergyModel::from_config(config);
        Self {
            miner_ratio: config.pow_miner_ratio,
            mining_cost: energy.transmit_cost(config.area_size / 2.0) * config.pow_energy_intensity_factor,
            latency_overhead: config.latency.pow,
        }
    }

    pub fn mining_cost(&self) -> f64 {
        self.mining_cost
    }

    /// At least one miner while anyone is alive.
    pub fn miner_count(&self, active: usize) -> usize {
        if active == 0 {
            return 0;
        }
        ((active as f64 * self.miner_ratio) as usize).clamp(1, active)
    }
}

impl Protocol for ProofOfWork {
    fn name(&self) -> &str {
        "PoW"
    }

    fn forms_clusters(&self) -> bool {
        false
    }

    fn tracks_trust(&self) -> bool {
        false
    }

    fn reputation(&self, _behaves_maliciously: bool) -> f64 {
        0.0
    }

    fn update_trust(&self, sample: TrustSample) -> f64 {
        sample.prior
    }

    fn detection_threshold(&self) -> f64 {
        0.0
    }

    fn settle(&self, _round: usize, network: &mut NetworkSnapshot, rng: &mut StdRng) -> f64 {
        let active = network.active_indices();
        let miners = self.miner_count(active.len());
        if miners == 0 {
            return 0.0;
        }

        let mut spent = 0.0;
        for pick in index::sample(rng, active.len(), miners).iter() {
            if network.node_mut(active[pick]).try_spend(self.mining_cost) {
                spent += self.mining_cost;
            }
        }
        spent
    }

    fn latency_overhead(&self) -> f64 {
        self.latency_overhead
    }
}
