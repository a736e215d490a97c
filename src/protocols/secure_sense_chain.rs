use super::Protocol;
use crate::consensus::select_validators;
use crate::network::NetworkSnapshot;
use crate::simulation::SimConfig;
use crate::trust::{TrustModel, TrustSample};
use rand::rngs::StdRng;

/// Cluster relay with decaying-weight trust and periodic HDPoA validation
/// among trusted gateways.
#[derive(Debug, Clone)]
pub struct SecureSenseChain {
    trust: TrustModel,
    reputation_reward: f64,
    reputation_penalty: f64,
    trust_threshold: f64,
    consensus_interval: usize,
    validator_cost: f64,
    latency_overhead: f64,
}

impl SecureSenseChain {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            trust: TrustModel::from_config(config),
            reputation_reward: config.reputation_reward,
            reputation_penalty: config.reputation_penalty,
            trust_threshold: config.trust_threshold,
            consensus_interval: config.consensus_interval,
            validator_cost: config.energy_per_consensus_round,
            latency_overhead: config.latency.secure_sense_chain,
        }
    }

    fn is_consensus_round(&self, round: usize) -> bool {
        self.consensus_interval > 0 && round % self.consensus_interval == 0
    }
}

impl Protocol for SecureSenseChain {
    fn name(&self) -> &str {
        "SecureSenseChain"
    }

    fn reputation(&self, behaves_maliciously: bool) -> f64 {
        if behaves_maliciously {
            self.reputation_penalty
        } else {
            self.reputation_reward
        }
    }

    fn update_trust(&self, sample: TrustSample) -> f64 {
        self.trust.update(sample)
    }

    fn detection_threshold(&self) -> f64 {
        self.trust_threshold
    }

    fn settle(&self, round: usize, network: &mut NetworkSnapshot, _rng: &mut StdRng) -> f64 {
        if !self.is_consensus_round(round) {
            return 0.0;
        }

        let validators = select_validators(network, network.num_gateways(), self.trust_threshold);
        let mut spent = 0.0;
        for id in validators {
            if let Some(index) = network.index_of(id) {
                if network.node_mut(index).try_spend(self.validator_cost) {
                    spent += self.validator_cost;
                }
            }
        }
        spent
    }

    fn latency_overhead(&self) -> f64 {
        self.latency_overhead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Node, NodeId, Position};
    use rand::SeedableRng;

    fn network() -> NetworkSnapshot {
        let nodes = vec![
            Node::gateway(0, Position::new(0.0, 0.0), 2.0, 0.9),
            Node::gateway(1, Position::new(5.0, 0.0), 2.0, 0.3),
            Node::gateway(2, Position::new(9.0, 0.0), 0.00005, 0.9),
        ];
        NetworkSnapshot::from_nodes(nodes, 30.0).unwrap()
    }

    #[test]
    fn validators_pay_on_consensus_rounds_only() {
        let protocol = SecureSenseChain::new(&SimConfig::default());
        let mut network = network();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(protocol.settle(3, &mut network, &mut rng), 0.0);

        let spent = protocol.settle(10, &mut network, &mut rng);
        // G1 is untrusted and G2 cannot afford the charge
        assert_eq!(spent, 0.0001);
        assert_eq!(network.get(NodeId::Gateway(0)).unwrap().energy, 2.0 - 0.0001);
        assert_eq!(network.get(NodeId::Gateway(1)).unwrap().energy, 2.0);
        assert_eq!(network.get(NodeId::Gateway(2)).unwrap().energy, 0.00005);
    }

    #[test]
    fn reputation_follows_behaviour() {
        let protocol = SecureSenseChain::new(&SimConfig::default());
        assert_eq!(protocol.reputation(true), 0.1);
        assert_eq!(protocol.reputation(false), 0.9);
    }
}
