// Hybrid Dynamic Proof-of-Authority: a gateway may validate only while it
// still has energy and its trust is at or above the threshold.

use crate::network::{NetworkSnapshot, NodeId};

/// Eligible validators among gateways `G0..G{num_gateways-1}`, in gateway
/// order. Ids missing from the network are skipped.
pub fn select_validators(network: &NetworkSnapshot, num_gateways: usize, trust_threshold: f64) -> Vec<NodeId> {
    (0..num_gateways)
        .map(NodeId::Gateway)
        .filter(|&id| {
            network
                .get(id)
                .is_some_and(|node| node.is_active() && node.trust >= trust_threshold)
        })
        .collect()
}
