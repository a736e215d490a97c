use crate::network::{NetworkSnapshot, NodeId};

/// One gateway and the sensors reporting to it this round. Indices are
/// snapshot node indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub gateway: usize,
    pub sensors: Vec<usize>,
}

/// Gateway -> sensors for a single round, one entry per gateway in gateway
/// order (inactive gateways keep an empty entry).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clusters {
    clusters: Vec<Cluster>,
}

impl Clusters {
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn assigned(&self) -> usize {
        self.clusters.iter().map(|c| c.sensors.len()).sum()
    }

    /// Sensors assigned to `gateway`, if it is a gateway of this network.
    pub fn members(&self, network: &NetworkSnapshot, gateway: NodeId) -> Option<&[usize]> {
        let index = network.index_of(gateway).filter(|_| gateway.is_gateway())?;
        self.clusters
            .iter()
            .find(|c| c.gateway == index)
            .map(|c| c.sensors.as_slice())
    }
}

/// Assigns every active sensor to its nearest active gateway. Ties go to the
/// lower gateway index.
pub fn form_clusters(network: &NetworkSnapshot) -> Clusters {
    let mut clusters: Vec<Cluster> = network
        .gateway_indices()
        .map(|gateway| Cluster {
            gateway,
            sensors: Vec::new(),
        })
        .collect();

    let active_gateways: Vec<usize> = network
        .gateway_indices()
        .filter(|&g| network.node(g).is_active())
        .collect();

    if active_gateways.is_empty() {
        return Clusters { clusters };
    }

    let first_gateway = network.gateway_indices().start;
    for sensor in network.sensor_indices() {
        if !network.node(sensor).is_active() {
            continue;
        }

        let mut best = active_gateways[0];
        let mut best_distance = network.distance(sensor, best);
        for &gateway in &active_gateways[1..] {
            let d = network.distance(sensor, gateway);
            if d < best_distance {
                best = gateway;
                best_distance = d;
            }
        }

        clusters[best - first_gateway].sensors.push(sensor);
    }

    Clusters { clusters }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Node, Position, TopologyConfig};

    fn line_network() -> NetworkSnapshot {
        let nodes = vec![
            Node::sensor(0, Position::new(1.0, 0.0), 0.5, 0.5, false),
            Node::sensor(1, Position::new(9.0, 0.0), 0.5, 0.5, false),
            Node::sensor(2, Position::new(5.0, 0.0), 0.5, 0.5, true),
            Node::gateway(0, Position::new(0.0, 0.0), 2.0, 0.9),
            Node::gateway(1, Position::new(10.0, 0.0), 2.0, 0.9),
        ];
        NetworkSnapshot::from_nodes(nodes, 30.0).unwrap()
    }

    #[test]
    fn sensors_join_nearest_gateway() {
        let network = line_network();
        let clusters = form_clusters(&network);

        // S2 is equidistant and goes to the first gateway
        assert_eq!(clusters.members(&network, NodeId::Gateway(0)), Some(&[0, 2][..]));
        assert_eq!(clusters.members(&network, NodeId::Gateway(1)), Some(&[1][..]));
        assert_eq!(clusters.assigned(), 3);
    }

    #[test]
    fn depleted_nodes_are_left_out() {
        let mut network = line_network();
        network.node_mut(0).energy = 0.0;
        let g0 = network.index_of(NodeId::Gateway(0)).unwrap();
        network.node_mut(g0).energy = 0.0;

        let clusters = form_clusters(&network);
        assert_eq!(clusters.members(&network, NodeId::Gateway(0)), Some(&[][..]));
        assert_eq!(clusters.members(&network, NodeId::Gateway(1)), Some(&[1, 2][..]));
    }

    #[test]
    fn no_active_gateway_gives_empty_clusters() {
        let mut network = line_network();
        for g in network.gateway_indices() {
            network.node_mut(g).energy = 0.0;
        }

        let clusters = form_clusters(&network);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters.assigned(), 0);
    }

    #[test]
    fn forming_twice_gives_the_same_assignment() {
        let network = NetworkSnapshot::generate(&TopologyConfig::default(), 11);
        assert_eq!(form_clusters(&network), form_clusters(&network));
    }

    #[test]
    fn members_rejects_sensor_ids() {
        let network = line_network();
        let clusters = form_clusters(&network);
        assert_eq!(clusters.members(&network, NodeId::Sensor(0)), None);
    }
}
