use super::node::{Node, NodeId, Position};
use anyhow::{Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub num_sensors: usize,
    pub num_gateways: usize,
    pub area_size: f64,
    pub communication_range: f64,
    pub initial_energy_sensor: f64,
    pub initial_energy_gateway: f64,
    pub initial_trust: f64,
    pub gateway_trust: f64,
    /// Chance that a sensor is created malicious
    pub malicious_prob: f64,
    pub min_malicious: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            num_sensors: 100,
            num_gateways: 5,
            area_size: 100.0,
            communication_range: 30.0,
            initial_energy_sensor: 0.5,
            initial_energy_gateway: 2.0,
            initial_trust: 0.5,
            gateway_trust: 0.9,
            malicious_prob: 0.1,
            min_malicious: 5,
        }
    }
}

/// Immutable half of a snapshot: where nodes sit and who can hear whom.
/// Shared between every copy of a snapshot.
#[derive(Debug)]
pub struct Topology {
    num_sensors: usize,
    num_gateways: usize,
    communication_range: f64,
    // Row-major, len * len
    distances: Vec<f64>,
    neighbors: Vec<Vec<usize>>,
}

impl Topology {
    fn build(positions: &[Position], num_sensors: usize, communication_range: f64) -> Self {
        let n = positions.len();
        let mut distances = vec![0.0; n * n];
        let mut neighbors = vec![Vec::new(); n];

        for a in 0..n {
            for b in (a + 1)..n {
                let d = positions[a].distance(&positions[b]);
                distances[a * n + b] = d;
                distances[b * n + a] = d;
                if d <= communication_range {
                    neighbors[a].push(b);
                    neighbors[b].push(a);
                }
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        Self {
            num_sensors,
            num_gateways: n - num_sensors,
            communication_range,
            distances,
            neighbors,
        }
    }

    fn len(&self) -> usize {
        self.num_sensors + self.num_gateways
    }
}

/// The node table of one run plus the shared topology it lives on.
///
/// Sensors occupy indices `0..num_sensors` and gateways follow. Cloning shares
/// the topology and deep-copies the node table, so every protocol run gets its
/// own energy and trust state on the same layout.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    topology: Arc<Topology>,
    nodes: Vec<Node>,
}

impl NetworkSnapshot {
    /// Builds a snapshot from a hand-made node table. Sensor and gateway
    /// numbers must each be contiguous from zero.
    pub fn from_nodes(mut nodes: Vec<Node>, communication_range: f64) -> Result<Self> {
        nodes.sort_by_key(|node| match node.id {
            NodeId::Sensor(i) => (0, i),
            NodeId::Gateway(i) => (1, i),
        });

        let num_sensors = nodes.iter().filter(|node| node.id.is_sensor()).count();
        for (index, node) in nodes.iter().enumerate() {
            let expected = if index < num_sensors {
                NodeId::Sensor(index)
            } else {
                NodeId::Gateway(index - num_sensors)
            };
            if node.id != expected {
                bail!("Node ids must be contiguous: expected {} but found {}", expected, node.id);
            }
        }

        let positions: Vec<Position> = nodes.iter().map(|node| node.position).collect();
        let topology = Topology::build(&positions, num_sensors, communication_range);

        Ok(Self {
            topology: Arc::new(topology),
            nodes,
        })
    }

    /// Random placement in a square area, reproducible from `seed`.
    pub fn generate(config: &TopologyConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut sensors = Vec::with_capacity(config.num_sensors);
        for _ in 0..config.num_sensors {
            let malicious = rng.r#gen::<f64>() < config.malicious_prob;
            let position = random_position(&mut rng, config.area_size);
            sensors.push((position, malicious));
        }

        let required = config.min_malicious.min(config.num_sensors);
        let mut malicious_count = sensors.iter().filter(|(_, m)| *m).count();
        while malicious_count < required {
            let i = rng.gen_range(0..config.num_sensors);
            if !sensors[i].1 {
                sensors[i].1 = true;
                malicious_count += 1;
            }
        }

        let mut nodes: Vec<Node> = sensors
            .into_iter()
            .enumerate()
            .map(|(i, (position, malicious))| {
                Node::sensor(
                    i,
                    position,
                    config.initial_energy_sensor,
                    config.initial_trust,
                    malicious,
                )
            })
            .collect();

        for i in 0..config.num_gateways {
            let position = random_position(&mut rng, config.area_size);
            nodes.push(Node::gateway(
                i,
                position,
                config.initial_energy_gateway,
                config.gateway_trust,
            ));
        }

        let positions: Vec<Position> = nodes.iter().map(|node| node.position).collect();
        let topology = Topology::build(&positions, config.num_sensors, config.communication_range);

        Self {
            topology: Arc::new(topology),
            nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_sensors(&self) -> usize {
        self.topology.num_sensors
    }

    pub fn num_gateways(&self) -> usize {
        self.topology.num_gateways
    }

    pub fn communication_range(&self) -> f64 {
        self.topology.communication_range
    }

    pub fn sensor_indices(&self) -> Range<usize> {
        0..self.topology.num_sensors
    }

    pub fn gateway_indices(&self) -> Range<usize> {
        self.topology.num_sensors..self.topology.len()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        match id {
            NodeId::Sensor(i) if i < self.topology.num_sensors => Some(i),
            NodeId::Gateway(i) if i < self.topology.num_gateways => Some(self.topology.num_sensors + i),
            _ => None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.topology.distances[a * self.topology.len() + b]
    }

    /// Nodes within communication range of `index`, in index order.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.topology.neighbors[index]
    }

    pub fn edge_count(&self) -> usize {
        self.topology.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn malicious_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_malicious()).count()
    }

    pub fn active_indices(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].is_active())
            .collect()
    }
}

fn random_position(rng: &mut StdRng, area_size: f64) -> Position {
    let x = rng.gen_range(0.0..=area_size);
    let y = rng.gen_range(0.0..=area_size);
    Position::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_reproducible() {
        let config = TopologyConfig::default();
        let a = NetworkSnapshot::generate(&config, 7);
        let b = NetworkSnapshot::generate(&config, 7);
        assert_eq!(a.nodes(), b.nodes());
        assert_eq!(a.edge_count(), b.edge_count());
    }

    #[test]
    fn generation_honours_layout_and_minimum_malicious() {
        let config = TopologyConfig::default();
        let snapshot = NetworkSnapshot::generate(&config, 3);

        assert_eq!(snapshot.num_sensors(), 100);
        assert_eq!(snapshot.num_gateways(), 5);
        assert!(snapshot.malicious_count() >= 5);
        for i in snapshot.gateway_indices() {
            let node = snapshot.node(i);
            assert!(!node.is_malicious());
            assert_eq!(node.energy, 2.0);
            assert_eq!(node.trust, 0.9);
        }
        for node in snapshot.nodes() {
            assert!((0.0..=100.0).contains(&node.position.x));
            assert!((0.0..=100.0).contains(&node.position.y));
        }
    }

    #[test]
    fn edges_follow_communication_range() {
        let nodes = vec![
            Node::sensor(0, Position::new(0.0, 0.0), 0.5, 0.5, false),
            Node::sensor(1, Position::new(30.0, 0.0), 0.5, 0.5, false),
            Node::gateway(0, Position::new(61.0, 0.0), 2.0, 0.9),
        ];
        let snapshot = NetworkSnapshot::from_nodes(nodes, 30.0).unwrap();

        assert_eq!(snapshot.neighbors(0), &[1]);
        assert_eq!(snapshot.neighbors(1), &[0]);
        assert!(snapshot.neighbors(2).is_empty());
        assert_eq!(snapshot.edge_count(), 1);
        assert_eq!(snapshot.distance(0, 2), 61.0);
        assert_eq!(snapshot.distance(2, 0), 61.0);
    }

    #[test]
    fn from_nodes_orders_sensors_before_gateways() {
        let nodes = vec![
            Node::gateway(0, Position::new(1.0, 1.0), 2.0, 0.9),
            Node::sensor(1, Position::new(2.0, 2.0), 0.5, 0.5, true),
            Node::sensor(0, Position::new(3.0, 3.0), 0.5, 0.5, false),
        ];
        let snapshot = NetworkSnapshot::from_nodes(nodes, 10.0).unwrap();

        assert_eq!(snapshot.node(0).id, NodeId::Sensor(0));
        assert_eq!(snapshot.node(2).id, NodeId::Gateway(0));
        assert_eq!(snapshot.index_of(NodeId::Gateway(0)), Some(2));
        assert_eq!(snapshot.index_of(NodeId::Gateway(1)), None);
    }

    #[test]
    fn from_nodes_rejects_gaps() {
        let nodes = vec![
            Node::sensor(0, Position::default(), 0.5, 0.5, false),
            Node::sensor(2, Position::default(), 0.5, 0.5, false),
        ];
        assert!(NetworkSnapshot::from_nodes(nodes, 10.0).is_err());
    }

    #[test]
    fn clones_share_topology_but_not_state() {
        let snapshot = NetworkSnapshot::generate(&TopologyConfig::default(), 1);
        let mut copy = snapshot.clone();
        copy.node_mut(0).energy = 0.0;

        assert!(Arc::ptr_eq(&snapshot.topology, &copy.topology));
        assert_eq!(snapshot.node(0).energy, 0.5);
    }
}
