pub mod node;
pub mod topology;

pub use node::{Node, NodeId, Position};
pub use topology::{NetworkSnapshot, Topology, TopologyConfig};
