use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node. Sensors and gateways are numbered independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Sensor(usize),
    Gateway(usize),
}

impl NodeId {
    pub fn is_sensor(&self) -> bool {
        matches!(self, NodeId::Sensor(_))
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, NodeId::Gateway(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Sensor(i) => write!(f, "S{}", i),
            NodeId::Gateway(i) => write!(f, "G{}", i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub energy: f64,
    pub trust: f64,
    // Fixed at creation, nothing in a run flips it
    malicious: bool,
}

impl Node {
    pub fn new(id: NodeId, position: Position, energy: f64, trust: f64, malicious: bool) -> Self {
        Self {
            id,
            position,
            energy,
            trust,
            malicious,
        }
    }

    pub fn sensor(index: usize, position: Position, energy: f64, trust: f64, malicious: bool) -> Self {
        Self::new(NodeId::Sensor(index), position, energy, trust, malicious)
    }

    /// Gateways are never malicious.
    pub fn gateway(index: usize, position: Position, energy: f64, trust: f64) -> Self {
        Self::new(NodeId::Gateway(index), position, energy, trust, false)
    }

    pub fn is_malicious(&self) -> bool {
        self.malicious
    }

    pub fn is_active(&self) -> bool {
        self.energy > 0.0
    }

    /// Deducts `cost` if the node can afford it and reports whether it did.
    /// A node that cannot pay is left untouched, so energy never goes negative.
    pub fn try_spend(&mut self, cost: f64) -> bool {
        if self.energy > cost {
            self.energy -= cost;
            true
        } else {
            false
        }
    }
}
