pub mod network;
pub mod energy;
pub mod trust;
pub mod cluster;
pub mod consensus;
pub mod protocols;
pub mod metrics;
pub mod simulation;

pub use network::{NetworkSnapshot, Node, NodeId};
pub use protocols::{Protocol, ProtocolRegistry};
pub use simulation::{Simulation, SimConfig, ExperimentConfig, simulate, run_experiment};
pub use metrics::RunMetrics;

pub mod prelude {
    pub use crate::network::{NetworkSnapshot, Node, NodeId, Position, TopologyConfig};
    pub use crate::energy::EnergyModel;
    pub use crate::trust::{TrustModel, TrustSample};
    pub use crate::cluster::{Clusters, form_clusters};
    pub use crate::consensus::select_validators;
    pub use crate::protocols::{Protocol, ProtocolRegistry};
    pub use crate::simulation::{Simulation, SimConfig, ExperimentConfig, simulate, run_experiment};
    pub use crate::metrics::{Metric, RoundMetrics, RunMetrics};
}
