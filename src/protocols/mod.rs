pub mod secure_sense_chain;
pub mod pow;
pub mod leach;

use crate::network::NetworkSnapshot;
use crate::simulation::SimConfig;
use crate::trust::TrustSample;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::fmt;

pub use leach::Leach;
pub use pow::ProofOfWork;
pub use secure_sense_chain::SecureSenseChain;

/// Per-variant policy plugged into the shared round loop.
pub trait Protocol: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Whether rounds relay sensor data through nearest-gateway clusters.
    fn forms_clusters(&self) -> bool {
        true
    }

    /// Whether the trust and detection series mean anything for this protocol.
    fn tracks_trust(&self) -> bool {
        true
    }

    fn reputation(&self, behaves_maliciously: bool) -> f64;
    fn update_trust(&self, sample: TrustSample) -> f64;
    fn detection_threshold(&self) -> f64;

    /// Work done after relaying (validation, mining). Returns energy spent.
    fn settle(&self, round: usize, network: &mut NetworkSnapshot, rng: &mut StdRng) -> f64;

    /// Fixed communication overhead per round, in seconds.
    fn latency_overhead(&self) -> f64;
}

type Factory = Box<dyn Fn(&SimConfig) -> Box<dyn Protocol> + Send + Sync>;

pub struct ProtocolRegistry {
    protocols: HashMap<String, Factory>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            protocols: HashMap::new(),
        };
        registry.register_builtin();
        registry
    }

    fn register_builtin(&mut self) {
        self.register("securesensechain", |config| Box::new(SecureSenseChain::new(config)));
        self.register("ssc", |config| Box::new(SecureSenseChain::new(config)));
        self.register("pow", |config| Box::new(ProofOfWork::new(config)));
        self.register("proof-of-work", |config| Box::new(ProofOfWork::new(config)));
        self.register("leach", |config| Box::new(Leach::new(config)));
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&SimConfig) -> Box<dyn Protocol> + Send + Sync + 'static,
    {
        self.protocols.insert(name.to_lowercase(), Box::new(factory));
    }

    pub fn create(&self, name: &str, config: &SimConfig) -> Option<Box<dyn Protocol>> {
        self.protocols
            .get(&name.to_lowercase())
            .map(|factory| factory(config))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.protocols.contains_key(&name.to_lowercase())
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.protocols.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn global() -> &'static ProtocolRegistry {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<ProtocolRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ProtocolRegistry::new)
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
