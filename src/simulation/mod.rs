pub mod config;
pub mod experiment;

pub use config::{ExperimentConfig, LatencyOverheads, SimConfig};
pub use experiment::{ExperimentResults, ProtocolRuns, run_experiment};

use crate::cluster::form_clusters;
use crate::energy::EnergyModel;
use crate::metrics::{RoundMetrics, RunMetrics, mean};
use crate::network::NetworkSnapshot;
use crate::protocols::{Protocol, ProtocolRegistry};
use crate::trust::TrustSample;
use anyhow::{Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// One protocol run over its own copy of a network.
///
/// Rounds are strictly sequential: each round's clusters and energy levels
/// depend on the previous round's mutations.
pub struct Simulation {
    config: SimConfig,
    protocol: Box<dyn Protocol>,
    network: NetworkSnapshot,
    energy: EnergyModel,
    rng: StdRng,
    total_malicious: usize,
    round: usize,
    pub metrics: RunMetrics,
}

impl Simulation {
    pub fn new(config: SimConfig, protocol: Box<dyn Protocol>, network: NetworkSnapshot, seed: u64) -> Self {
        let metrics = RunMetrics::new(protocol.name(), seed, protocol.tracks_trust());
        Self {
            energy: EnergyModel::from_config(&config),
            total_malicious: network.malicious_count(),
            rng: StdRng::seed_from_u64(seed),
            round: 0,
            config,
            protocol,
            network,
            metrics,
        }
    }

    pub fn network(&self) -> &NetworkSnapshot {
        &self.network
    }

    pub fn protocol(&self) -> &dyn Protocol {
        self.protocol.as_ref()
    }

    pub fn current_round(&self) -> usize {
        self.round
    }

    pub fn is_finished(&self) -> bool {
        self.round >= self.config.max_rounds
    }

    /// Plays every remaining round. Depleted networks keep recording rounds.
    pub fn run(&mut self) {
        while !self.is_finished() {
            self.step();
        }
    }

    pub fn finish(mut self) -> RunMetrics {
        self.run();
        self.metrics
    }

    /// Plays one round and records its metrics.
    pub fn step(&mut self) -> RoundMetrics {
        let round = self.round;
        let started = Instant::now();

        let (relay_energy, detected) = if self.protocol.forms_clusters() {
            self.relay(round)
        } else {
            (0.0, 0)
        };
        let settle_energy = self.protocol.settle(round, &mut self.network, &mut self.rng);

        let measured = if self.config.measure_wall_latency {
            started.elapsed().as_secs_f64()
        } else {
            0.0
        };

        let (trust, detection) = if self.protocol.tracks_trust() {
            (
                self.honest_trust(),
                detected as f64 / self.total_malicious.max(1) as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let metrics = RoundMetrics {
            round,
            energy: relay_energy + settle_energy,
            latency: measured + self.protocol.latency_overhead(),
            trust,
            detection,
        };
        self.metrics.push(&metrics);
        self.round += 1;
        metrics
    }

    /// Cluster relay: gateways aggregate, sensors transmit and get rescored.
    /// Returns energy spent and how many malicious sensors fell below the
    /// detection threshold.
    fn relay(&mut self, round: usize) -> (f64, usize) {
        let clusters = form_clusters(&self.network);
        let threshold = self.protocol.detection_threshold();
        let mut spent = 0.0;
        let mut detected = 0;

        for cluster in clusters.iter() {
            if cluster.sensors.is_empty() || !self.network.node(cluster.gateway).is_active() {
                continue;
            }

            let aggregation = self.energy.aggregate_cost(cluster.sensors.len());
            if self.network.node_mut(cluster.gateway).try_spend(aggregation) {
                spent += aggregation;
            }

            for &sensor in &cluster.sensors {
                if !self.network.node(sensor).is_active() {
                    continue;
                }

                let transmit = self.energy.transmit_cost(self.network.distance(sensor, cluster.gateway));
                let node = self.network.node_mut(sensor);
                if node.try_spend(transmit) {
                    spent += transmit;
                }

                let malicious = node.is_malicious();
                // Only malicious sensors consume a draw
                let behaves_maliciously =
                    malicious && self.rng.r#gen::<f64>() < self.config.malicious_behavior_prob;

                node.trust = self.protocol.update_trust(TrustSample {
                    malicious,
                    has_energy: node.energy > self.config.honest_bonus_min_energy,
                    reputation: self.protocol.reputation(behaves_maliciously),
                    prior: node.trust,
                    round,
                });

                if malicious && node.trust < threshold {
                    detected += 1;
                }
            }
        }

        (spent, detected)
    }

    fn honest_trust(&self) -> f64 {
        let trusts: Vec<f64> = self
            .network
            .sensor_indices()
            .map(|i| self.network.node(i))
            .filter(|node| !node.is_malicious())
            .map(|node| node.trust)
            .collect();
        mean(&trusts)
    }
}

/// Runs `protocol` for a full run on `network`, seeded with `seed`.
///
/// With `measure_wall_latency` off the result depends only on the arguments,
/// so independent runs can be farmed out freely.
pub fn simulate(protocol: &str, config: &SimConfig, network: NetworkSnapshot, seed: u64) -> Result<RunMetrics> {
    let protocol = ProtocolRegistry::global()
        .create(protocol, config)
        .ok_or_else(|| anyhow!("Unknown protocol: {}", protocol))?;
    Ok(Simulation::new(config.clone(), protocol, network, seed).finish())
}
