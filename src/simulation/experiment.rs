use super::{ExperimentConfig, simulate};
use crate::metrics::RunMetrics;
use crate::network::NetworkSnapshot;
use crate::protocols::ProtocolRegistry;
use anyhow::{Result, bail};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolRuns {
    /// Registry key the runs were started with
    pub key: String,
    pub name: String,
    pub tracks_trust: bool,
    pub runs: Vec<RunMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResults {
    pub runs: usize,
    pub base_seed: u64,
    pub protocols: Vec<ProtocolRuns>,
}

impl ExperimentResults {
    pub fn get(&self, name: &str) -> Option<&ProtocolRuns> {
        self.protocols
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(name) || p.name.eq_ignore_ascii_case(name))
    }
}

/// Every run draws a fresh topology from `base_seed + run`, and each protocol
/// plays its own copy of it with that same seed. Runs are independent and are
/// spread over the rayon pool; results come back in run order.
pub fn run_experiment(config: &ExperimentConfig, progress: Option<&ProgressBar>) -> Result<ExperimentResults> {
    let registry = ProtocolRegistry::global();
    if config.protocols.is_empty() {
        bail!("No protocols configured");
    }
    for name in &config.protocols {
        if !registry.contains(name) {
            bail!("Unknown protocol: {}", name);
        }
    }

    info!(
        "Running {} runs of {} ({} rounds each)",
        config.runs,
        config.protocols.join(", "),
        config.sim.max_rounds
    );

    let per_run: Vec<Vec<RunMetrics>> = (0..config.runs)
        .into_par_iter()
        .map(|run| {
            let seed = config.base_seed + run as u64;
            let network = NetworkSnapshot::generate(&config.topology, seed);
            debug!(
                "Run {}/{}: seed {}, {} edges, {} malicious",
                run + 1,
                config.runs,
                seed,
                network.edge_count(),
                network.malicious_count()
            );

            let results = config
                .protocols
                .iter()
                .map(|name| simulate(name, &config.sim, network.clone(), seed))
                .collect::<Result<Vec<_>>>();

            if let Some(pb) = progress {
                pb.inc(1);
            }
            results
        })
        .collect::<Result<_>>()?;

    let mut protocols: Vec<ProtocolRuns> = config
        .protocols
        .iter()
        .map(|key| ProtocolRuns {
            key: key.clone(),
            name: String::new(),
            tracks_trust: false,
            runs: Vec::with_capacity(config.runs),
        })
        .collect();

    for run in per_run {
        for (slot, metrics) in protocols.iter_mut().zip(run) {
            slot.name = metrics.protocol.clone();
            slot.tracks_trust = metrics.tracks_trust;
            slot.runs.push(metrics);
        }
    }

    // Zero runs still deserve readable names
    for slot in &mut protocols {
        if slot.name.is_empty() {
            if let Some(protocol) = registry.create(&slot.key, &config.sim) {
                slot.name = protocol.name().to_string();
                slot.tracks_trust = protocol.tracks_trust();
            }
        }
    }

    Ok(ExperimentResults {
        runs: config.runs,
        base_seed: config.base_seed,
        protocols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ExperimentConfig {
        let mut config = ExperimentConfig::default().with_runs(3);
        config.topology.num_sensors = 30;
        config.topology.num_gateways = 3;
        config.sim = config.sim.with_rounds(20).without_wall_latency();
        config
    }

    #[test]
    fn results_are_grouped_per_protocol_in_order() {
        let results = run_experiment(&small(), None).unwrap();

        let names: Vec<&str> = results.protocols.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["SecureSenseChain", "PoW", "LEACH"]);
        for protocol in &results.protocols {
            assert_eq!(protocol.runs.len(), 3);
            let seeds: Vec<u64> = protocol.runs.iter().map(|r| r.seed).collect();
            assert_eq!(seeds, vec![0, 1, 2]);
        }
        assert!(!results.get("pow").unwrap().tracks_trust);
    }

    #[test]
    fn experiments_are_reproducible() {
        let a = run_experiment(&small(), None).unwrap();
        let b = run_experiment(&small(), None).unwrap();
        for (x, y) in a.protocols.iter().zip(&b.protocols) {
            assert_eq!(x.runs, y.runs);
        }
    }

    #[test]
    fn unknown_protocol_fails_before_running() {
        let config = small().with_protocols(["ssc", "pbft"]);
        let err = run_experiment(&config, None).unwrap_err();
        assert!(err.to_string().contains("pbft"));
    }

    #[test]
    fn zero_runs_keep_protocol_names() {
        let results = run_experiment(&small().with_runs(0), None).unwrap();
        assert_eq!(results.get("leach").unwrap().name, "LEACH");
        assert!(results.protocols.iter().all(|p| p.runs.is_empty()));
    }
}
