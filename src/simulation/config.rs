use crate::network::TopologyConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed per-round overhead added to measured latency, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyOverheads {
    pub secure_sense_chain: f64,
    pub pow: f64,
    pub leach: f64,
}

impl Default for LatencyOverheads {
    fn default() -> Self {
        Self {
            secure_sense_chain: 0.00085,
            pow: 0.05,
            leach: 0.005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub max_rounds: usize,
    /// Bits per packet
    pub packet_size: f64,
    /// J/bit for the radio electronics
    pub e_elec: f64,
    /// J/bit/m^2 for the amplifier
    pub e_amp: f64,
    /// J/bit for aggregation
    pub e_da: f64,
    pub alpha_start: f64,
    pub alpha_end: f64,
    pub reputation_reward: f64,
    pub reputation_penalty: f64,
    pub trust_threshold: f64,
    pub malicious_behavior_prob: f64,
    pub energy_per_consensus_round: f64,
    pub consensus_interval: usize,
    pub pow_miner_ratio: f64,
    pub pow_energy_intensity_factor: f64,
    pub area_size: f64,
    /// Honest sensors only earn the trust bonus above this energy level
    pub honest_bonus_min_energy: f64,
    pub latency: LatencyOverheads,
    /// When false, round latency is just the protocol overhead constant
    pub measure_wall_latency: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            packet_size: 4000.0,
            e_elec: 50e-9,
            e_amp: 100e-12,
            e_da: 5e-9,
            alpha_start: 0.8,
            alpha_end: 0.4,
            reputation_reward: 0.9,
            reputation_penalty: 0.1,
            trust_threshold: 0.6,
            malicious_behavior_prob: 0.4,
            energy_per_consensus_round: 0.0001,
            consensus_interval: 10,
            pow_miner_ratio: 0.1,
            pow_energy_intensity_factor: 50.0,
            area_size: 100.0,
            honest_bonus_min_energy: 0.1,
            latency: LatencyOverheads::default(),
            measure_wall_latency: true,
        }
    }
}

impl SimConfig {
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_malicious_behavior_prob(mut self, prob: f64) -> Self {
        self.malicious_behavior_prob = prob;
        self
    }

    pub fn without_wall_latency(mut self) -> Self {
        self.measure_wall_latency = false;
        self
    }
}

/// Everything a comparison needs: how many runs, which protocols, what to
/// generate and where results go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub runs: usize,
    pub base_seed: u64,
    pub protocols: Vec<String>,
    pub output_dir: PathBuf,
    pub topology: TopologyConfig,
    pub sim: SimConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            runs: 30,
            base_seed: 0,
            protocols: vec!["ssc".to_string(), "pow".to_string(), "leach".to_string()],
            output_dir: PathBuf::from("simulation_results"),
            topology: TopologyConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocols = protocols.into_iter().map(Into::into).collect();
        self
    }

    /// Keeps the placement area and the PoW mining distance in step.
    pub fn with_area_size(mut self, area_size: f64) -> Self {
        self.topology.area_size = area_size;
        self.sim.area_size = area_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_size_moves_placement_and_mining_together() {
        let config = ExperimentConfig::default().with_area_size(250.0);
        assert_eq!(config.topology.area_size, 250.0);
        assert_eq!(config.sim.area_size, 250.0);
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("sensechain_config_{}.json", std::process::id()));
        let config = ExperimentConfig::default()
            .with_runs(4)
            .with_protocols(["leach"]);
        config.save(&path).unwrap();

        let loaded = ExperimentConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.runs, 4);
        assert_eq!(loaded.protocols, vec!["leach".to_string()]);
        assert_eq!(loaded.sim.consensus_interval, 10);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = ExperimentConfig::load("/nonexistent/sensechain.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
