use super::RunMetrics;
use anyhow::Result;
use csv::Writer;
use std::fs::File;
use std::path::Path;

/// Writes the per-round rows of a run as CSV.
pub struct MetricsLogger {
    writer: Writer<File>,
}

impl MetricsLogger {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_run(&mut self, run: &RunMetrics) -> Result<()> {
        for round in run.rounds() {
            self.writer.serialize(round)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RoundMetrics;

    #[test]
    fn writes_header_and_one_row_per_round() {
        let mut run = RunMetrics::new("SecureSenseChain", 0, true);
        run.push(&RoundMetrics { round: 0, energy: 0.1, latency: 0.001, trust: 0.6, detection: 0.2 });
        run.push(&RoundMetrics { round: 1, energy: 0.2, latency: 0.001, trust: 0.7, detection: 0.4 });

        let path = std::env::temp_dir().join(format!("sensechain_logger_{}.csv", std::process::id()));
        let mut logger = MetricsLogger::new(&path).unwrap();
        logger.log_run(&run).unwrap();
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "round,energy,latency,trust,detection");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("1,0.2,"));
    }
}
