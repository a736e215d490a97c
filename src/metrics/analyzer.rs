use super::{Metric, RunMetrics, mean};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Mean and population standard deviation across runs, per round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl SeriesStats {
    fn across(series: &[&[f64]]) -> Self {
        let rounds = series.iter().map(|s| s.len()).min().unwrap_or(0);
        let mut stats = SeriesStats::default();

        for r in 0..rounds {
            let values: Vec<f64> = series.iter().map(|s| s[r]).collect();
            let m = mean(&values);
            let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
            stats.mean.push(m);
            stats.std.push(var.sqrt());
        }
        stats
    }

    pub fn overall(&self) -> f64 {
        mean(&self.mean)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolSummary {
    pub protocol: String,
    pub runs: usize,
    pub tracks_trust: bool,
    pub energy: SeriesStats,
    pub latency: SeriesStats,
    pub trust: SeriesStats,
    pub detection: SeriesStats,
    pub avg_energy: f64,
    pub avg_latency: f64,
    /// None where the protocol has no trust model
    pub avg_trust: Option<f64>,
    pub avg_detection: Option<f64>,
}

impl ProtocolSummary {
    pub fn series(&self, metric: Metric) -> &SeriesStats {
        match metric {
            Metric::Energy => &self.energy,
            Metric::Latency => &self.latency,
            Metric::Trust => &self.trust,
            Metric::Detection => &self.detection,
        }
    }
}

pub fn summarize(protocol: &str, runs: &[RunMetrics]) -> ProtocolSummary {
    let tracks_trust = runs.first().is_some_and(|r| r.tracks_trust);
    let collect = |metric: Metric| {
        let series: Vec<&[f64]> = runs.iter().map(|r| r.series(metric)).collect();
        SeriesStats::across(&series)
    };

    let energy = collect(Metric::Energy);
    let latency = collect(Metric::Latency);
    let trust = collect(Metric::Trust);
    let detection = collect(Metric::Detection);

    ProtocolSummary {
        protocol: protocol.to_string(),
        runs: runs.len(),
        tracks_trust,
        avg_energy: energy.overall(),
        avg_latency: latency.overall(),
        avg_trust: tracks_trust.then(|| trust.overall()),
        avg_detection: tracks_trust.then(|| detection.overall()),
        energy,
        latency,
        trust,
        detection,
    }
}

fn fmt_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "N/A".to_string(),
    }
}

pub fn export_summary_csv(summaries: &[ProtocolSummary], path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Method",
        "Avg Energy (J)",
        "Avg Latency (s)",
        "Avg Trust Accuracy",
        "Avg Detection Rate",
    ])?;

    for s in summaries {
        writer.write_record([
            s.protocol.clone(),
            format!("{:.6}", s.avg_energy),
            format!("{:.6}", s.avg_latency),
            fmt_optional(s.avg_trust),
            fmt_optional(s.avg_detection),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `<metric>_comparison.dat` files (pgfplots/gnuplot tables) into
/// `dir` and returns their paths. Protocols without trust are left out of
/// the trust and detection tables.
pub fn export_plot_data(summaries: &[ProtocolSummary], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for metric in Metric::ALL {
        let included: Vec<&ProtocolSummary> = summaries
            .iter()
            .filter(|s| !metric.needs_trust() || s.tracks_trust)
            .collect();
        if included.is_empty() {
            continue;
        }

        let path = dir.as_ref().join(format!("{}_comparison.dat", metric.name()));
        let mut out = BufWriter::new(File::create(&path)?);

        write!(out, "round")?;
        for s in &included {
            let key = column_key(&s.protocol);
            write!(out, " {}_mean {}_std", key, key)?;
        }
        writeln!(out)?;

        let rounds = included.iter().map(|s| s.series(metric).mean.len()).min().unwrap_or(0);
        for r in 0..rounds {
            write!(out, "{}", r)?;
            for s in &included {
                let stats = s.series(metric);
                write!(out, " {:.9} {:.9}", stats.mean[r], stats.std[r])?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        written.push(path);
    }

    Ok(written)
}

fn column_key(protocol: &str) -> String {
    protocol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
