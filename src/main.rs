//                                            ,--.            ,--.
//  ,---.  ,---. ,--,--,  ,---.  ,---.  ,---. |  ,---.  ,--,--.`--',--,--,
// (  .-' | .-. :|      \(  .-' | .-. :| .--' |  .-.  |' ,-.  |,--.|      \
// .-'  `)\   --.|  ||  |.-'  `)\   --.\ `--. |  | |  |\ '-'  ||  ||  ||  |
// `----'  `----'`--''--'`----'  `----' `---' `--' `--' `--`--'`--'`--''--'

// Round based comparison of SecureSenseChain against PoW and LEACH baselines on a
// simulated wireless sensor network. Numbers are for relative comparison only.

// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use sensechain::prelude::*;
use sensechain::metrics::analyzer::{self, ProtocolSummary};
use sensechain::metrics::logger::MetricsLogger;
use sensechain::metrics::mean;

use clap::{Parser, Subcommand};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, Level};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[arg(short, long, default_value = "ssc")]
        protocol: String,
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        #[arg(short, long)]
        rounds: Option<usize>,
        #[arg(long)]
        sensors: Option<usize>,
        #[arg(long)]
        gateways: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    Compare {
        #[arg(short, long)]
        protocols: Option<String>,
        #[arg(short = 'n', long)]
        runs: Option<usize>,
        #[arg(short, long)]
        rounds: Option<usize>,
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print or write the default experiment configuration as JSON
    Config {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    List,
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            protocol,
            seed,
            rounds,
            sensors,
            gateways,
            config,
            output,
        } => {
            let mut experiment = load_config(config.as_deref())?;
            if let Some(rounds) = rounds {
                experiment.sim.max_rounds = rounds;
            }
            if let Some(sensors) = sensors {
                experiment.topology.num_sensors = sensors;
            }
            if let Some(gateways) = gateways {
                experiment.topology.num_gateways = gateways;
            }
            run_single(&experiment, &protocol, seed, &output)?;
        }

        Commands::Compare {
            protocols,
            runs,
            rounds,
            seed,
            config,
            output,
        } => {
            let mut experiment = load_config(config.as_deref())?;
            if let Some(protocols) = protocols {
                experiment = experiment.with_protocols(protocols.split(',').map(|s| s.trim()));
            }
            if let Some(runs) = runs {
                experiment.runs = runs;
            }
            if let Some(rounds) = rounds {
                experiment.sim.max_rounds = rounds;
            }
            if let Some(seed) = seed {
                experiment.base_seed = seed;
            }
            if let Some(output) = output {
                experiment.output_dir = output;
            }
            compare_protocols(&experiment, program_start)?;
        }

        Commands::Config { output } => {
            let config = ExperimentConfig::default();
            match output {
                Some(path) => {
                    config.save(&path)?;
                    info!("Default config written to: {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            }
        }

        Commands::List => {
            println!("\nAvailable Protocols");

            for protocol in ProtocolRegistry::global().list() {
                println!("  - {}", protocol);
            }

            println!("\nUsage: cargo run -- run --protocol <name>");
            println!("Example: cargo run -- compare --protocols ssc,leach --runs 10\n");
        }
    }

    let total_time = program_start.elapsed();
    info!("Total runtime: {:.2}s", total_time.as_secs_f64());

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ExperimentConfig> {
    match path {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            ExperimentConfig::load(path)
        }
        None => Ok(ExperimentConfig::default()),
    }
}

fn run_single(experiment: &ExperimentConfig, protocol: &str, seed: u64, output: &Path) -> Result<()> {
    info!("SecureSenseChain: Single Run");

    let network = NetworkSnapshot::generate(&experiment.topology, seed);
    info!(
        "Network: {} sensors, {} gateways, {} edges, {} malicious",
        network.num_sensors(),
        network.num_gateways(),
        network.edge_count(),
        network.malicious_count()
    );

    let run = simulate(protocol, &experiment.sim, network, seed)?;

    std::fs::create_dir_all(output)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let csv_path = output.join(format!("{}_seed{}_{}.csv", protocol.to_lowercase(), seed, timestamp));
    let mut logger = MetricsLogger::new(&csv_path)?;
    logger.log_run(&run)?;
    info!("Results saved to: {}", csv_path.display());

    info!("Protocol: {}", run.protocol);
    info!("Total Energy: {:.6} J", run.total_energy());
    info!("Avg Latency: {:.6} s", mean(&run.latency));
    if run.tracks_trust {
        info!("Final Trust: {:.4}", run.trust.last().copied().unwrap_or(0.0));
        info!("Final Detection: {:.4}", run.detection.last().copied().unwrap_or(0.0));
    }

    Ok(())
}

fn compare_protocols(experiment: &ExperimentConfig, global_start: Instant) -> Result<()> {
    info!("SecureSenseChain: Comparison");
    info!("");
    info!("Protocols: {}", experiment.protocols.join(", "));
    info!("Runs: {}", experiment.runs);
    info!("Rounds per run: {}", experiment.sim.max_rounds);
    info!("");

    let pb = ProgressBar::new(experiment.runs as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.orange/yellow} {pos}/{len} runs {msg}")?
            .progress_chars("█▓░"),
    );

    let results = run_experiment(experiment, Some(&pb))?;
    pb.finish_with_message("Simulation complete");
    info!("Runs finished after {}", format_time(global_start.elapsed()));

    let summaries: Vec<ProtocolSummary> = results
        .protocols
        .iter()
        .map(|p| analyzer::summarize(&p.name, &p.runs))
        .collect();

    comparison_table(&summaries);

    let dir = &experiment.output_dir;
    std::fs::create_dir_all(dir)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");

    let table_path = dir.join("simulation_results.csv");
    analyzer::export_summary_csv(&summaries, &table_path)?;
    info!("Comparison table saved to: {}", table_path.display());

    for path in analyzer::export_plot_data(&summaries, dir)? {
        info!("Plot data saved to: {}", path.display());
    }

    let json_path = dir.join(format!("comparison_{}.json", timestamp));
    std::fs::write(&json_path, serde_json::to_string_pretty(&summaries)?)?;
    info!("Comparison saved to: {}", json_path.display());

    let runs_path = dir.join(format!("runs_{}.json", timestamp));
    std::fs::write(&runs_path, serde_json::to_string(&results)?)?;
    info!("Raw runs saved to: {}", runs_path.display());

    experiment.save(dir.join(format!("config_{}.json", timestamp)))?;

    Ok(())
}

fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.4}", v))
}

fn comparison_table(summaries: &[ProtocolSummary]) {
    println!("\n╔══════════════════════════════════════════════════════════════════════╗");
    println!("║                        PROTOCOL COMPARISON                           ║");
    println!("╠══════════════════╦════════════╦════════════╦════════════╦════════════╣");
    println!("║ Protocol         ║ Energy     ║ Latency    ║ Trust      ║ Detection  ║");
    println!("║                  ║ (J/round)  ║ (s)        ║ (honest)   ║ (rate)     ║");
    println!("╠══════════════════╬════════════╬════════════╬════════════╬════════════╣");

    for s in summaries {
        println!(
            "║ {:<16} ║ {:>10.6} ║ {:>10.6} ║ {:>10} ║ {:>10} ║",
            s.protocol,
            s.avg_energy,
            s.avg_latency,
            optional(s.avg_trust),
            optional(s.avg_detection),
        );
    }

    println!("╚══════════════════╩════════════╩════════════╩════════════╩════════════╝\n");

    if let Some(best_energy) = summaries
        .iter()
        .min_by(|a, b| a.avg_energy.total_cmp(&b.avg_energy))
    {
        println!("Lowest Energy: {} ({:.6} J/round)", best_energy.protocol, best_energy.avg_energy);
    }

    if let Some(best_latency) = summaries
        .iter()
        .min_by(|a, b| a.avg_latency.total_cmp(&b.avg_latency))
    {
        println!("Lowest Latency: {} ({:.6} s)", best_latency.protocol, best_latency.avg_latency);
    }

    if let Some((name, rate)) = summaries
        .iter()
        .filter_map(|s| s.avg_detection.map(|d| (&s.protocol, d)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
    {
        println!("Best Detection: {} ({:.2}%)", name, rate * 100.0);
    }

    println!();
}
