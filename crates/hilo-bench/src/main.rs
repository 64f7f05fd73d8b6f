use std::path::PathBuf;

use clap::Parser;

use hilo_bench::config::BenchmarkConfig;
use hilo_bench::harness::BenchRunner;
use hilo_bench::logging::init_logging;

/// Benchmark harness comparing High-Low guessing policies.
#[derive(Debug, Parser)]
#[command(
    name = "hilo-bench",
    author,
    version,
    about = "Deterministic High-Low policy benchmark"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the RNG seed for shoe shuffles.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of games played per agent.
    #[arg(long, value_name = "COUNT")]
    shoes: Option<usize>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(seed) = cli.seed {
        config.shoes.seed = Some(seed);
    }

    if let Some(count) = cli.shoes {
        config.shoes.count = count;
    }

    config.validate()?;

    let outputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let games = config.shoes.count;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({games} games each)",
        if agent_count == 1 { "" } else { "s" }
    );

    if cli.validate_only {
        println!("Validation-only mode: benchmark execution skipped.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = BenchRunner::new(config, outputs)?;
    let summary = runner.run()?;

    println!(
        "Benchmark complete for '{run_id}': {} agents x {} games -> {} rows at {}",
        summary.agents,
        summary.games_per_agent,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for agent in &summary.analytics.agents {
        println!(
            "  {}: accuracy {:.1}%, mean streak {:.2}, mean pot {:.3}",
            agent.name,
            agent.accuracy * 100.0,
            agent.mean_streak,
            agent.mean_pot_factor
        );
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
