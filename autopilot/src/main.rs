use anyhow::{anyhow, Result};
use asteroids_autopilot::benchmark::{resolve_pilots, run_benchmark, BenchmarkConfig};
use asteroids_autopilot::config::AppConfig;
use asteroids_autopilot::pilot::{create_pilot, describe_pilots, pilot_ids};
use asteroids_autopilot::runner::{run_pilot, RunOptions};
use asteroids_autopilot::util::{parse_seed, resolve_seeds, seed_to_hex, unix_now_secs};
use asteroids_core::ScoreGateway;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "asteroids-autopilot")]
#[command(about = "Headless Asteroids driver: scripted pilots, high-score table, benchmarks")]
struct Cli {
    /// High-score file (overrides ASTEROIDS_SCORES_PATH)
    #[arg(long, global = true)]
    scores: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available pilots
    ListPilots,
    /// Play one session and sign the high-score table if the score qualifies
    Play {
        #[arg(long)]
        pilot: String,
        #[arg(long)]
        seed: String,
        /// Frame limit (overrides ASTEROIDS_MAX_FRAMES)
        #[arg(long)]
        max_frames: Option<u32>,
        /// Name to enter instead of the pilot's initials
        #[arg(long)]
        name: Option<String>,
    },
    /// Run every pilot against every seed with throwaway score tables
    Benchmark {
        #[arg(long)]
        pilots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long)]
        max_frames: Option<u32>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Print the high-score table
    Scores,
    /// Empty the high-score table
    ClearScores,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { scores, command } = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(path) = scores {
        config.scores_path = path;
    }

    match command {
        Commands::ListPilots => {
            for (id, description) in describe_pilots() {
                println!("{id:12} {description}");
            }
        }
        Commands::Play {
            pilot,
            seed,
            max_frames,
            name,
        } => {
            if create_pilot(&pilot).is_none() {
                let available = pilot_ids().join(", ");
                return Err(anyhow!("unknown pilot '{pilot}'. available: {available}"));
            }
            let seed = parse_seed(&seed)?;
            let options = RunOptions {
                max_frames: max_frames.unwrap_or(config.max_frames),
                name,
            };

            let store = config.open_store();
            let artifact = run_pilot(&pilot, seed, &options, store)?;
            let metrics = &artifact.metrics;

            println!("pilot={}", metrics.pilot_id);
            println!("seed={}", seed_to_hex(metrics.seed));
            println!("frames={}", metrics.frame_count);
            println!("score={}", metrics.final_score);
            println!("lives={}", metrics.final_lives);
            println!("wave={}", metrics.final_wave);
            println!("game_over={}", metrics.game_over);
            match (&metrics.recorded_name, metrics.recorded_rank) {
                (Some(name), Some(rank)) => {
                    println!("recorded={name}");
                    println!("rank={rank}");
                }
                _ => println!("recorded=none"),
            }
            println!("scores={}", artifact.scores.path().display());
        }
        Commands::Benchmark {
            pilots,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_frames,
            out_dir,
            jobs,
        } => {
            let pilots = resolve_pilots(pilots.as_deref())?;
            if let Some(unknown) = pilots.iter().find(|id| create_pilot(id).is_none()) {
                let available = pilot_ids().join(", ");
                return Err(anyhow!("unknown pilot '{unknown}'. available: {available}"));
            }
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("benchmarks/run-{}", unix_now_secs())));

            let report = run_benchmark(BenchmarkConfig {
                pilots,
                seeds,
                max_frames: max_frames.unwrap_or(config.max_frames),
                score_capacity: config.score_capacity,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("pilots:");
            for (idx, pilot) in report.pilot_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  avg_score={:.1} max_score={} avg_frames={:.1} avg_wave={:.2} survival={:.0}%",
                    idx + 1,
                    pilot.pilot_id,
                    pilot.avg_score,
                    pilot.max_score,
                    pilot.avg_frames,
                    pilot.avg_wave,
                    pilot.survival_rate * 100.0,
                );
            }
        }
        Commands::Scores => {
            let store = config.open_store();
            println!("scores={}", store.path().display());
            if store.records().is_empty() {
                println!("(no scores yet)");
            }
            for (idx, record) in store.records().iter().enumerate() {
                println!(
                    "{:>2}. {:<10} {:>8}  {}",
                    idx + 1,
                    record.name,
                    record.score,
                    record.date
                );
            }
        }
        Commands::ClearScores => {
            let mut store = config.open_store();
            let removed = store.records().len();
            store.clear();
            println!("scores={}", store.path().display());
            println!("cleared={removed}");
        }
    }

    Ok(())
}
