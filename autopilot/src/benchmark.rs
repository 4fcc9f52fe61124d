use crate::pilot::pilot_ids;
use crate::runner::{run_pilot, RunMetrics, RunOptions};
use crate::util::{seed_to_hex, unix_now_secs};
use anyhow::{anyhow, Context, Result};
use asteroids_core::MemoryScores;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub pilots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_frames: u32,
    /// Capacity of the throwaway score table each run signs.
    pub score_capacity: usize,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub pilot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_lives: u32,
    pub final_wave: u32,
    pub game_over: bool,
    pub action_frames: u32,
    pub turn_frames: u32,
    pub thrust_frames: u32,
    pub fire_frames: u32,
}

impl From<&RunMetrics> for RunRecord {
    fn from(metrics: &RunMetrics) -> Self {
        Self {
            pilot_id: metrics.pilot_id.clone(),
            seed: metrics.seed,
            seed_hex: seed_to_hex(metrics.seed),
            frame_count: metrics.frame_count,
            final_score: metrics.final_score,
            final_lives: metrics.final_lives,
            final_wave: metrics.final_wave,
            game_over: metrics.game_over,
            action_frames: metrics.action_frames,
            turn_frames: metrics.turn_frames,
            thrust_frames: metrics.thrust_frames,
            fire_frames: metrics.fire_frames,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PilotAggregate {
    pub pilot_id: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_frames: f64,
    pub max_frames: u32,
    pub avg_wave: f64,
    pub max_wave: u32,
    pub survival_rate: f64,
    pub avg_fire_frames: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_frames: u32,
    pub jobs: Option<usize>,
    pub pilots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub pilot_rankings: Vec<PilotAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_pilots(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(pilot_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => {
            let mut pilots = Vec::new();
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                pilots.push(token.to_string());
            }
            if pilots.is_empty() {
                return Err(anyhow!("--pilots resolved to empty list"));
            }
            Ok(pilots)
        }
    }
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.pilots.is_empty() {
        return Err(anyhow!("benchmark requires at least one pilot"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(String, u32)> = config
        .pilots
        .iter()
        .flat_map(|pilot| config.seeds.iter().map(move |seed| (pilot.clone(), *seed)))
        .collect();
    tracing::info!(
        runs = run_jobs.len(),
        max_frames = config.max_frames,
        "starting benchmark"
    );

    let options = RunOptions {
        max_frames: config.max_frames,
        name: None,
    };
    let run_one = |(pilot_id, seed): &(String, u32)| -> Result<RunMetrics> {
        let scores = MemoryScores::new(config.score_capacity);
        let artifact = run_pilot(pilot_id, *seed, &options, scores).with_context(|| {
            format!("benchmark run failed for pilot={pilot_id} seed={seed:#x}")
        })?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let rankings = rank_pilots(&runs, config.max_frames);

    let mut run_records: Vec<RunRecord> = runs.iter().map(RunRecord::from).collect();
    run_records.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then_with(|| b.frame_count.cmp(&a.frame_count))
            .then_with(|| a.pilot_id.cmp(&b.pilot_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;

    let report = BenchmarkReport {
        generated_unix_s: unix_now_secs(),
        max_frames: config.max_frames,
        jobs: config.jobs,
        pilots: config.pilots,
        seeds: config.seeds,
        run_count: run_records.len(),
        pilot_rankings: rankings,
        runs: run_records,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;
    tracing::info!(path = %report_path.display(), "benchmark summary written");

    Ok(report)
}

fn rank_pilots(runs: &[RunMetrics], max_frames: u32) -> Vec<PilotAggregate> {
    let mut grouped: HashMap<&str, Vec<&RunMetrics>> = HashMap::new();
    for run in runs {
        grouped.entry(run.pilot_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<PilotAggregate> = grouped
        .into_iter()
        .map(|(pilot_id, pilot_runs)| {
            let count = pilot_runs.len();
            let survived = pilot_runs
                .iter()
                .filter(|r| !r.game_over && r.frame_count >= max_frames)
                .count();

            PilotAggregate {
                pilot_id: pilot_id.to_string(),
                runs: count,
                avg_score: mean(&pilot_runs, |r| f64::from(r.final_score)),
                max_score: pilot_runs.iter().map(|r| r.final_score).max().unwrap_or_default(),
                avg_frames: mean(&pilot_runs, |r| f64::from(r.frame_count)),
                max_frames: pilot_runs.iter().map(|r| r.frame_count).max().unwrap_or_default(),
                avg_wave: mean(&pilot_runs, |r| f64::from(r.final_wave)),
                max_wave: pilot_runs.iter().map(|r| r.final_wave).max().unwrap_or_default(),
                survival_rate: survived as f64 / count as f64,
                avg_fire_frames: mean(&pilot_runs, |r| f64::from(r.fire_frames)),
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.avg_score
            .total_cmp(&a.avg_score)
            .then_with(|| b.avg_frames.total_cmp(&a.avg_frames))
            .then_with(|| a.pilot_id.cmp(&b.pilot_id))
    });
    rankings
}

fn mean(runs: &[&RunMetrics], value: impl Fn(&RunMetrics) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|run| value(*run)).sum::<f64>() / runs.len() as f64
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "pilot_id,seed_hex,seed,frame_count,final_score,final_lives,final_wave,game_over,action_frames,turn_frames,thrust_frames,fire_frames\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}\n",
            row.pilot_id,
            row.seed_hex,
            row.seed,
            row.frame_count,
            row.final_score,
            row.final_lives,
            row.final_wave,
            row.game_over,
            row.action_frames,
            row.turn_frames,
            row.thrust_frames,
            row.fire_frames
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
