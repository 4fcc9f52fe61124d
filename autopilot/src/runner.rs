use crate::pilot::{create_pilot, Pilot};
use anyhow::{anyhow, Result};
use asteroids_core::{Flow, Intent, Phase, ScoreGateway, Session};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunMetrics {
    pub pilot_id: String,
    pub seed: u32,
    pub max_frames: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_lives: u32,
    pub final_wave: u32,
    pub game_over: bool,
    pub final_phase: Phase,
    /// Name committed to the score table, if the run qualified.
    pub recorded_name: Option<String>,
    /// Table rank the final score took when it was recorded.
    pub recorded_rank: Option<usize>,
    pub action_frames: u32,
    pub turn_frames: u32,
    pub thrust_frames: u32,
    pub fire_frames: u32,
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub max_frames: u32,
    /// Overrides the pilot's initials on the name-entry screen.
    pub name: Option<String>,
}

pub struct RunArtifact<G> {
    pub metrics: RunMetrics,
    pub scores: G,
}

pub fn run_pilot<G: ScoreGateway>(
    pilot_id: &str,
    seed: u32,
    options: &RunOptions,
    scores: G,
) -> Result<RunArtifact<G>> {
    let mut pilot = create_pilot(pilot_id).ok_or_else(|| anyhow!("unknown pilot '{pilot_id}'"))?;
    run_pilot_instance(pilot.as_mut(), seed, options, scores)
}

/// Plays one match to its end (or to the frame limit) and, when the final
/// score qualifies, signs the table the way a player at the keyboard would.
pub fn run_pilot_instance<G: ScoreGateway>(
    pilot: &mut dyn Pilot,
    seed: u32,
    options: &RunOptions,
    scores: G,
) -> Result<RunArtifact<G>> {
    if options.max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }

    pilot.reset(seed);
    let mut session = Session::new(seed, scores);

    let mut action_frames = 0u32;
    let mut turn_frames = 0u32;
    let mut thrust_frames = 0u32;
    let mut fire_frames = 0u32;

    while session.phase() == Phase::Playing && session.frame_count() < options.max_frames {
        let intents = pilot.next_intents(&session.world());

        if !intents.is_empty() {
            action_frames += 1;
        }
        if intents
            .iter()
            .any(|i| matches!(i, Intent::RotateLeft | Intent::RotateRight))
        {
            turn_frames += 1;
        }
        if intents.contains(&Intent::Thrust) {
            thrust_frames += 1;
        }
        if intents.contains(&Intent::Fire) {
            fire_frames += 1;
        }

        if session.step(&intents) == Flow::Quit {
            break;
        }
    }

    let final_score = session.score();
    let game_over = session.lives() == 0;

    let mut recorded_name = None;
    let mut recorded_rank = None;
    if session.phase() == Phase::EnterName {
        let name = options
            .name
            .as_deref()
            .unwrap_or_else(|| pilot.initials())
            .to_string();
        let rank = session.scores().rank(final_score);

        let mut signature: Vec<Intent> = name.chars().map(Intent::Char).collect();
        signature.push(Intent::Confirm);
        session.step(&signature);

        // Scores at or above ours sit ahead of the new entry, so a committed
        // entry lands exactly at `rank`.
        recorded_name = session
            .scores()
            .records()
            .get(rank - 1)
            .filter(|record| record.score == final_score)
            .map(|record| record.name.clone());
        if recorded_name.is_some() {
            recorded_rank = Some(rank);
        }
    }

    tracing::debug!(
        pilot = pilot.id(),
        seed,
        frames = session.frame_count(),
        score = final_score,
        game_over,
        "run finished"
    );

    Ok(RunArtifact {
        metrics: RunMetrics {
            pilot_id: pilot.id().to_string(),
            seed,
            max_frames: options.max_frames,
            frame_count: session.frame_count(),
            final_score,
            final_lives: session.lives(),
            final_wave: session.wave(),
            game_over,
            final_phase: session.phase(),
            recorded_name,
            recorded_rank,
            action_frames,
            turn_frames,
            thrust_frames,
            fire_frames,
        },
        scores: session.into_scores(),
    })
}
