use super::game::Game;
use super::{Flow, Intent, Phase, SessionSnapshot, Star, WorldSnapshot};
use crate::constants::{NAME_MAX_CHARS, STAR_BRIGHTNESS, STAR_COUNT, WORLD_HEIGHT, WORLD_WIDTH};
use crate::rng::SeededRng;
use crate::scores::ScoreGateway;

/// A play session: one match at a time plus the screens between matches.
///
/// Only [`Phase::Playing`] advances the simulation. The other phases are
/// input-only screens; their frames leave the world untouched. Scores are
/// read and written through the injected [`ScoreGateway`], and only at
/// phase transitions.
pub struct Session<G> {
    game: Game,
    phase: Phase,
    name_entry: String,
    scores: G,
    stars: Vec<Star>,
}

impl<G: ScoreGateway> Session<G> {
    pub fn new(seed: u32, scores: G) -> Self {
        Self::with_rng(SeededRng::new(seed), scores)
    }

    pub fn with_rng(mut rng: SeededRng, scores: G) -> Self {
        let stars = starfield(&mut rng);
        Self {
            game: Game::with_rng(rng),
            phase: Phase::Playing,
            name_entry: String::new(),
            scores,
            stars,
        }
    }

    /// Runs one frame. Gameplay intents are applied in order and then the
    /// match ticks once; on the other screens each intent is handled in
    /// order against whatever phase is current when it arrives.
    pub fn step(&mut self, intents: &[Intent]) -> Flow {
        if intents.contains(&Intent::Quit) {
            tracing::info!(phase = ?self.phase, score = self.game.score, "quit requested");
            return Flow::Quit;
        }

        if self.phase == Phase::Playing {
            self.play_frame(intents);
            return Flow::Continue;
        }

        for intent in intents {
            match self.phase {
                Phase::Playing => break,
                Phase::GameOver => self.on_game_over(*intent),
                Phase::EnterName => self.on_enter_name(*intent),
                Phase::ShowScores => self.on_show_scores(*intent),
            }
        }
        Flow::Continue
    }

    fn play_frame(&mut self, intents: &[Intent]) {
        for intent in intents {
            match intent {
                Intent::RotateLeft => self.game.rotate_left(),
                Intent::RotateRight => self.game.rotate_right(),
                Intent::Thrust => self.game.thrust(),
                Intent::Fire => {
                    self.game.fire();
                }
                _ => {}
            }
        }

        let report = self.game.step();
        if report.points > 0 {
            tracing::trace!(
                points = report.points,
                asteroids = report.asteroids_destroyed,
                saucers = report.saucers_destroyed,
                score = self.game.score,
                "scored"
            );
        }
        if report.wave_spawned {
            tracing::info!(wave = self.game.wave, score = self.game.score, "field cleared");
        }
        if report.ship_hit && self.game.lives == 0 {
            self.finish_match();
        }
    }

    fn finish_match(&mut self) {
        let score = self.game.score;
        if self.scores.is_high_score(score) {
            self.name_entry.clear();
            self.transition(Phase::EnterName);
        } else {
            self.transition(Phase::GameOver);
        }
    }

    fn on_game_over(&mut self, intent: Intent) {
        match intent {
            Intent::Restart => self.restart(),
            Intent::ShowScores => self.transition(Phase::ShowScores),
            _ => {}
        }
    }

    fn on_enter_name(&mut self, intent: Intent) {
        match intent {
            Intent::Char(ch) => {
                if is_printable(ch) && self.name_entry.chars().count() < NAME_MAX_CHARS {
                    self.name_entry.extend(ch.to_uppercase());
                    while self.name_entry.chars().count() > NAME_MAX_CHARS {
                        self.name_entry.pop();
                    }
                }
            }
            Intent::Backspace => {
                self.name_entry.pop();
            }
            Intent::Confirm => {
                let name = self.name_entry.trim().to_string();
                if name.is_empty() {
                    tracing::info!(score = self.game.score, "blank name; score not recorded");
                } else {
                    self.scores.add(&name, self.game.score);
                }
                self.name_entry.clear();
                self.transition(Phase::ShowScores);
            }
            Intent::Cancel => {
                tracing::info!(score = self.game.score, "name entry skipped");
                self.name_entry.clear();
                self.transition(Phase::ShowScores);
            }
            _ => {}
        }
    }

    fn on_show_scores(&mut self, intent: Intent) {
        match intent {
            Intent::Restart => self.restart(),
            Intent::Cancel => self.transition(Phase::GameOver),
            _ => {}
        }
    }

    fn restart(&mut self) {
        self.game.reset();
        self.name_entry.clear();
        self.transition(Phase::Playing);
    }

    fn transition(&mut self, next: Phase) {
        tracing::info!(
            from = ?self.phase,
            to = ?next,
            score = self.game.score,
            frame = self.game.frame_count,
            "phase change"
        );
        self.phase = next;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.game.score
    }

    pub fn lives(&self) -> u32 {
        self.game.lives
    }

    pub fn wave(&self) -> u32 {
        self.game.wave
    }

    pub fn frame_count(&self) -> u32 {
        self.game.frame_count
    }

    pub fn name_entry(&self) -> &str {
        &self.name_entry
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn scores(&self) -> &G {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut G {
        &mut self.scores
    }

    pub fn into_scores(self) -> G {
        self.scores
    }

    pub fn world(&self) -> WorldSnapshot {
        self.game.world_snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let pending_rank = match self.phase {
            Phase::GameOver | Phase::EnterName if self.scores.is_high_score(self.game.score) => {
                Some(self.scores.rank(self.game.score))
            }
            _ => None,
        };

        SessionSnapshot {
            phase: self.phase,
            world: self.game.world_snapshot(),
            name_entry: self.name_entry.clone(),
            pending_rank,
            high_scores: self.scores.records().to_vec(),
            stars: self.stars.clone(),
        }
    }
}

/// Visible characters plus the plain space. Control, format, separator and
/// private-use code points never reach the name buffer.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !(ch.is_control()
        || ch.is_whitespace()
        || matches!(
            ch,
            '\u{00AD}'
                | '\u{0600}'..='\u{0605}'
                | '\u{061C}'
                | '\u{06DD}'
                | '\u{070F}'
                | '\u{180E}'
                | '\u{200B}'..='\u{200F}'
                | '\u{2028}'..='\u{202E}'
                | '\u{2060}'..='\u{206F}'
                | '\u{E000}'..='\u{F8FF}'
                | '\u{FEFF}'
                | '\u{FFF9}'..='\u{FFFB}'
                | '\u{E0001}'..='\u{E007F}'
                | '\u{F0000}'..='\u{10FFFF}'
        ))
}

fn starfield(rng: &mut SeededRng) -> Vec<Star> {
    (0..STAR_COUNT)
        .map(|_| Star {
            x: rng.next_range(0, WORLD_WIDTH as i32),
            y: rng.next_range(0, WORLD_HEIGHT as i32),
            brightness: STAR_BRIGHTNESS[rng.next_int(STAR_BRIGHTNESS.len() as u32) as usize],
        })
        .collect()
}
