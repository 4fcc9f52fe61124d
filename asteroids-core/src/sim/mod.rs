//! Real-time simulation: entities, the per-tick match update with its
//! collision and scoring pass, and the session phase machine around it.
//!
//! Nothing in here draws or polls devices. A driver feeds [`Intent`]s into
//! [`Session::step`] once per frame and renders from the snapshots.

use serde::{Deserialize, Serialize};

use crate::constants::{ASTEROID_POINTS, ASTEROID_RADII, ASTEROID_SPEEDS};
use crate::geometry::Point;
use crate::scores::ScoreRecord;

mod entities;
mod game;
mod session;

pub use session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Playing,
    GameOver,
    EnterName,
    ShowScores,
}

/// Discrete input for one frame. Held controls (rotation, thrust) are sent
/// once per frame they are held; each send is one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    RotateLeft,
    RotateRight,
    Thrust,
    Fire,
    Confirm,
    Cancel,
    Backspace,
    Char(char),
    Restart,
    ShowScores,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsteroidTier {
    Large,
    Medium,
    Small,
}

impl AsteroidTier {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Large => 0,
            Self::Medium => 1,
            Self::Small => 2,
        }
    }

    #[inline]
    pub fn radius(self) -> f64 {
        ASTEROID_RADII[self.index()]
    }

    #[inline]
    pub fn speed(self) -> f64 {
        ASTEROID_SPEEDS[self.index()]
    }

    #[inline]
    pub fn points(self) -> u32 {
        ASTEROID_POINTS[self.index()]
    }

    pub fn smaller(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Player,
    Saucer,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64,
    pub radius: f64,
    /// False on the "off" half of the invulnerability blink.
    pub visible: bool,
    pub outline: [Point; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: i32,
    pub owner: Owner,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64,
    pub tier: AsteroidTier,
    pub collision_radius: f64,
    pub outline: Vec<Point>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaucerSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub fire_timer: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame_count: u32,
    pub score: u32,
    pub lives: u32,
    pub wave: u32,
    pub invulnerable_timer: i32,
    pub ship: ShipSnapshot,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub saucers: Vec<SaucerSnapshot>,
}

impl WorldSnapshot {
    pub fn player_projectiles(&self) -> usize {
        self.projectiles
            .iter()
            .filter(|entry| entry.owner == Owner::Player)
            .count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub brightness: u8,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub world: WorldSnapshot,
    /// Name typed so far; only meaningful in [`Phase::EnterName`].
    pub name_entry: String,
    /// Rank the final score would take, shown on the game-over screen.
    pub pending_rank: Option<usize>,
    pub high_scores: Vec<ScoreRecord>,
    pub stars: Vec<Star>,
}
