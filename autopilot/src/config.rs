use std::env;
use std::path::PathBuf;

use asteroids_core::constants::HIGH_SCORE_CAPACITY;
use asteroids_core::JsonScoreStore;

pub const DEFAULT_SCORES_PATH: &str = "highscores.json";
// 10 minutes at 60 fps.
pub const DEFAULT_MAX_FRAMES: u32 = 36_000;

pub const SCORES_PATH_ENV: &str = "ASTEROIDS_SCORES_PATH";
pub const SCORE_CAPACITY_ENV: &str = "ASTEROIDS_SCORE_CAPACITY";
pub const MAX_FRAMES_ENV: &str = "ASTEROIDS_MAX_FRAMES";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub scores_path: PathBuf,
    pub score_capacity: usize,
    pub max_frames: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scores_path: PathBuf::from(DEFAULT_SCORES_PATH),
            score_capacity: HIGH_SCORE_CAPACITY,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Unset values take their
    /// defaults; unparsable or zero values are logged and take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let scores_path = lookup(SCORES_PATH_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH));

        Self {
            scores_path,
            score_capacity: read_positive(&lookup, SCORE_CAPACITY_ENV, HIGH_SCORE_CAPACITY),
            max_frames: read_positive(&lookup, MAX_FRAMES_ENV, DEFAULT_MAX_FRAMES),
        }
    }

    pub fn open_store(&self) -> JsonScoreStore {
        JsonScoreStore::open(&self.scores_path, self.score_capacity)
    }
}

fn read_positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + PartialEq + Default + std::fmt::Display + Copy,
{
    let Some(raw) = lookup(name) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => value,
        _ => {
            tracing::warn!(
                "{} ({:?}) is not a positive integer. Falling back to {}.",
                name,
                raw,
                default
            );
            default
        }
    }
}
