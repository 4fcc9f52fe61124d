pub mod constants;
pub mod error;
pub mod geometry;
pub mod rng;
pub mod scores;
pub mod sim;

pub use error::ScoreStoreError;
pub use rng::SeededRng;
pub use scores::{HighScoreTable, JsonScoreStore, MemoryScores, ScoreGateway, ScoreRecord};
pub use sim::{AsteroidTier, Flow, Intent, Owner, Phase, Session, SessionSnapshot, WorldSnapshot};
