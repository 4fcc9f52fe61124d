mod store;
#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::constants::{NAME_MAX_CHARS, SCORE_DATE_FORMAT};

pub use store::JsonScoreStore;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    pub date: String,
}

impl ScoreRecord {
    /// Builds a record stamped with the current local time. The name is cut
    /// to the stored length.
    pub fn now(name: &str, score: u32) -> Self {
        Self {
            name: truncate_name(name),
            score,
            date: chrono::Local::now().format(SCORE_DATE_FORMAT).to_string(),
        }
    }
}

/// Bounded list of records, highest score first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreTable {
    capacity: usize,
    records: Vec<ScoreRecord>,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::with_capacity(capacity),
        }
    }

    /// Accepts records in any order; sorts, trims names and drops the tail
    /// beyond `capacity`.
    pub fn from_records(capacity: usize, records: Vec<ScoreRecord>) -> Self {
        let mut table = Self::new(capacity);
        table.records = records
            .into_iter()
            .map(|record| ScoreRecord {
                name: truncate_name(&record.name),
                ..record
            })
            .collect();
        table.normalize();
        table
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_high_score(&self, score: u32) -> bool {
        if self.records.len() < self.capacity {
            return true;
        }
        self.records.last().is_some_and(|lowest| score > lowest.score)
    }

    /// 1-based position `score` would take; ties rank below existing entries.
    pub fn rank(&self, score: u32) -> usize {
        1 + self
            .records
            .iter()
            .take_while(|record| score <= record.score)
            .count()
    }

    pub fn insert(&mut self, record: ScoreRecord) {
        self.records.push(ScoreRecord {
            name: truncate_name(&record.name),
            ..record
        });
        self.normalize();
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn normalize(&mut self) {
        // Stable: among equal scores the older entry stays ahead.
        self.records.sort_by(|a, b| b.score.cmp(&a.score));
        self.records.truncate(self.capacity);
    }
}

/// Narrow interface the session uses to consult and update the score table.
pub trait ScoreGateway {
    fn table(&self) -> &HighScoreTable;

    fn add(&mut self, name: &str, score: u32);

    fn clear(&mut self);

    fn is_high_score(&self, score: u32) -> bool {
        self.table().is_high_score(score)
    }

    fn rank(&self, score: u32) -> usize {
        self.table().rank(score)
    }

    fn records(&self) -> &[ScoreRecord] {
        self.table().records()
    }
}

/// Table that lives only as long as the process.
#[derive(Clone, Debug)]
pub struct MemoryScores {
    table: HighScoreTable,
}

impl MemoryScores {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: HighScoreTable::new(capacity),
        }
    }

    pub fn with_table(table: HighScoreTable) -> Self {
        Self { table }
    }
}

impl ScoreGateway for MemoryScores {
    fn table(&self) -> &HighScoreTable {
        &self.table
    }

    fn add(&mut self, name: &str, score: u32) {
        self.table.insert(ScoreRecord::now(name, score));
    }

    fn clear(&mut self) {
        self.table.clear();
    }
}

fn truncate_name(name: &str) -> String {
    name.chars().take(NAME_MAX_CHARS).collect()
}
