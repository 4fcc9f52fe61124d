use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{HighScoreTable, ScoreGateway, ScoreRecord};
use crate::error::ScoreStoreError;

/// File-backed score table.
///
/// The file is a pretty-printed JSON array of `{name, score, date}` objects,
/// read once on open and rewritten after every `add` or `clear`. A missing or
/// corrupt file opens as an empty table. Write failures are logged and the
/// in-memory table stays authoritative for the rest of the session.
#[derive(Debug)]
pub struct JsonScoreStore {
    path: PathBuf,
    table: HighScoreTable,
}

impl JsonScoreStore {
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let records = match load_records(&path) {
            Ok(records) => records,
            Err(err) if err.is_not_found() => {
                tracing::debug!(path = %path.display(), "no score file yet; starting empty");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("{err}; starting with an empty table");
                Vec::new()
            }
        };

        Self {
            table: HighScoreTable::from_records(capacity, records),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), ScoreStoreError> {
        let encoded =
            serde_json::to_vec_pretty(self.table.records()).map_err(ScoreStoreError::Encode)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ScoreStoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        fs::write(&self.path, encoded).map_err(|source| ScoreStoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn save_best_effort(&self) {
        if let Err(err) = self.save() {
            tracing::warn!("{err}; keeping scores in memory only");
        }
    }
}

impl ScoreGateway for JsonScoreStore {
    fn table(&self) -> &HighScoreTable {
        &self.table
    }

    fn add(&mut self, name: &str, score: u32) {
        let record = ScoreRecord::now(name, score);
        tracing::info!(name = %record.name, score, "recording high score");
        self.table.insert(record);
        self.save_best_effort();
    }

    fn clear(&mut self) {
        self.table.clear();
        self.save_best_effort();
    }
}

fn load_records(path: &Path) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
    let raw = fs::read(path).map_err(|source| ScoreStoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ScoreStoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
