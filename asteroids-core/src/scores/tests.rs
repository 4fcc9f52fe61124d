use std::fs;

use tempfile::TempDir;

use super::*;
use crate::constants::HIGH_SCORE_CAPACITY;

fn record(name: &str, score: u32) -> ScoreRecord {
    ScoreRecord {
        name: name.to_string(),
        score,
        date: "2024-01-01 12:00".to_string(),
    }
}

fn full_table() -> HighScoreTable {
    let mut table = HighScoreTable::new(HIGH_SCORE_CAPACITY);
    for i in 0..10u32 {
        table.insert(record("P", 1_000 - i * 100));
    }
    table
}

#[test]
fn empty_table_qualifies_every_score() {
    let table = HighScoreTable::new(HIGH_SCORE_CAPACITY);
    assert!(table.is_high_score(0));
    assert!(table.is_high_score(u32::MAX));
    assert_eq!(table.rank(0), 1);
}

#[test]
fn full_table_requires_beating_the_lowest() {
    let table = full_table();
    assert_eq!(table.len(), 10);
    assert_eq!(table.records().last().map(|r| r.score), Some(100));

    assert!(!table.is_high_score(50));
    assert!(!table.is_high_score(100));
    assert!(table.is_high_score(101));
}

#[test]
fn insert_keeps_descending_order_and_capacity() {
    let mut table = full_table();
    table.insert(record("NEW", 550));
    table.insert(record("TOP", 5_000));

    assert_eq!(table.len(), HIGH_SCORE_CAPACITY);
    let scores: Vec<u32> = table.records().iter().map(|r| r.score).collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(scores[0], 5_000);
    assert!(!scores.contains(&100));
    assert!(!scores.contains(&200));
}

#[test]
fn ties_keep_older_entry_first() {
    let mut table = HighScoreTable::new(3);
    table.insert(record("OLD", 500));
    table.insert(record("NEW", 500));

    let names: Vec<&str> = table.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["OLD", "NEW"]);
    assert_eq!(table.rank(500), 3);
    assert_eq!(table.rank(501), 1);
}

#[test]
fn rank_counts_scores_at_or_above() {
    let table = full_table();
    assert_eq!(table.rank(2_000), 1);
    assert_eq!(table.rank(950), 2);
    assert_eq!(table.rank(900), 3);
    assert_eq!(table.rank(0), 11);
}

#[test]
fn names_are_cut_to_ten_chars() {
    let mut table = HighScoreTable::new(HIGH_SCORE_CAPACITY);
    table.insert(record("ABCDEFGHIJKLMNOP", 10));
    assert_eq!(table.records()[0].name, "ABCDEFGHIJ");

    let loaded = HighScoreTable::from_records(2, vec![record("ZYXWVUTSRQPO", 1)]);
    assert_eq!(loaded.records()[0].name, "ZYXWVUTSRQ");
}

#[test]
fn from_records_sorts_and_trims() {
    let table = HighScoreTable::from_records(
        2,
        vec![record("A", 10), record("B", 30), record("C", 20)],
    );
    let scores: Vec<u32> = table.records().iter().map(|r| r.score).collect();
    assert_eq!(scores, [30, 20]);
}

#[test]
fn memory_scores_stamp_a_date() {
    let mut scores = MemoryScores::new(HIGH_SCORE_CAPACITY);
    scores.add("ACE", 1_234);
    let stored = &scores.records()[0];
    assert_eq!(stored.name, "ACE");
    assert_eq!(stored.score, 1_234);
    assert_eq!(stored.date.len(), "2024-01-01 12:00".len());

    scores.clear();
    assert!(scores.records().is_empty());
}

#[test]
fn json_store_missing_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonScoreStore::open(dir.path().join("highscores.json"), HIGH_SCORE_CAPACITY);
    assert!(store.records().is_empty());
    assert!(store.is_high_score(0));
}

#[test]
fn json_store_corrupt_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("highscores.json");
    fs::write(&path, b"{not json").unwrap();

    let store = JsonScoreStore::open(&path, HIGH_SCORE_CAPACITY);
    assert!(store.records().is_empty());
}

#[test]
fn json_store_persists_adds_and_clears() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("highscores.json");

    let mut store = JsonScoreStore::open(&path, HIGH_SCORE_CAPACITY);
    store.add("ACE", 900);
    store.add("BOB", 1_200);
    assert!(path.exists());

    let reopened = JsonScoreStore::open(&path, HIGH_SCORE_CAPACITY);
    let names: Vec<&str> = reopened.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["BOB", "ACE"]);

    let raw: Vec<ScoreRecord> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[0].score, 1_200);

    let mut reopened = reopened;
    reopened.clear();
    let cleared = JsonScoreStore::open(&path, HIGH_SCORE_CAPACITY);
    assert!(cleared.records().is_empty());
}

#[test]
fn json_store_reads_existing_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("highscores.json");
    fs::write(
        &path,
        br#"[
  {"name": "LOW", "score": 20, "date": "2024-02-02 10:00"},
  {"name": "HIGH", "score": 3000, "date": "2024-02-01 09:30"}
]"#,
    )
    .unwrap();

    let store = JsonScoreStore::open(&path, HIGH_SCORE_CAPACITY);
    assert_eq!(store.records()[0].name, "HIGH");
    assert_eq!(store.records()[1].date, "2024-02-02 10:00");
}

#[test]
fn json_store_write_failure_keeps_memory_state() {
    let dir = TempDir::new().unwrap();
    // A directory at the file path makes every write fail.
    let path = dir.path().join("blocked");
    fs::create_dir(&path).unwrap();

    let mut store = JsonScoreStore::open(&path, HIGH_SCORE_CAPACITY);
    assert!(store.records().is_empty());

    store.add("ACE", 400);
    assert_eq!(store.records().len(), 1);
    assert!(store.save().is_err());
}
