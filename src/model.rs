use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SCHEMA_VERSION: u32 = 1;

/// Order-preserving integer encoding of a calendar day (`year*10000 + month*100 + day`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey(i64);

impl DayKey {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        DayKey(date.year() as i64 * 10000 + date.month() as i64 * 100 + date.day() as i64)
    }
}

/// One line of history as handed over by a commit source, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub date: String,
    pub author: String,
}

impl RawCommit {
    pub fn new(date: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            author: author.into(),
        }
    }
}

/// Commits per day. Days without qualifying commits have no entry.
#[derive(Debug, Clone, Default)]
pub struct CommitCounts {
    days: HashMap<DayKey, u32>,
}

impl CommitCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> u32 {
        self.days.get(&DayKey::from(date)).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, date: NaiveDate) {
        *self.days.entry(DayKey::from(date)).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.days.values().map(|&c| c as u64).sum()
    }

    pub fn active_days(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<NaiveDate> for CommitCounts {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        let mut counts = CommitCounts::new();
        for date in iter {
            counts.increment(date);
        }
        counts
    }
}

/// Exact-match author filter. An empty filter admits every author.
#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    authors: Vec<String>,
}

impl AuthorFilter {
    pub fn new<I, S>(authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let authors = authors
            .into_iter()
            .map(|a| a.as_ref().trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        Self { authors }
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn admits(&self, author: &str) -> bool {
        self.is_empty() || self.authors.iter().any(|a| a == author.trim())
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakResult {
    pub longest: u32,
    pub longest_start: Option<NaiveDate>,
    pub live: u32,
}

/// Per-day statistics over the rendered window. `counts` and `levels` are newest-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub counts: Vec<u32>,
    pub levels: Vec<u8>,
    pub total: u64,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub commit_count: u32,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<String>,
    pub authors: Vec<String>,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub total_commits: u64,
    pub max_daily_commits: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub longest_streak_start: Option<NaiveDate>,
    pub days: Vec<DayEntry>,
}
