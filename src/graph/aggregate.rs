use crate::error::Result;
use crate::git::CommitSource;
use crate::model::{AuthorFilter, CommitCounts, RawCommit};
use crate::util::parse_day;
use chrono::NaiveDate;
use std::path::Path;

/// Accumulates per-day commit counts across any number of repositories.
#[derive(Debug, Clone)]
pub struct DayAggregator {
    counts: CommitCounts,
    earliest: NaiveDate,
}

impl DayAggregator {
    /// `today` seeds the earliest date so that an empty history starts and ends today.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            counts: CommitCounts::new(),
            earliest: today,
        }
    }

    /// Pull every record of `repo` from `source`. Returns how many commits were counted.
    pub fn ingest<S>(&mut self, source: &S, repo: &Path, filter: &AuthorFilter) -> Result<usize>
    where
        S: CommitSource + ?Sized,
    {
        let counted = self.ingest_records(source.commits(repo)?, filter)?;
        log::debug!("{}: {counted} commits counted", repo.display());
        Ok(counted)
    }

    pub fn ingest_records<I>(&mut self, records: I, filter: &AuthorFilter) -> Result<usize>
    where
        I: IntoIterator<Item = Result<RawCommit>>,
    {
        let mut counted = 0;
        for record in records {
            if self.record(&record?, filter)? {
                counted += 1;
            }
        }
        Ok(counted)
    }

    /// Count a single commit. Returns `false` when the author filter rejects it.
    pub fn record(&mut self, commit: &RawCommit, filter: &AuthorFilter) -> Result<bool> {
        if !filter.admits(&commit.author) {
            return Ok(false);
        }
        let day = parse_day(&commit.date)?;
        self.counts.increment(day);
        if day < self.earliest {
            self.earliest = day;
        }
        Ok(true)
    }

    pub fn counts(&self) -> &CommitCounts {
        &self.counts
    }

    pub fn earliest(&self) -> NaiveDate {
        self.earliest
    }

    pub fn into_parts(self) -> (CommitCounts, NaiveDate) {
        (self.counts, self.earliest)
    }
}
