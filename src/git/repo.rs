use crate::error::{GitcalError, Result};
use crate::git::source::{CommitIter, CommitSource};
use crate::model::RawCommit;
use chrono::{DateTime, FixedOffset};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

/// Walks history in-process with gix, starting at HEAD.
#[derive(Debug, Clone, Default)]
pub struct GixSource {
    pub include_merges: bool,
}

impl GixSource {
    pub fn new(include_merges: bool) -> Self {
        Self { include_merges }
    }
}

impl CommitSource for GixSource {
    fn commits<'a>(&'a self, path: &Path) -> Result<CommitIter<'a>> {
        let repo = discover(path).map_err(|e| {
            GitcalError::Source(format!("not a git repository {}: {e}", path.display()))
        })?;
        let head_id = {
            let mut head = repo.head().map_err(|e| {
                GitcalError::Source(format!("failed to read HEAD in {}: {e}", path.display()))
            })?;
            let commit = head.peel_to_commit_in_place().map_err(|e| {
                GitcalError::Source(format!("no commits in {}: {e}", path.display()))
            })?;
            commit.id
        };

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} ({pos})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Walking history of {}", path.display()));

        Ok(Box::new(HistoryWalk {
            repo,
            include_merges: self.include_merges,
            seen: HashSet::new(),
            stack: VecDeque::from([head_id]),
            pb,
        }))
    }
}

struct HistoryWalk {
    repo: Repository,
    include_merges: bool,
    seen: HashSet<ObjectId>,
    stack: VecDeque<ObjectId>,
    pb: ProgressBar,
}

impl HistoryWalk {
    fn visit(&mut self, commit_id: ObjectId) -> Result<Option<RawCommit>> {
        let commit = self.repo.find_commit(commit_id)?;
        let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();
        let is_merge = parents.len() > 1;
        self.stack.extend(parents);

        if !self.include_merges && is_merge {
            return Ok(None);
        }

        let author = commit.author()?;
        let time = author.time()?;
        let date = format_commit_time(time.seconds, time.offset)?;
        self.pb.inc(1);
        Ok(Some(RawCommit::new(date, author.email.to_string())))
    }
}

impl Iterator for HistoryWalk {
    type Item = Result<RawCommit>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(commit_id) = self.stack.pop_back() {
            if !self.seen.insert(commit_id) {
                continue;
            }
            match self.visit(commit_id) {
                Ok(Some(commit)) => return Some(Ok(commit)),
                Ok(None) => continue,
                Err(e) => {
                    self.stack.clear();
                    self.pb.abandon();
                    return Some(Err(e));
                }
            }
        }
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
        None
    }
}

/// Render an author time in the author's own offset, matching `git log --pretty=%aI`.
pub fn format_commit_time(seconds: i64, offset: i32) -> Result<String> {
    let offset = FixedOffset::east_opt(offset)
        .ok_or_else(|| GitcalError::InvalidDate(format!("Invalid offset: {offset}")))?;
    let timestamp = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| GitcalError::InvalidDate(format!("Invalid timestamp: {seconds}")))?;
    Ok(timestamp.with_timezone(&offset).to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::parse_day;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::process::Command;

    fn has_git() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str], env: &[(&str, &str)]) {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(dir);
        for (key, value) in env {
            cmd.env(key, value);
        }
        assert!(cmd.status().unwrap().success());
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init"], &[]);
        git(dir, &["config", "user.email", "you@example.com"], &[]);
        git(dir, &["config", "user.name", "Your Name"], &[]);
        git(dir, &["config", "commit.gpgsign", "false"], &[]);
    }

    #[test]
    fn walk_uses_author_date_not_committer_date() {
        let dir = tempfile::tempdir().unwrap();
        if !has_git() {
            return;
        }
        init_repo(dir.path());
        git(
            dir.path(),
            &["commit", "--allow-empty", "-m", "rebased"],
            &[
                ("GIT_AUTHOR_DATE", "2024-02-01T12:00:00+00:00"),
                ("GIT_COMMITTER_DATE", "2024-02-09T12:00:00+00:00"),
                ("GIT_AUTHOR_EMAIL", "author@example.com"),
            ],
        );

        let source = GixSource::new(true);
        let commits: Vec<RawCommit> = source
            .commits(dir.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(
            parse_day(&commits[0].date).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(commits[0].author, "author@example.com");
    }

    #[test]
    fn non_repository_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GixSource::new(true).commits(dir.path()),
            Err(GitcalError::Source(_))
        ));
    }

    #[test]
    fn repository_without_commits_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        if !has_git() {
            return;
        }
        init_repo(dir.path());
        assert!(matches!(
            GixSource::new(true).commits(dir.path()),
            Err(GitcalError::Source(_))
        ));
    }

    #[test]
    fn commit_time_keeps_local_calendar_day() {
        // 2024-01-01T23:30:00Z is already Jan 2nd in UTC+2.
        let rendered = format_commit_time(1_704_151_800, 2 * 3600).unwrap();
        assert_eq!(rendered, "2024-01-02T01:30:00+02:00");
        assert_eq!(
            parse_day(&rendered).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn commit_time_rejects_impossible_offsets() {
        assert!(matches!(
            format_commit_time(0, 48 * 3600),
            Err(GitcalError::InvalidDate(_))
        ));
    }
}
