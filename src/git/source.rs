use crate::error::{GitcalError, Result};
use crate::model::RawCommit;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

pub type CommitIter<'a> = Box<dyn Iterator<Item = Result<RawCommit>> + 'a>;

/// Produces the commit history of one repository as a lazy, single-pass
/// sequence of `(date, author)` records.
pub trait CommitSource {
    fn commits<'a>(&'a self, repo: &Path) -> Result<CommitIter<'a>>;
}

/// Split a `"<iso-date> <author>"` log line. A missing author part yields an empty author.
pub fn parse_log_line(line: &str) -> RawCommit {
    match line.split_once(' ') {
        Some((date, author)) => RawCommit::new(date, author),
        None => RawCommit::new(line, ""),
    }
}

/// Streams `git log --pretty=format:%aI %ae` from a child process.
#[derive(Debug, Clone, Default)]
pub struct GitLogSource {
    pub include_merges: bool,
}

impl GitLogSource {
    pub fn new(include_merges: bool) -> Self {
        Self { include_merges }
    }
}

impl CommitSource for GitLogSource {
    fn commits<'a>(&'a self, repo: &Path) -> Result<CommitIter<'a>> {
        let mut cmd = Command::new("git");
        cmd.arg("log").arg("--pretty=format:%aI %ae");
        if !self.include_merges {
            cmd.arg("--no-merges");
        }
        cmd.current_dir(repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            GitcalError::Source(format!("failed to spawn git in {}: {e}", repo.display()))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GitcalError::Source("git stdout was not captured".to_string()))?;
        let stderr = child.stderr.take().map(drain_stderr);

        log::debug!("spawned git log in {}", repo.display());
        Ok(Box::new(GitLogLines {
            repo: repo.display().to_string(),
            child,
            lines: BufReader::new(stdout).lines(),
            stderr,
            done: false,
        }))
    }
}

struct GitLogLines {
    repo: String,
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
    done: bool,
}

// git blocks once the stderr pipe buffer is full, so stderr is read on its own thread.
fn drain_stderr<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        let _ = pipe.read_to_string(&mut buf);
        buf
    })
}

impl GitLogLines {
    fn finish(&mut self) -> Result<()> {
        self.done = true;
        let status = self.child.wait().map_err(|e| {
            GitcalError::Source(format!("failed to wait for git in {}: {e}", self.repo))
        })?;
        if status.success() {
            if let Some(handle) = self.stderr.take() {
                let _ = handle.join();
            }
            return Ok(());
        }

        let stderr = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        Err(GitcalError::Source(format!(
            "git log failed in {} ({status}): {}",
            self.repo,
            stderr.trim()
        )))
    }
}

impl Iterator for GitLogLines {
    type Item = Result<RawCommit>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.lines.next() {
                Some(Ok(line)) => {
                    let line = line.trim_end_matches('\r');
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(Ok(parse_log_line(line)));
                }
                Some(Err(e)) => {
                    self.done = true;
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    return Some(Err(GitcalError::Source(format!(
                        "failed to read git output in {}: {e}",
                        self.repo
                    ))));
                }
                None => return self.finish().err().map(Err),
            }
        }
        None
    }
}

impl Drop for GitLogLines {
    fn drop(&mut self) {
        if !self.done {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Fixed, in-memory history keyed by repository path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    repos: Vec<(std::path::PathBuf, Vec<RawCommit>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo<I>(mut self, path: impl AsRef<Path>, commits: I) -> Self
    where
        I: IntoIterator<Item = RawCommit>,
    {
        self.repos
            .push((path.as_ref().to_path_buf(), commits.into_iter().collect()));
        self
    }
}

impl CommitSource for MemorySource {
    fn commits<'a>(&'a self, repo: &Path) -> Result<CommitIter<'a>> {
        let (_, commits) = self
            .repos
            .iter()
            .find(|(path, _)| path == repo)
            .ok_or_else(|| GitcalError::Source(format!("unknown repository {}", repo.display())))?;
        Ok(Box::new(commits.iter().cloned().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn log_line_splits_on_first_space() {
        assert_eq!(
            parse_log_line("2024-01-02T10:00:00+01:00 dev@example.com"),
            RawCommit::new("2024-01-02T10:00:00+01:00", "dev@example.com")
        );
        assert_eq!(
            parse_log_line("2024-01-02T10:00:00+01:00"),
            RawCommit::new("2024-01-02T10:00:00+01:00", "")
        );
    }

    #[test]
    fn memory_source_rejects_unknown_repository() {
        let source = MemorySource::new().with_repo("a", vec![RawCommit::new("2024-01-01", "x")]);
        assert_eq!(source.commits(Path::new("a")).unwrap().count(), 1);
        assert!(matches!(
            source.commits(Path::new("b")),
            Err(GitcalError::Source(_))
        ));
    }

    #[test]
    fn git_log_source_fails_outside_a_repository() {
        if Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let source = GitLogSource::new(true);
        let result: Result<Vec<_>> = match source.commits(dir.path()) {
            Ok(iter) => iter.collect(),
            Err(e) => Err(e),
        };
        match result {
            Err(GitcalError::Source(msg)) => assert!(msg.contains("not a git repository"), "{msg}"),
            other => panic!("expected a source error, got {other:?}"),
        }
    }

    #[test]
    fn stderr_is_drained_past_a_pipe_buffer() {
        let noisy = std::io::repeat(b'x').take(1 << 20);
        let captured = drain_stderr(noisy).join().unwrap();
        assert_eq!(captured.len(), 1 << 20);
    }
}
