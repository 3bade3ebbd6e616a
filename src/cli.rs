use crate::util::DATE_FORMAT;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitcal")]
#[command(about = "Contribution graph of commit activity over the trailing year")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[arg(long, help = "Output as JSON", conflicts_with = "ndjson")]
    pub json: bool,

    #[arg(long, help = "Output one JSON object per day")]
    pub ndjson: bool,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(required = true, num_args = 1.., help = "Paths to git repositories")]
    pub repos: Vec<PathBuf>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Limit statistics to these author emails (comma-separated)"
    )]
    pub author: Vec<String>,

    #[arg(long, value_enum, default_value_t = Backend::Git, help = "How commit history is read")]
    pub backend: Backend,

    #[arg(long, help = "Skip merge commits", default_value_t = false)]
    pub no_merges: bool,

    #[arg(long, value_parser = parse_date, help = "Treat this day (YYYY-MM-DD) as today")]
    pub until: Option<NaiveDate>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Run `git log` in each repository
    Git,
    /// Walk history in-process with gix
    Gix,
}

fn parse_date(input: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD, got '{input}': {e}"))
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::graph::exec(self.common, self.json, self.ndjson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authors_split_on_commas() {
        let cli = Cli::try_parse_from(["gitcal", "--author", "a@x.org, b@x.org", "repo"]).unwrap();
        assert_eq!(cli.common.author, vec!["a@x.org", " b@x.org"]);
        assert_eq!(cli.common.repos, vec![PathBuf::from("repo")]);
        assert_eq!(cli.common.backend, Backend::Git);
    }

    #[test]
    fn repository_is_required() {
        assert!(Cli::try_parse_from(["gitcal"]).is_err());
        assert!(Cli::try_parse_from(["gitcal", "--json"]).is_err());
    }

    #[test]
    fn until_must_be_a_date() {
        let cli = Cli::try_parse_from(["gitcal", "--until", "2024-01-05", "a", "b"]).unwrap();
        assert_eq!(cli.common.until, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(cli.common.repos.len(), 2);
        assert!(Cli::try_parse_from(["gitcal", "--until", "Jan 5", "a"]).is_err());
    }

    #[test]
    fn json_and_ndjson_are_exclusive() {
        assert!(Cli::try_parse_from(["gitcal", "--json", "--ndjson", "a"]).is_err());
    }
}
