use super::{build_report, output_graph, output_json, output_ndjson, DayAggregator};
use crate::cli::{Backend, CommonArgs};
use crate::git::{CommitSource, GitLogSource, GixSource};
use crate::model::AuthorFilter;
use anyhow::Context;
use chrono::Local;
use std::io::{self, Write};

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let today = common.until.unwrap_or_else(|| Local::now().date_naive());
    let filter = AuthorFilter::new(&common.author);
    let include_merges = !common.no_merges;

    let source: Box<dyn CommitSource> = match common.backend {
        Backend::Git => Box::new(GitLogSource::new(include_merges)),
        Backend::Gix => Box::new(GixSource::new(include_merges)),
    };

    let mut aggregator = DayAggregator::new(today);
    for repo in &common.repos {
        let counted = aggregator
            .ingest(source.as_ref(), repo, &filter)
            .with_context(|| format!("Failed to read commit history of {}", repo.display()))?;
        if counted == 0 {
            log::warn!("{}: no matching commits", repo.display());
        }
    }

    let (counts, earliest) = aggregator.into_parts();
    log::debug!(
        "{} commits on {} days since {earliest}",
        counts.total(),
        counts.active_days()
    );

    let report = build_report(
        &counts,
        today,
        earliest,
        common.repos,
        filter.authors().to_vec(),
    )
    .context("Failed to compute contribution graph")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        output_json(&mut out, &report)?;
    } else if ndjson {
        output_ndjson(&mut out, &report)?;
    } else {
        output_graph(&mut out, &report)?;
    }
    out.flush()?;

    Ok(())
}
