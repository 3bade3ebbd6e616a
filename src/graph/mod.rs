pub mod aggregate;
pub mod exec;
pub mod grid;
pub mod output;
pub mod streak;
pub mod window;

pub use aggregate::DayAggregator;
pub use exec::exec;
pub use grid::Grid;
pub use output::{output_graph, output_json, output_ndjson};
pub use streak::compute_streaks;
pub use window::{compute_window, level};

use crate::error::Result;
use crate::model::{CommitCounts, StreakResult, WindowStats};
use crate::util::window_start;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Everything the renderers need for one invocation.
#[derive(Debug, Clone)]
pub struct GraphReport {
    pub repositories: Vec<PathBuf>,
    pub authors: Vec<String>,
    pub streaks: StreakResult,
    pub window: WindowStats,
    pub grid: Grid,
}

pub fn build_report(
    counts: &CommitCounts,
    today: NaiveDate,
    earliest: NaiveDate,
    repositories: Vec<PathBuf>,
    authors: Vec<String>,
) -> Result<GraphReport> {
    let streaks = compute_streaks(counts, today, earliest);
    let window = compute_window(counts, window_start(today), today)?;
    let grid = Grid::layout(&window.levels);
    Ok(GraphReport {
        repositories,
        authors,
        streaks,
        window,
        grid,
    })
}
