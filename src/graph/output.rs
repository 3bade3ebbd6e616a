use super::grid::WEEK_LENGTH;
use super::window::LEVELS;
use super::GraphReport;
use crate::model::{DayEntry, GraphOutput, SCHEMA_VERSION};
use crate::util::DATE_FORMAT;
use anyhow::Result;
use chrono::{Datelike, Days, Utc};
use console::{measure_text_width, style};
use std::io::Write;

const GLYPH: &str = "■";

/// 256-color palette, one entry per level: none, then four ascending quartiles.
pub const PALETTE: [u8; LEVELS as usize] = [255, 6, 2, 11, 9];

const WEEKDAYS: [&str; WEEK_LENGTH] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const LABEL_WIDTH: usize = 11;

fn cell(level: u8) -> String {
    let color = PALETTE[(level as usize).min(PALETTE.len() - 1)];
    format!("{} ", style(GLYPH).color256(color))
}

/// Month labels above the first week of each month. A label spans two week columns.
pub fn month_header(report: &GraphReport) -> String {
    let mut header = " ".repeat(LABEL_WIDTH);
    let mut t = report.window.start;
    while t < report.window.end {
        if t.day() <= 7 {
            header.push_str(&t.format("%b ").to_string());
        } else if t.day() > 14 {
            header.push_str("  ");
        }
        t = match t.checked_add_days(Days::new(WEEK_LENGTH as u64)) {
            Some(next) => next,
            None => break,
        };
    }
    header
}

pub fn legend(report: &GraphReport) -> String {
    let since = report
        .streaks
        .longest_start
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "n/a".to_string());
    let swatches: String = (0..LEVELS).map(cell).collect();
    format!(
        "Total Commits: {} | Current Streak: {} days | Longest Streak: {} days (from {}) | Less {}More",
        report.window.total, report.streaks.live, report.streaks.longest, since, swatches
    )
}

pub fn output_graph<W: Write>(out: &mut W, report: &GraphReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", month_header(report))?;

    for (weekday, name) in WEEKDAYS.iter().enumerate() {
        write!(out, "{name:>10} ")?;
        for slot in report.grid.row(weekday) {
            match slot {
                Some(level) => write!(out, "{}", cell(level))?,
                None => write!(out, "  ")?,
            }
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    let legend = legend(report);
    let width = LABEL_WIDTH + report.grid.width() * 2;
    let pad = width.saturating_sub(measure_text_width(&legend));
    writeln!(out, "{}{}", " ".repeat(pad), legend)?;
    writeln!(out)?;
    Ok(())
}

pub fn day_entries(report: &GraphReport) -> Vec<DayEntry> {
    let window = &report.window;
    window
        .counts
        .iter()
        .zip(&window.levels)
        .enumerate()
        .rev()
        .filter_map(|(k, (&commit_count, &level))| {
            window
                .end
                .checked_sub_days(Days::new(k as u64))
                .map(|date| DayEntry {
                    date,
                    commit_count,
                    level,
                })
        })
        .collect()
}

pub fn output_json<W: Write>(out: &mut W, report: &GraphReport) -> Result<()> {
    let output = GraphOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repositories: report
            .repositories
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect(),
        authors: report.authors.clone(),
        window_start: report.window.start,
        window_end: report.window.end,
        total_commits: report.window.total,
        max_daily_commits: report.window.max,
        current_streak: report.streaks.live,
        longest_streak: report.streaks.longest,
        longest_streak_start: report.streaks.longest_start,
        days: day_entries(report),
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

pub fn output_ndjson<W: Write>(out: &mut W, report: &GraphReport) -> Result<()> {
    for entry in day_entries(report) {
        writeln!(out, "{}", serde_json::to_string(&entry)?)?;
    }
    Ok(())
}
