use crate::error::{GitcalError, Result};
use crate::model::{CommitCounts, WindowStats};
use chrono::NaiveDate;

pub const LEVELS: u8 = 5;

/// Intensity level for a day: 0 for no commits, otherwise `ceil(4 * count / max)`.
pub fn level(count: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    let (count, max) = (count.min(max) as u64, max as u64);
    ((count * 4 + max - 1) / max) as u8
}

/// Per-day counts and levels for `[start, end]`, newest day first.
pub fn compute_window(
    counts: &CommitCounts,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<WindowStats> {
    let mut daily = Vec::with_capacity(53 * 7 + 1);
    let mut total = 0u64;
    let mut max = 0u32;

    let mut cursor = Some(end);
    while let Some(t) = cursor.filter(|t| *t >= start) {
        let count = counts.get(t);
        total += count as u64;
        max = max.max(count);
        daily.push(count);
        cursor = t.pred_opt();
    }

    if total == 0 {
        return Err(GitcalError::NoData);
    }

    let levels = daily.iter().map(|&count| level(count, max)).collect();
    log::debug!("window {start}..={end}: {total} commits, busiest day {max}");

    Ok(WindowStats {
        start,
        end,
        counts: daily,
        levels,
        total,
        max,
    })
}
