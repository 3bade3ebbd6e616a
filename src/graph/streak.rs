use crate::model::{CommitCounts, StreakResult};
use chrono::NaiveDate;

/// Walk backward from `today` and measure runs of active days.
///
/// The live streak is the first run closed by a zero day other than `today`,
/// so an idle today does not break a streak that ended yesterday. Ties on the
/// longest streak keep the most recent run. The day before `earliest` closes
/// the final run: nothing was committed before the earliest recorded day.
pub fn compute_streaks(
    counts: &CommitCounts,
    today: NaiveDate,
    earliest: NaiveDate,
) -> StreakResult {
    let mut result = StreakResult::default();
    let mut live_pending = true;
    let mut run = 0u32;
    let stop = earliest.pred_opt().unwrap_or(earliest);

    let mut cursor = Some(today);
    while let Some(t) = cursor {
        if t < stop {
            break;
        }

        let active = t >= earliest && counts.get(t) > 0;
        if active {
            run += 1;
        } else {
            if live_pending && t != today {
                result.live = run;
                live_pending = false;
            }
            if run > result.longest {
                result.longest = run;
                result.longest_start = t.succ_opt();
            }
            run = 0;
        }

        cursor = t.pred_opt();
    }

    result
}
