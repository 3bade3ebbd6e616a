use crate::error::{GitcalError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the calendar day out of an ISO 8601 timestamp. Only the first ten
/// characters (`YYYY-MM-DD`) are looked at.
pub fn parse_day(token: &str) -> Result<NaiveDate> {
    let day = token
        .get(..10)
        .ok_or_else(|| GitcalError::Parse(format!("date token too short: '{token}'")))?;
    if !is_day_shaped(day) {
        return Err(GitcalError::Parse(format!("expected YYYY-MM-DD, got '{day}'")));
    }
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|e| GitcalError::Parse(format!("invalid date '{day}': {e}")))
}

// chrono's %Y/%m/%d accept other widths; only zero-padded YYYY-MM-DD passes here.
fn is_day_shaped(day: &str) -> bool {
    day.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// First day of the graph: one year before `end`, rolled back to the same or preceding Sunday.
pub fn window_start(end: NaiveDate) -> NaiveDate {
    let year_ago = end
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);
    let offset = year_ago.weekday().num_days_from_sunday() as u64;
    year_ago.checked_sub_days(Days::new(offset)).unwrap_or(year_ago)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn parse_day_ignores_time_and_offset() {
        let day = parse_day("2024-02-29T23:59:59+09:00").unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(matches!(parse_day("2024-1-5"), Err(GitcalError::Parse(_))));
        assert!(matches!(parse_day("yesterday!!"), Err(GitcalError::Parse(_))));
        assert!(matches!(parse_day("2024-13-01T00:00"), Err(GitcalError::Parse(_))));
        assert!(matches!(parse_day("02024-1-05"), Err(GitcalError::Parse(_))));
        assert!(matches!(parse_day("2024-1-05T"), Err(GitcalError::Parse(_))));
        assert!(matches!(parse_day("+024-01-05"), Err(GitcalError::Parse(_))));
    }

    #[test]
    fn window_starts_on_sunday_a_year_back() {
        // 2024-01-05 is a Friday; 2023-01-05 is a Thursday, preceding Sunday is 2023-01-01.
        let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let start = window_start(end);
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(start.weekday(), Weekday::Sun);

        // Already a Sunday: no roll back.
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(window_start(end), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }
}
