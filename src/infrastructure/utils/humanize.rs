use chrono::{DateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Shortens a pay amount to thousands, e.g. `15000` -> `15k`.
pub fn format_salary(value: Decimal) -> String {
    match value.trunc().to_i64() {
        Some(whole) if whole >= 1000 => format!("{}k", whole / 1000),
        Some(whole) => whole.to_string(),
        None => value.to_string(),
    }
}

/// Relative age of a timestamp, e.g. `3h ago`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    if seconds < MINUTE {
        "just now".to_string()
    } else if seconds < HOUR {
        format!("{}m ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{}h ago", seconds / HOUR)
    } else if seconds < WEEK {
        format!("{}d ago", seconds / DAY)
    } else if seconds < MONTH {
        format!("{}w ago", seconds / WEEK)
    } else if seconds < YEAR {
        format!("{}mo ago", seconds / MONTH)
    } else {
        format!("{}y ago", seconds / YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn salary_is_shown_in_thousands() {
        assert_eq!(format_salary(Decimal::from(999)), "999");
        assert_eq!(format_salary(Decimal::from(1000)), "1k");
        assert_eq!(format_salary(Decimal::new(15_999_99, 2)), "15k");
        assert_eq!(format_salary(Decimal::from(4_000_000)), "4000k");
    }

    #[test]
    fn time_ago_picks_the_largest_unit() {
        let now = Utc::now();
        let cases = [
            (Duration::seconds(5), "just now"),
            (Duration::minutes(59), "59m ago"),
            (Duration::hours(2), "2h ago"),
            (Duration::days(6), "6d ago"),
            (Duration::days(14), "2w ago"),
            (Duration::days(65), "2mo ago"),
            (Duration::days(800), "2y ago"),
        ];
        for (age, expected) in cases {
            assert_eq!(time_ago(now - age, now), expected);
        }
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::minutes(3), now), "just now");
    }
}
