use chrono::{DateTime, Utc};

use crate::model::EXAM_DURATION_MIN;

/// Seconds left on the countdown, clamped at zero. Recomputed by
/// subtraction on every evaluation; there is no scheduled callback.
pub fn remaining_secs(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = now.signed_duration_since(start).num_seconds();
    (EXAM_DURATION_MIN * 60 - elapsed).max(0)
}

pub fn elapsed_secs(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(start).num_seconds().max(0)
}

/// Floor-truncated MM:SS for the titlebar countdown.
pub fn format_remaining(total_secs: i64) -> String {
    if total_secs <= 0 {
        return "00:00".to_string();
    }
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Elapsed time split for the report's "spent" line.
pub fn split_minutes(total_secs: i64) -> (i64, i64) {
    let secs = total_secs.max(0);
    (secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn remaining_counts_down_and_clamps() {
        let start = Utc::now();
        assert_eq!(remaining_secs(start, start), EXAM_DURATION_MIN * 60);
        let late = start + Duration::minutes(EXAM_DURATION_MIN + 1);
        assert_eq!(remaining_secs(start, late), 0);
    }

    #[test]
    fn format_is_floor_truncated() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(-5), "00:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(6000), "100:00");
        assert_eq!(format_remaining(61), "01:01");
    }

    #[test]
    fn split_minutes_matches_format() {
        assert_eq!(split_minutes(125), (2, 5));
        assert_eq!(split_minutes(-3), (0, 0));
    }
}
