//! Day expressions: single days, "Daily", and dashed spans that may wrap
//! past Sunday.

use chrono::Weekday;

const SPAN_SEPARATOR: &str = " - ";
const DAILY: &str = "daily";

/// Weekdays in range order (Monday = 0).
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Get the full lower-case name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Resolve a full weekday name, ignoring case and surrounding whitespace.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim().to_lowercase();
    WEEK.into_iter().find(|day| weekday_name(*day) == name)
}

/// Check whether a day expression covers the given weekday.
///
/// Rules, first applicable wins:
/// 1. contains "daily" => always true
/// 2. contains " - " => inclusive span, wrapping when start > end; an
///    unknown day name on either side never matches
/// 3. otherwise the weekday's name must appear in the expression
pub fn day_matches(expression: &str, day: Weekday) -> bool {
    let expression = expression.to_lowercase();

    if expression.contains(DAILY) {
        return true;
    }

    if let Some((start, end)) = expression.split_once(SPAN_SEPARATOR) {
        let (Some(start), Some(end)) = (parse_weekday(start), parse_weekday(end)) else {
            return false;
        };
        let (start, end, day) = (
            start.num_days_from_monday(),
            end.num_days_from_monday(),
            day.num_days_from_monday(),
        );
        return if start <= end {
            start <= day && day <= end
        } else {
            day >= start || day <= end
        };
    }

    expression.contains(weekday_name(day))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Weekday Name Tests ====================

    #[test]
    fn test_parse_weekday_case_insensitive() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("  SUNDAY "), Some(Weekday::Sun));
        assert_eq!(parse_weekday("Funday"), None);
        assert_eq!(parse_weekday("Mon"), None);
    }

    #[test]
    fn test_weekday_name_roundtrip() {
        for day in WEEK {
            assert_eq!(parse_weekday(weekday_name(day)), Some(day));
        }
    }

    // ==================== Daily Tests ====================

    #[test]
    fn test_daily_matches_every_day() {
        for day in WEEK {
            assert!(day_matches("Daily", day));
            assert!(day_matches("DAILY", day));
        }
    }

    // ==================== Span Tests ====================

    #[test]
    fn test_in_order_span() {
        assert!(day_matches("Monday - Friday", Weekday::Mon));
        assert!(day_matches("Monday - Friday", Weekday::Wed));
        assert!(day_matches("Monday - Friday", Weekday::Fri));
        assert!(!day_matches("Monday - Friday", Weekday::Sat));
        assert!(!day_matches("Monday - Friday", Weekday::Sun));
    }

    #[test]
    fn test_wrapping_span() {
        assert!(day_matches("Friday - Monday", Weekday::Fri));
        assert!(day_matches("Friday - Monday", Weekday::Sat));
        assert!(day_matches("Friday - Monday", Weekday::Sun));
        assert!(day_matches("Friday - Monday", Weekday::Mon));
        assert!(!day_matches("Friday - Monday", Weekday::Tue));
        assert!(!day_matches("Friday - Monday", Weekday::Wed));
        assert!(!day_matches("Friday - Monday", Weekday::Thu));
    }

    #[test]
    fn test_single_day_span() {
        assert!(day_matches("Sunday - Sunday", Weekday::Sun));
        assert!(!day_matches("Sunday - Sunday", Weekday::Sat));
    }

    #[test]
    fn test_span_with_unknown_day_fails_closed() {
        for day in WEEK {
            assert!(!day_matches("Monday - Someday", day));
            assert!(!day_matches("Whenever - Friday", day));
        }
    }

    #[test]
    fn test_double_span_matches_nothing() {
        // "Wednesday - Friday" is not a weekday name
        for day in WEEK {
            assert!(!day_matches("Monday - Wednesday - Friday", day));
        }
    }

    #[test]
    fn test_double_span_with_daily_still_matches() {
        assert!(day_matches("Daily - Monday - Friday", Weekday::Sun));
    }

    #[test]
    fn test_dash_without_spaces_is_not_a_span() {
        // Falls through to the substring rule
        assert!(day_matches("Monday-Friday", Weekday::Mon));
        assert!(!day_matches("Monday-Friday", Weekday::Wed));
    }

    // ==================== Single Day Tests ====================

    #[test]
    fn test_single_day() {
        assert!(day_matches("Saturday", Weekday::Sat));
        assert!(day_matches("saturday", Weekday::Sat));
        assert!(!day_matches("Saturday", Weekday::Sun));
    }

    #[test]
    fn test_substring_listing() {
        assert!(day_matches("Saturday and Sunday", Weekday::Sun));
        assert!(!day_matches("Saturday and Sunday", Weekday::Mon));
    }

    #[test]
    fn test_unrecognized_expression_matches_nothing() {
        for day in WEEK {
            assert!(!day_matches("Holidays", day));
            assert!(!day_matches("", day));
        }
    }
}
