//! Integration tests for clock-driven refreshes.
//!
//! These walk a registry through a simulated day with `MockClock` so the
//! open/close transitions are deterministic.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use dining_status::{Clock, LocationRecord, LocationRegistry, MockClock, registry::HoursRecord};

/// 2024-02-12 is a Monday.
fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 12)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn location(name: &str, capacity: i64, hours: &[(&str, &str)]) -> LocationRecord {
    LocationRecord {
        name: Some(name.to_string()),
        building: None,
        crowd_level: Some(capacity),
        hours: hours
            .iter()
            .map(|(day, hours)| HoursRecord {
                day: Some(day.to_string()),
                hours: Some(hours.to_string()),
            })
            .collect(),
    }
}

fn campus() -> LocationRegistry {
    LocationRegistry::build([
        location("Breakfast Bar", 30, &[("Monday - Friday", "6:30 a.m. to 10:30 a.m.")]),
        location("Late Night", 40, &[("Daily", "8 p.m. to 11:59 p.m.")]),
        location("Weekend Brunch", 60, &[("Saturday - Sunday", "9 a.m. to 2 p.m.")]),
    ])
    .0
}

#[test]
fn test_day_of_transitions() {
    let clock = MockClock::new(monday_at(6, 0));
    let mut registry = campus();

    let report = registry.refresh_with_clock(&clock);
    assert_eq!(report.open_count(), 0);

    clock.set_time(monday_at(6, 30));
    let report = registry.refresh_with_clock(&clock);
    assert!(report.get("breakfast_bar").unwrap().is_open);
    assert_eq!(report.open_count(), 1);

    registry
        .get_mut("breakfast_bar")
        .unwrap()
        .record_entries(12)
        .unwrap();

    clock.advance(Duration::hours(4));
    let report = registry.refresh_with_clock(&clock);
    // 10:30 is inclusive
    assert!(report.get("breakfast_bar").unwrap().is_open);
    assert_eq!(report.get("breakfast_bar").unwrap().current_occupancy, 12);

    clock.advance(Duration::minutes(1));
    let report = registry.refresh_with_clock(&clock);
    let bar = report.get("breakfast_bar").unwrap();
    assert!(!bar.is_open);
    assert_eq!(bar.current_occupancy, 0);

    clock.set_time(monday_at(21, 15));
    let report = registry.refresh_with_clock(&clock);
    assert!(report.get("late_night").unwrap().is_open);
    assert!(!report.get("weekend_brunch").unwrap().is_open);
}

#[test]
fn test_clock_trait_object() {
    let clock: Box<dyn Clock> = Box::new(MockClock::new(monday_at(12, 0)));
    let mut registry = campus();
    let report = registry.refresh_with_clock(clock.as_ref());
    assert_eq!(report.statuses.len(), 3);
    assert_eq!(report.open_count(), 0);
}

#[test]
fn test_weekend_span_across_week_boundary() {
    // 2024-02-17 is a Saturday
    let saturday = NaiveDate::from_ymd_opt(2024, 2, 17)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let clock = MockClock::new(saturday);
    let mut registry = campus();

    let report = registry.refresh_with_clock(&clock);
    assert!(report.get("weekend_brunch").unwrap().is_open);
    assert!(!report.get("breakfast_bar").unwrap().is_open);

    clock.advance(Duration::days(1));
    let report = registry.refresh_with_clock(&clock);
    assert!(report.get("weekend_brunch").unwrap().is_open);

    clock.advance(Duration::days(1));
    let report = registry.refresh_with_clock(&clock);
    assert!(!report.get("weekend_brunch").unwrap().is_open);
    assert!(report.get("breakfast_bar").unwrap().is_open);
}
