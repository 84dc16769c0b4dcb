//! Integration tests for the expand → aggregate → enrich pipeline
//!
//! These exercise the whole transform end-to-end on realistic attendance
//! batches, checking the counting rules, calendar enrichment, and the
//! week-replacement bookkeeping the persistence layer relies on.

use chrono::{Datelike, NaiveDate, Weekday};
use ed_census::core::enrich::Enricher;
use ed_census::core::expand::expand;
use ed_census::core::pipeline::CensusPipeline;
use ed_census::core::window::{derive_cutoff_date, WindowSpec};
use ed_census::domain::AttendanceRecord;
use std::collections::BTreeMap;

fn record(
    site: &str,
    dept: &str,
    arrival_date: &str,
    arrival_time: &str,
    departure_date: &str,
    departure_time: &str,
) -> AttendanceRecord {
    AttendanceRecord::from_raw(
        site,
        dept,
        arrival_date,
        arrival_time,
        departure_date,
        departure_time,
    )
    .unwrap()
}

fn pipeline() -> CensusPipeline {
    let sites = BTreeMap::from([
        ("RAL26".to_string(), "BH".to_string()),
        ("RAPNM".to_string(), "NMUH".to_string()),
        ("RAL01".to_string(), "RFH".to_string()),
        ("RRV03".to_string(), "UCLH".to_string()),
        ("RKEQ4".to_string(), "WH".to_string()),
    ]);
    let departments = BTreeMap::from([
        ("01".to_string(), "Emergency Department".to_string()),
        ("02".to_string(), "Urgent Treatment Centre".to_string()),
        ("03".to_string(), "Urgent Care Centre".to_string()),
    ]);
    CensusPipeline::new(Enricher::new(sites, departments), false)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_mid_hour_arrival_expansion() {
    let rec = record("RAL26", "01", "2024-01-01", "08:15:00", "2024-01-01", "10:00:00");
    let facts: Vec<_> = expand(&rec).unwrap().collect();

    let expected = vec![(8u32, 0u32, 1u32), (9, 1, 0), (10, 1, 0)];
    let actual: Vec<_> = facts
        .iter()
        .map(|f| (f.hour, f.count_patients, f.count_arrivals))
        .collect();
    assert_eq!(actual, expected);
    assert!(facts.iter().all(|f| f.date_activity == date(2024, 1, 1)));
}

#[test]
fn test_on_the_hour_stay_within_one_hour() {
    let rec = record("RAL26", "01", "2024-01-01", "09:00:00", "2024-01-01", "09:30:00");
    let facts: Vec<_> = expand(&rec).unwrap().collect();

    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].hour, 9);
    assert_eq!(facts[0].count_patients, 1);
    assert_eq!(facts[0].count_arrivals, 1);
}

#[test]
fn test_overlapping_stays_sum_in_shared_hours() {
    let records = vec![
        record("RAL26", "01", "2024-01-01", "08:15:00", "2024-01-01", "11:00:00"),
        record("RAL26", "01", "2024-01-01", "09:00:00", "2024-01-01", "10:45:00"),
    ];

    let output = pipeline().run(&records).unwrap();

    // Both patients present at the 10:00 snapshot
    let ten = output
        .rows
        .iter()
        .find(|r| r.hour == 10)
        .expect("hour 10 missing");
    assert_eq!(ten.count_patients, 2);
    assert_eq!(ten.count_arrivals, 0);

    // Hour 9: first patient present, second arriving exactly on the hour
    let nine = output.rows.iter().find(|r| r.hour == 9).unwrap();
    assert_eq!(nine.count_patients, 2);
    assert_eq!(nine.count_arrivals, 1);
}

#[test]
fn test_sites_and_departments_do_not_mix() {
    let records = vec![
        record("RAL26", "01", "2024-01-01", "09:00:00", "2024-01-01", "09:30:00"),
        record("RAL01", "01", "2024-01-01", "09:00:00", "2024-01-01", "09:30:00"),
        record("RAL26", "02", "2024-01-01", "09:00:00", "2024-01-01", "09:30:00"),
    ];

    let output = pipeline().run(&records).unwrap();
    assert_eq!(output.rows.len(), 3);
    assert!(output.rows.iter().all(|r| r.count_patients == 1));
}

#[test]
fn test_enrichment_fields_on_output_rows() {
    let records = vec![record(
        "RRV03", "03", "2024-02-15", "23:10:00", "2024-02-16", "01:00:00",
    )];

    let output = pipeline().run(&records).unwrap();
    assert_eq!(output.rows.len(), 3);

    let first = &output.rows[0];
    assert_eq!(first.date_activity, date(2024, 2, 15));
    assert_eq!(first.fin_year, "23-24");
    assert_eq!(first.fin_month, 11);
    assert_eq!(first.month_name, "Feb");
    assert_eq!(first.shorthand, "UCLH");
    assert_eq!(first.department_type_desc, "Urgent Care Centre");
    // 2024-02-15 is a Thursday
    assert_eq!(first.date_weekstarting, date(2024, 2, 12));
    assert_eq!(first.date_weekending, date(2024, 2, 18));

    // The midnight rollover lands in the same reporting week
    let last = output.rows.last().unwrap();
    assert_eq!(last.date_activity, date(2024, 2, 16));
    assert_eq!(last.date_weekstarting, date(2024, 2, 12));
}

#[test]
fn test_unmapped_labels_fall_back() {
    let records = vec![record(
        "RXX99", "42", "2024-04-15", "09:00:00", "2024-04-15", "09:05:00",
    )];

    let output = pipeline().run(&records).unwrap();
    let row = &output.rows[0];
    assert_eq!(row.shorthand, "RXX99");
    assert_eq!(row.department_type_desc, "Unknown");
    assert_eq!(row.fin_year, "24-25");
    assert_eq!(row.fin_month, 1);
    assert_eq!(row.month_name, "Apr");
}

#[test]
fn test_output_independent_of_record_order() {
    let records = vec![
        record("RAL26", "01", "2024-01-01", "08:15:00", "2024-01-01", "11:00:00"),
        record("RAL01", "02", "2024-01-02", "17:59:00", "2024-01-03", "02:00:00"),
        record("RAL26", "01", "2024-01-01", "09:00:00", "2024-01-01", "10:45:00"),
    ];
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = pipeline().run(&records).unwrap();
    let backward = pipeline().run(&reversed).unwrap();
    assert_eq!(forward.rows, backward.rows);
}

#[test]
fn test_week_bounds_always_monday_to_sunday() {
    let records = vec![record(
        "RAL26", "01", "2023-12-29", "06:00:00", "2024-01-02", "12:00:00",
    )];

    let output = pipeline().run(&records).unwrap();
    for row in &output.rows {
        assert_eq!(row.date_weekstarting.weekday(), Weekday::Mon);
        assert_eq!(row.date_weekending.weekday(), Weekday::Sun);
        assert_eq!(
            row.date_weekending - row.date_weekstarting,
            chrono::Duration::days(6)
        );
    }

    // A stay crossing the year boundary spans two reporting weeks
    let earliest = output.summary.earliest_week_starting.unwrap();
    assert_eq!(earliest, date(2023, 12, 25));
    assert!(output
        .rows
        .iter()
        .any(|r| r.date_weekstarting == date(2024, 1, 1)));
}

#[test]
fn test_window_to_cutoff_end_to_end() {
    // Reference 2024-03-13 is a Wednesday; two weeks back then snapped to
    // the previous Monday
    let spec: WindowSpec = "2 weeks".parse().unwrap();
    let cutoff = derive_cutoff_date(&spec, date(2024, 3, 13)).unwrap();
    assert_eq!(cutoff, date(2024, 2, 26));
    assert_eq!(cutoff.weekday(), Weekday::Mon);
}

#[test]
fn test_long_stay_expansion_matches_duration() {
    // Admitted Friday evening, left Monday morning
    let rec = record("RAPNM", "01", "2024-03-08", "19:45:00", "2024-03-11", "07:10:00");
    let facts: Vec<_> = expand(&rec).unwrap().collect();

    // 19:00 Friday through 07:00 Monday inclusive
    assert_eq!(facts.len(), 61);
    assert_eq!(facts.iter().filter(|f| f.count_arrivals == 1).count(), 1);
    assert_eq!(
        facts.iter().filter(|f| f.count_patients == 1).count(),
        facts.len() - 1
    );
}
