use super::*;
use crate::config::{ActivityFilter, ColumnNames, PipelineConfig};
use crate::error::DashboardError;
use crate::types::Granularity;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "Activity ID,Activity Date,Activity Type,Elapsed Time,Distance,Elevation Gain,Calories\n";

fn setup_test_log(rows: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("activities.csv");
    let mut body = HEADER.to_string();
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    (temp_dir, path)
}

fn sample_rows() -> Vec<&'static str> {
    vec![
        "1,2022-12-30 08:00:00,Ride,3600,16093.4,300,600",
        "2,2023-01-03 08:00:00,E-Bike Ride,7200,32186.9,600,400",
        "3,2023-01-04 08:00:00,Run,1800,5000,20,350",
        "4,2023-02-14 08:00:00,Ride,32400,160934,1000,4000",
        "5,2023-02-15 08:00:00,Ride,,0,1000,",
    ]
}

#[test]
fn test_load_records_default_filter() {
    let (_temp_dir, path) = setup_test_log(&sample_rows());

    let records = load_records(&path, &ColumnNames::default(), &ActivityFilter::default()).unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.activity_type != "Run"));
    assert_eq!(records[3].elapsed_time_seconds, 0.0);
    assert_eq!(records[3].calories, 0.0);
}

#[test]
fn test_empty_filter_returns_all_records() {
    let (_temp_dir, path) = setup_test_log(&sample_rows());

    let records = load_records(&path, &ColumnNames::default(), &ActivityFilter::accept_all()).unwrap();
    assert_eq!(records.len(), 5);
}

#[test]
fn test_missing_file_is_data_unavailable() {
    let err = load_activity_log(
        &PathBuf::from("/nonexistent/activities.csv"),
        &ColumnNames::default(),
    )
    .unwrap_err();

    assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    assert!(err.is_data_unavailable());
}

#[test]
fn test_missing_column_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("activities.csv");
    fs::write(&path, "Activity Date,Activity Type,Distance\n2023-01-01,Ride,1000\n").unwrap();

    let err = load_activity_log(&path, &ColumnNames::default()).unwrap_err();
    match err {
        DashboardError::MissingColumn { column, .. } => assert_eq!(column, "Elevation Gain"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bad_date_fails_the_load() {
    let (_temp_dir, path) = setup_test_log(&["1,someday,Ride,60,100,1,1"]);

    let err = load_activity_log(&path, &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, DashboardError::InvalidDate { row: 1, .. }));
}

#[test]
fn test_duplicate_header_uses_last_column() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("activities.csv");
    fs::write(
        &path,
        "Activity Date,Activity Type,Distance,Elevation Gain,Elapsed Time,Calories,Distance\n\
         2023-01-01,Ride,16.1,0,3600,0,16093.4\n",
    )
    .unwrap();

    let records = load_activity_log(&path, &ColumnNames::default()).unwrap();
    assert_eq!(records[0].distance_meters, 16093.4);
}

#[test]
fn test_pipeline_partitions_selected_records() {
    let (_temp_dir, path) = setup_test_log(&sample_rows());
    let config = PipelineConfig::for_activity_log(&path);

    let data = run(&config).unwrap();
    assert_eq!(data.activity_count, 4);
    assert_eq!(data.available_types, vec!["E-Bike Ride", "Ride", "Run"]);
    for granularity in Granularity::ALL {
        let buckets = data.buckets(granularity);
        let counted: usize = buckets.iter().map(|b| b.activity_count).sum();
        assert_eq!(counted, data.activity_count, "{granularity} buckets drop or repeat records");
        assert!(buckets
            .windows(2)
            .all(|pair| pair[0].period.start < pair[1].period.start));
    }

    let years: Vec<String> = data.years.iter().map(|b| b.period.label()).collect();
    assert_eq!(years, vec!["2022", "2023"]);
    let total_miles: f64 = data.years.iter().map(|b| b.distance_miles).sum();
    assert!((total_miles - (16093.4 + 32186.9 + 160934.0) * METERS_TO_MILES).abs() < 1e-9);
}

#[test]
fn test_pipeline_zero_distance_bucket() {
    let (_temp_dir, path) = setup_test_log(&["1,2023-03-01 08:00:00,Ride,600,0,1000,50"]);

    let data = run(&PipelineConfig::for_activity_log(&path)).unwrap();
    assert_eq!(data.weeks.len(), 1);
    assert_eq!(data.weeks[0].climb_distance_ratio, 0.0);
    assert!((data.weeks[0].ascent_feet - 3280.84).abs() < 1e-6);
}

#[test]
fn test_pipeline_breakdown_ignores_type_selection() {
    let (_temp_dir, path) = setup_test_log(&sample_rows());
    let config = PipelineConfig {
        filter: ActivityFilter::new(["Run"]),
        ..PipelineConfig::for_activity_log(&path)
    };

    let data = run(&config).unwrap();
    assert_eq!(data.activity_count, 1);
    assert_eq!(data.ride_types.len(), 3);

    // the nine-hour ride keeps its distance but not its time
    let february = &data.ride_types[2];
    assert_eq!(february.week.label(), "2023-W07");
    assert!((february.ride_distance() - 100.0).abs() < 0.01);
    assert_eq!(february.ride_time(), 0.0);
}

#[test]
fn test_pipeline_empty_log() {
    let (_temp_dir, path) = setup_test_log(&[]);

    let data = run(&PipelineConfig::for_activity_log(&path)).unwrap();
    assert!(data.is_empty());
    assert!(data.weeks.is_empty());
    assert!(data.ride_types.is_empty());
}
