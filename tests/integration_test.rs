use pretty_assertions::assert_eq;
use ridestats::analysis;
use ridestats::app::App;
use ridestats::config::{ActivityFilter, InputSource, PipelineConfig};
use ridestats::plotting::{ChartFormat, ChartKind, ChartStyle};
use ridestats::report::export_report;
use ridestats::Granularity;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const MILE: f64 = 1609.344;

fn setup_test_log(rows: &[String]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("activities.csv");
    let mut body =
        String::from("Activity ID,Activity Date,Activity Type,Elapsed Time,Distance,Elevation Gain,Calories\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    (temp_dir, path)
}

fn row(id: u32, date: &str, kind: &str, hours: f64, miles: f64, gain_m: f64) -> String {
    format!(
        "{id},{date},{kind},{},{},{gain_m},{}",
        hours * 3600.0,
        miles * MILE,
        miles * 40.0
    )
}

#[test]
fn test_full_workflow() {
    let (temp_dir, path) = setup_test_log(&[
        row(1, "2023-05-01 07:00:00", "Ride", 1.0, 10.0, 150.0),
        row(2, "2023-05-03 07:00:00", "Ride", 0.5, 5.0, 50.0),
        row(3, "2023-05-09 07:00:00", "E-Bike Ride", 2.0, 30.0, 400.0),
        row(4, "2023-05-10 07:00:00", "Walk", 1.0, 3.0, 10.0),
    ]);

    // Pipeline
    let config = PipelineConfig::for_activity_log(&path);
    let data = analysis::run(&config).unwrap();
    assert_eq!(data.activity_count, 3);
    assert_eq!(data.years.len(), 1);
    assert_eq!(data.months.len(), 1);
    assert_eq!(data.weeks.len(), 2);

    // two rides, no e-bike ride in the first week
    let first = &data.ride_types[0];
    assert_eq!(first.week.label(), "2023-W18");
    assert!((first.ride_distance() - 15.0).abs() < 1e-3);
    assert_eq!(first.ebike_distance(), 0.0);
    assert!((first.total_distance() - 15.0).abs() < 1e-3);
    assert!((first.ride_pct_distance() - 100.0).abs() < 1e-9);
    assert_eq!(first.ebike_pct_distance(), 0.0);

    // Report
    let out_dir = temp_dir.path().join("report");
    let style = ChartStyle {
        width: 320,
        height: 200,
        text: false,
        ..ChartStyle::default()
    };
    let files = export_report(&data, &out_dir, ChartFormat::Svg, &style).unwrap();
    assert_eq!(files.tables.len(), 4);
    assert_eq!(files.charts.len(), ChartKind::all().len());

    let weeks = fs::read_to_string(out_dir.join("week.csv")).unwrap();
    assert_eq!(weeks.lines().count(), 3);
    assert!(weeks.lines().nth(1).unwrap().starts_with("2023-W18,656,600,15.0,"));

    // Dashboard state
    let mut app = App::new(config);
    app.refresh();
    assert_eq!(app.data.as_ref(), Some(&data));
    app.set_type_selected("Walk", true);
    app.refresh();
    assert_eq!(app.data.as_ref().unwrap().activity_count, 4);
}

#[test]
fn test_long_ride_counts_distance_but_not_time() {
    let (_temp_dir, path) = setup_test_log(&[
        row(1, "2024-03-04 06:00:00", "Ride", 9.0, 120.0, 1500.0),
        row(2, "2024-03-05 06:00:00", "E-Bike Ride", 1.5, 20.0, 200.0),
    ]);

    let data = analysis::run(&PipelineConfig::for_activity_log(&path)).unwrap();
    assert_eq!(data.ride_types.len(), 1);
    let week = &data.ride_types[0];
    assert!((week.ride_distance() - 120.0).abs() < 1e-3);
    assert_eq!(week.ride_time(), 0.0);
    assert!((week.ebike_time() - 1.5).abs() < 1e-9);
    assert!((week.ebike_pct_time() - 100.0).abs() < 1e-9);

    // without a cutoff the long ride counts toward time as well
    let config = PipelineConfig {
        max_ride_hours: None,
        ..PipelineConfig::for_activity_log(&path)
    };
    let data = analysis::run(&config).unwrap();
    assert!((data.ride_types[0].ride_time() - 9.0).abs() < 1e-9);
}

#[test]
fn test_empty_selection_accepts_every_type() {
    let (_temp_dir, path) = setup_test_log(&[
        row(1, "2023-01-02 07:00:00", "Ride", 1.0, 10.0, 100.0),
        row(2, "2023-01-03 07:00:00", "Run", 1.0, 6.0, 30.0),
        row(3, "2023-01-04 07:00:00", "Swim", 1.0, 1.0, 0.0),
    ]);

    let config = PipelineConfig {
        filter: ActivityFilter::accept_all(),
        ..PipelineConfig::for_activity_log(&path)
    };
    let data = analysis::run(&config).unwrap();
    assert_eq!(data.activity_count, 3);
    assert_eq!(data.available_types, vec!["Ride", "Run", "Swim"]);
}

#[test]
fn test_missing_log_is_data_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::for_activity_log(temp_dir.path().join("missing.csv"));

    let err = analysis::run(&config).unwrap_err();
    assert!(err.is_data_unavailable());
}

#[test]
fn test_prebucketed_directory() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(
        dir.join("Calendar-Years.csv"),
        "Year,Activity,Ascent (feet),Calories,Distance (miles)\n\
         \"2,023\",Cycle,12000,30000,600\n\
         \"2,023\",Run,500,9000,80\n",
    )
    .unwrap();
    fs::write(
        dir.join("Calendar-Months.csv"),
        "Month,Activity,Ascent (feet),Calories,Distance (miles)\n\
         2023-01,Cycle,5000,12000,250\n\
         2023-02,Cycle,7000,18000,350\n",
    )
    .unwrap();
    fs::write(
        dir.join("Calendar-Weeks.csv"),
        "Week,Activity,Ascent (feet),Calories,Distance (miles)\n\
         2023-W02,Cycle,900,2000,0\n",
    )
    .unwrap();

    let config = PipelineConfig {
        source: InputSource::Prebucketed {
            directory: dir.to_path_buf(),
            activity: "Cycle".to_string(),
        },
        ..PipelineConfig::default()
    };
    let data = analysis::run(&config).unwrap();

    assert_eq!(data.years.len(), 1);
    assert_eq!(data.years[0].period.label(), "2023");
    assert!((data.years[0].climb_distance_ratio - 20.0).abs() < 1e-9);
    assert_eq!(data.buckets(Granularity::Month).len(), 2);
    assert_eq!(data.weeks[0].climb_distance_ratio, 0.0);
    assert!(data.ride_types.is_empty());
}
