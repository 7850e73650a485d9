use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{ActivityFilter, ColumnNames};
use crate::error::{DashboardError, Result};
use crate::types::ActivityRecord;
use crate::utils::DATE_FORMATS;

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%b %d, %Y, %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Positions of the required columns within a header row.
struct ColumnIndex {
    date: usize,
    activity_type: usize,
    distance: usize,
    elevation_gain: usize,
    elapsed_time: usize,
    calories: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, names: &ColumnNames, path: &Path) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            // Exports may repeat a header; the later column holds the raw units.
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| header.trim_start_matches('\u{feff}').trim() == name)
                .map(|(idx, _)| idx)
                .last()
                .ok_or_else(|| DashboardError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            date: find(&names.date)?,
            activity_type: find(&names.activity_type)?,
            distance: find(&names.distance)?,
            elevation_gain: find(&names.elevation_gain)?,
            elapsed_time: find(&names.elapsed_time)?,
            calories: find(&names.calories)?,
        })
    }
}

/// Read every row of an activity log.
///
/// A missing or unreadable file, a missing column, or a cell that cannot be
/// parsed fails the whole load.
pub fn load_activity_log(path: &Path, columns: &ColumnNames) -> Result<Vec<ActivityRecord>> {
    let file = File::open(path).map_err(|source| DashboardError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let index = ColumnIndex::resolve(&headers, columns, path)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(csv_err)?;
        records.push(parse_row(&row, &index, columns, path, i + 1)?);
    }

    info!(path = %path.display(), rows = records.len(), "loaded activity log");
    Ok(records)
}

/// Keep the records whose activity type the filter accepts.
pub fn filter_by_type(records: Vec<ActivityRecord>, filter: &ActivityFilter) -> Vec<ActivityRecord> {
    let total = records.len();
    let kept: Vec<ActivityRecord> = records
        .into_iter()
        .filter(|record| filter.accepts(&record.activity_type))
        .collect();
    debug!(total, kept = kept.len(), accept_all = filter.is_accept_all(), "filtered activities by type");
    kept
}

/// Load an activity log and keep the activity types the filter accepts.
pub fn load_records(
    path: &Path,
    columns: &ColumnNames,
    filter: &ActivityFilter,
) -> Result<Vec<ActivityRecord>> {
    Ok(filter_by_type(load_activity_log(path, columns)?, filter))
}

fn parse_row(
    row: &StringRecord,
    index: &ColumnIndex,
    names: &ColumnNames,
    path: &Path,
    line: usize,
) -> Result<ActivityRecord> {
    let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

    let raw_date = cell(index.date);
    let date = parse_datetime(raw_date).ok_or_else(|| DashboardError::InvalidDate {
        path: path.to_path_buf(),
        row: line,
        value: raw_date.to_string(),
    })?;

    let number = |idx: usize, column: &str| -> Result<f64> {
        let raw = cell(idx);
        parse_measure(raw).ok_or_else(|| DashboardError::InvalidNumber {
            path: path.to_path_buf(),
            row: line,
            column: column.to_string(),
            value: raw.to_string(),
        })
    };

    Ok(ActivityRecord {
        date,
        activity_type: cell(index.activity_type).to_string(),
        distance_meters: number(index.distance, &names.distance)?,
        elevation_gain_meters: number(index.elevation_gain, &names.elevation_gain)?,
        elapsed_time_seconds: number(index.elapsed_time, &names.elapsed_time)?,
        calories: number(index.calories, &names.calories)?,
    })
}

/// Parse the date formats found in activity exports.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse a non-negative measure; blank cells count as zero.
pub(crate) fn parse_measure(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    let parsed: f64 = value.replace(',', "").parse().ok()?;
    parsed.is_finite().then_some(parsed.max(0.0))
}
