use std::fs::File;
use std::path::Path;
use tracing::info;

use super::buckets::{bucket_from_sums, BucketSums};
use super::loader::parse_measure;
use crate::error::{DashboardError, Result};
use crate::types::{Granularity, Period, TimeBucket};
use crate::utils::{group_fold, parse_period_key};

const ACTIVITY_COLUMN: &str = "Activity";
const ASCENT_COLUMN: &str = "Ascent (feet)";
const CALORIES_COLUMN: &str = "Calories";
const DISTANCE_COLUMN: &str = "Distance (miles)";

/// File name of the summary export for `granularity`.
pub fn prebucketed_file_name(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Year => "Calendar-Years.csv",
        Granularity::Month => "Calendar-Months.csv",
        Granularity::Week => "Calendar-Weeks.csv",
    }
}

/// Load one summary export that is already bucketed by period.
///
/// Rows whose `Activity` differs from `activity` are skipped. Values are in
/// feet and miles already; rows that share a period are summed and the
/// climb/distance ratio is derived the same way as for the activity log.
pub fn load_prebucketed(
    directory: &Path,
    granularity: Granularity,
    activity: &str,
) -> Result<Vec<TimeBucket>> {
    let path = directory.join(prebucketed_file_name(granularity));
    let file = File::open(&path).map_err(|source| DashboardError::DataUnavailable {
        path: path.clone(),
        source,
    })?;
    let csv_err = |source| DashboardError::Csv {
        path: path.clone(),
        source,
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| DashboardError::MissingColumn {
                path: path.clone(),
                column: name.to_string(),
            })
    };
    let key_idx = column(granularity.name())?;
    let activity_idx = column(ACTIVITY_COLUMN)?;
    let ascent_idx = column(ASCENT_COLUMN)?;
    let calories_idx = column(CALORIES_COLUMN)?;
    let distance_idx = column(DISTANCE_COLUMN)?;

    let mut rows = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(csv_err)?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();
        if cell(activity_idx) != activity {
            continue;
        }

        let raw_key = cell(key_idx);
        let start = parse_period_key(granularity, raw_key).ok_or_else(|| {
            DashboardError::InvalidDate {
                path: path.clone(),
                row: i + 1,
                value: raw_key.to_string(),
            }
        })?;
        let number = |idx: usize, name: &str| -> Result<f64> {
            parse_measure(cell(idx)).ok_or_else(|| DashboardError::InvalidNumber {
                path: path.clone(),
                row: i + 1,
                column: name.to_string(),
                value: cell(idx).to_string(),
            })
        };

        rows.push((
            Period { start, granularity },
            BucketSums {
                ascent_feet: number(ascent_idx, ASCENT_COLUMN)?,
                calories: number(calories_idx, CALORIES_COLUMN)?,
                distance_miles: number(distance_idx, DISTANCE_COLUMN)?,
                count: 1,
            },
        ));
    }

    let buckets: Vec<TimeBucket> = group_fold(
        rows,
        |(period, _)| *period,
        |sums: &mut BucketSums, (_, row)| {
            sums.ascent_feet += row.ascent_feet;
            sums.calories += row.calories;
            sums.distance_miles += row.distance_miles;
            sums.count += row.count;
        },
    )
    .into_iter()
    .map(|(period, sums)| bucket_from_sums(period, sums))
    .collect();

    info!(path = %path.display(), buckets = buckets.len(), "loaded pre-bucketed summary");
    Ok(buckets)
}
