use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

use super::breakdown::ride_type_breakdown;
use super::buckets::aggregate;
use super::loader::load_activity_log;
use super::prebucketed::load_prebucketed;
use super::units::normalize;
use crate::config::{InputSource, PipelineConfig};
use crate::error::Result;
use crate::types::{DashboardData, Granularity, NormalizedActivity};

/// Load the configured source and compute every dashboard table.
///
/// Each call reads the input afresh; nothing is kept between runs. Any load
/// failure aborts the run before a table is produced.
pub fn run(config: &PipelineConfig) -> Result<DashboardData> {
    config.validate()?;
    let start_time = Instant::now();

    let data = match &config.source {
        InputSource::ActivityLog { path } => {
            let records = load_activity_log(path, &config.columns)?;
            let normalized: Vec<NormalizedActivity> = records.iter().map(normalize).collect();
            let available_types: Vec<String> = records
                .iter()
                .map(|record| record.activity_type.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            // The breakdown works on every ride, independent of the type selection.
            let ride_types = ride_type_breakdown(&normalized, config.max_ride_hours);

            let selected: Vec<NormalizedActivity> = normalized
                .into_iter()
                .filter(|activity| config.filter.accepts(&activity.activity_type))
                .collect();
            debug!(
                total = records.len(),
                kept = selected.len(),
                accept_all = config.filter.is_accept_all(),
                "filtered activities by type"
            );

            DashboardData {
                years: aggregate(&selected, Granularity::Year),
                months: aggregate(&selected, Granularity::Month),
                weeks: aggregate(&selected, Granularity::Week),
                ride_types,
                activity_count: selected.len(),
                available_types,
            }
        }
        InputSource::Prebucketed {
            directory,
            activity,
        } => {
            let years = load_prebucketed(directory, Granularity::Year, activity)?;
            let activity_count = years.iter().map(|bucket| bucket.activity_count).sum();
            DashboardData {
                years,
                months: load_prebucketed(directory, Granularity::Month, activity)?,
                weeks: load_prebucketed(directory, Granularity::Week, activity)?,
                ride_types: Vec::new(),
                activity_count,
                available_types: vec![activity.clone()],
            }
        }
    };

    info!(
        activities = data.activity_count,
        years = data.years.len(),
        months = data.months.len(),
        weeks = data.weeks.len(),
        ride_type_weeks = data.ride_types.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "dashboard data ready"
    );
    Ok(data)
}
