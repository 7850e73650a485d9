//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is passed into every pipeline run; nothing is read
//! from ambient state. It can be loaded from a JSON file and then adjusted by
//! command-line flags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::types::RideType;

/// Rides longer than this many hours are left out of the weekly time totals.
pub const DEFAULT_MAX_RIDE_HOURS: f64 = 8.0;

/// Where the activity data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InputSource {
    /// One row per activity, aggregated here
    ActivityLog { path: PathBuf },
    /// Year/month/week summaries exported by the tracking app
    Prebucketed {
        directory: PathBuf,
        #[serde(default = "default_prebucketed_activity")]
        activity: String,
    },
}

impl Default for InputSource {
    fn default() -> Self {
        InputSource::ActivityLog {
            path: PathBuf::from("activities.csv"),
        }
    }
}

fn default_prebucketed_activity() -> String {
    "Cycle".to_string()
}

/// Activity-type labels a run accepts.
///
/// An empty selection accepts every record instead of none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityFilter {
    labels: BTreeSet<String>,
}

impl ActivityFilter {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter that accepts every activity type.
    pub fn accept_all() -> Self {
        Self {
            labels: BTreeSet::new(),
        }
    }

    pub fn accepts(&self, activity_type: &str) -> bool {
        self.labels.is_empty() || self.labels.contains(activity_type)
    }

    pub fn is_accept_all(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn insert(&mut self, label: impl Into<String>) {
        self.labels.insert(label.into());
    }

    pub fn remove(&mut self, label: &str) {
        self.labels.remove(label);
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self::new(RideType::ALL.iter().map(|ride| ride.label()))
    }
}

/// Header names of the activity log columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub activity_type: String,
    pub distance: String,
    pub elevation_gain: String,
    pub elapsed_time: String,
    pub calories: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Activity Date".to_string(),
            activity_type: "Activity Type".to_string(),
            distance: "Distance".to_string(),
            elevation_gain: "Elevation Gain".to_string(),
            elapsed_time: "Elapsed Time".to_string(),
            calories: "Calories".to_string(),
        }
    }
}

/// Parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source: InputSource,
    pub filter: ActivityFilter,
    /// Upper bound on elapsed hours for the weekly time breakdown; `None` keeps every ride
    pub max_ride_hours: Option<f64>,
    pub columns: ColumnNames,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: InputSource::default(),
            filter: ActivityFilter::default(),
            max_ride_hours: Some(DEFAULT_MAX_RIDE_HOURS),
            columns: ColumnNames::default(),
        }
    }
}

impl PipelineConfig {
    /// Config reading an activity log at `path` with default settings.
    pub fn for_activity_log(path: impl Into<PathBuf>) -> Self {
        Self {
            source: InputSource::ActivityLog { path: path.into() },
            ..Self::default()
        }
    }

    /// Load a config from a JSON file; absent fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| DashboardError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(hours) = self.max_ride_hours {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(DashboardError::Config(format!(
                    "max_ride_hours must be a positive number, got {hours}"
                )));
            }
        }
        Ok(())
    }
}
