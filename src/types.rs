//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing activity records, calendar buckets and the weekly ride-type
//! breakdown.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::period_start;

/// One logged exercise session as read from the activity log.
///
/// Measures are stored in the units of the source file (meters, seconds) and
/// are never negative; an absent cell is loaded as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    /// When the activity started
    pub date: NaiveDateTime,
    /// Dataset-defined label such as "Ride" or "E-Bike Ride"
    pub activity_type: String,
    pub distance_meters: f64,
    pub elevation_gain_meters: f64,
    pub elapsed_time_seconds: f64,
    pub calories: f64,
}

/// An activity record with its user-facing derived measures.
///
/// Built once by [`crate::analysis::normalize`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedActivity {
    pub date: NaiveDateTime,
    pub activity_type: String,
    pub distance_miles: f64,
    pub ascent_feet: f64,
    pub elapsed_hours: f64,
    pub calories: f64,
}

/// The two ride sub-types the weekly breakdown splits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RideType {
    Ride,
    EBikeRide,
}

impl RideType {
    pub const ALL: [RideType; 2] = [RideType::Ride, RideType::EBikeRide];

    /// Label used for this ride type in the activity log.
    pub fn label(self) -> &'static str {
        match self {
            RideType::Ride => "Ride",
            RideType::EBikeRide => "E-Bike Ride",
        }
    }

    /// Match an activity-type label exactly against the known ride types.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ride| ride.label() == label)
    }

    fn index(self) -> usize {
        match self {
            RideType::Ride => 0,
            RideType::EBikeRide => 1,
        }
    }
}

impl fmt::Display for RideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sums kept per ride type; a ride type with no records reads as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RideTypeTotals([f64; 2]);

impl RideTypeTotals {
    pub fn add(&mut self, ride: RideType, value: f64) {
        self.0[ride.index()] += value;
    }

    pub fn get(&self, ride: RideType) -> f64 {
        self.0[ride.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Share of the total for `ride` as a percentage, `0.0` when the total is zero.
    pub fn percent(&self, ride: RideType) -> f64 {
        let total = self.total();
        if total > 0.0 {
            self.get(ride) / total * 100.0
        } else {
            0.0
        }
    }
}

/// Calendar granularity used to bucket activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Granularity {
    Year,
    Month,
    Week,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Year, Granularity::Month, Granularity::Week];

    pub fn name(self) -> &'static str {
        match self {
            Granularity::Year => "Year",
            Granularity::Month => "Month",
            Granularity::Week => "Week",
        }
    }

    /// Lowercase stem used for exported file names.
    pub fn file_stem(self) -> &'static str {
        match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
            Granularity::Week => "week",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A calendar period anchored to its first day.
///
/// Ordering follows `start`, so periods of one granularity sort chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    pub start: NaiveDate,
    pub granularity: Granularity,
}

impl Period {
    /// The period of `granularity` that contains `date`.
    pub fn containing(granularity: Granularity, date: NaiveDate) -> Self {
        Self {
            start: period_start(granularity, date),
            granularity,
        }
    }

    /// Human readable key: `2023`, `2023-04` or `2023-W05`.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Year => self.start.format("%Y").to_string(),
            Granularity::Month => self.start.format("%Y-%m").to_string(),
            Granularity::Week => self.start.format("%G-W%V").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Summed measures for one calendar period.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    pub period: Period,
    pub ascent_feet: f64,
    pub calories: f64,
    pub distance_miles: f64,
    /// `ascent_feet / distance_miles`, or `0.0` when no distance was covered
    pub climb_distance_ratio: f64,
    /// Number of activities summed into this bucket
    pub activity_count: usize,
}

/// Rounded copy of a [`TimeBucket`] for tables and exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBucket {
    pub period: String,
    pub ascent_feet: i64,
    pub calories: i64,
    pub distance_miles: f64,
    pub climb_distance_ratio: f64,
}

impl DisplayBucket {
    /// Column titles for a table of `granularity` buckets.
    pub fn headers(granularity: Granularity) -> [&'static str; 5] {
        [
            granularity.name(),
            "Ascent (feet)",
            "Calories",
            "Distance (miles)",
            "Ascent/distance ratio",
        ]
    }
}

/// One week of the ride versus e-bike breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub week: Period,
    pub distance: RideTypeTotals,
    pub time: RideTypeTotals,
}

impl BreakdownRow {
    pub fn ride_distance(&self) -> f64 {
        self.distance.get(RideType::Ride)
    }

    pub fn ebike_distance(&self) -> f64 {
        self.distance.get(RideType::EBikeRide)
    }

    pub fn total_distance(&self) -> f64 {
        self.distance.total()
    }

    pub fn ride_pct_distance(&self) -> f64 {
        self.distance.percent(RideType::Ride)
    }

    pub fn ebike_pct_distance(&self) -> f64 {
        self.distance.percent(RideType::EBikeRide)
    }

    pub fn ride_time(&self) -> f64 {
        self.time.get(RideType::Ride)
    }

    pub fn ebike_time(&self) -> f64 {
        self.time.get(RideType::EBikeRide)
    }

    pub fn total_time(&self) -> f64 {
        self.time.total()
    }

    pub fn ride_pct_time(&self) -> f64 {
        self.time.percent(RideType::Ride)
    }

    pub fn ebike_pct_time(&self) -> f64 {
        self.time.percent(RideType::EBikeRide)
    }
}

/// Flat, rounded copy of a [`BreakdownRow`] with the exported column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBreakdownRow {
    pub week: String,
    pub ride_distance: f64,
    pub ebike_distance: f64,
    pub total_distance: f64,
    pub ride_pct_distance: f64,
    pub ebike_pct_distance: f64,
    pub ride_time: f64,
    pub ebike_time: f64,
    pub total_time: f64,
    pub ride_pct_time: f64,
    pub ebike_pct_time: f64,
}

impl DisplayBreakdownRow {
    pub const HEADERS: [&'static str; 11] = [
        "Week",
        "Ride distance",
        "E-Bike distance",
        "Total distance",
        "Ride % distance",
        "E-Bike % distance",
        "Ride time",
        "E-Bike time",
        "Total time",
        "Ride % time",
        "E-Bike % time",
    ];
}

/// Everything one pipeline invocation produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub years: Vec<TimeBucket>,
    pub months: Vec<TimeBucket>,
    pub weeks: Vec<TimeBucket>,
    pub ride_types: Vec<BreakdownRow>,
    /// Records that passed the activity-type filter
    pub activity_count: usize,
    /// Every activity-type label found in the source, sorted
    pub available_types: Vec<String>,
}

impl DashboardData {
    pub fn buckets(&self, granularity: Granularity) -> &[TimeBucket] {
        match granularity {
            Granularity::Year => &self.years,
            Granularity::Month => &self.months,
            Granularity::Week => &self.weeks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.ride_types.is_empty()
    }
}
