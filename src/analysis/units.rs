use crate::types::{ActivityRecord, NormalizedActivity};

pub const METERS_TO_MILES: f64 = 0.000621371;
pub const METERS_TO_FEET: f64 = 3.28084;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Convert a record's stored units into miles, feet and hours.
pub fn normalize(record: &ActivityRecord) -> NormalizedActivity {
    NormalizedActivity {
        date: record.date,
        activity_type: record.activity_type.clone(),
        distance_miles: record.distance_meters * METERS_TO_MILES,
        ascent_feet: record.elevation_gain_meters * METERS_TO_FEET,
        elapsed_hours: record.elapsed_time_seconds / SECONDS_PER_HOUR,
        calories: record.calories,
    }
}
