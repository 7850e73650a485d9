use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{
    BreakdownRow, DisplayBreakdownRow, Granularity, NormalizedActivity, Period, RideType,
    RideTypeTotals,
};
use crate::utils::{group_fold, round_to};

/// Weekly ride versus e-bike totals for distance (miles) and time (hours).
///
/// Only "Ride" and "E-Bike Ride" activities are considered, whatever the
/// dashboard's type selection. Rides longer than `max_ride_hours` still count
/// toward distance but are left out of the time totals. A week appears when
/// either pass saw activity; the side with no data reads as zero.
pub fn ride_type_breakdown(
    activities: &[NormalizedActivity],
    max_ride_hours: Option<f64>,
) -> Vec<BreakdownRow> {
    let rides: Vec<(Period, RideType, &NormalizedActivity)> = activities
        .iter()
        .filter_map(|activity| {
            RideType::from_label(&activity.activity_type).map(|ride| {
                (Period::containing(Granularity::Week, activity.date.date()), ride, activity)
            })
        })
        .collect();

    let distance = group_fold(
        rides.iter(),
        |(week, _, _)| *week,
        |totals: &mut RideTypeTotals, (_, ride, activity)| totals.add(*ride, activity.distance_miles),
    );

    let within_cutoff = |activity: &NormalizedActivity| {
        max_ride_hours.map_or(true, |limit| activity.elapsed_hours <= limit)
    };
    let time = group_fold(
        rides.iter().filter(|(_, _, activity)| within_cutoff(*activity)),
        |(week, _, _)| *week,
        |totals: &mut RideTypeTotals, (_, ride, activity)| totals.add(*ride, activity.elapsed_hours),
    );

    let mut merged: BTreeMap<Period, BreakdownRow> = BTreeMap::new();
    for (week, totals) in distance {
        merged.entry(week).or_insert_with(|| empty_row(week)).distance = totals;
    }
    for (week, totals) in time {
        merged.entry(week).or_insert_with(|| empty_row(week)).time = totals;
    }

    debug!(rides = rides.len(), weeks = merged.len(), "built ride-type breakdown");
    merged.into_values().collect()
}

fn empty_row(week: Period) -> BreakdownRow {
    BreakdownRow {
        week,
        distance: RideTypeTotals::default(),
        time: RideTypeTotals::default(),
    }
}

impl BreakdownRow {
    /// Rounded copy for display, one decimal place throughout.
    pub fn to_display(&self) -> DisplayBreakdownRow {
        DisplayBreakdownRow {
            week: self.week.label(),
            ride_distance: round_to(self.ride_distance(), 1),
            ebike_distance: round_to(self.ebike_distance(), 1),
            total_distance: round_to(self.total_distance(), 1),
            ride_pct_distance: round_to(self.ride_pct_distance(), 1),
            ebike_pct_distance: round_to(self.ebike_pct_distance(), 1),
            ride_time: round_to(self.ride_time(), 1),
            ebike_time: round_to(self.ebike_time(), 1),
            total_time: round_to(self.total_time(), 1),
            ride_pct_time: round_to(self.ride_pct_time(), 1),
            ebike_pct_time: round_to(self.ebike_pct_time(), 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ride(kind: &str, y: i32, m: u32, d: u32, miles: f64, hours: f64) -> NormalizedActivity {
        NormalizedActivity {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(8, 0, 0).unwrap(),
            activity_type: kind.to_string(),
            distance_miles: miles,
            ascent_feet: 100.0,
            elapsed_hours: hours,
            calories: 300.0,
        }
    }

    #[test]
    fn test_missing_subtype_reads_zero() {
        let activities = vec![
            ride("Ride", 2023, 6, 12, 10.0, 1.0),
            ride("Ride", 2023, 6, 14, 5.0, 0.5),
        ];

        let rows = ride_type_breakdown(&activities, Some(8.0));
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.ride_distance(), 15.0);
        assert_eq!(row.ebike_distance(), 0.0);
        assert_eq!(row.total_distance(), 15.0);
        assert_eq!(row.ride_pct_distance(), 100.0);
        assert_eq!(row.ebike_pct_distance(), 0.0);
    }

    #[test]
    fn test_long_ride_excluded_from_time_only() {
        let activities = vec![
            ride("Ride", 2023, 6, 12, 100.0, 9.0),
            ride("E-Bike Ride", 2023, 6, 13, 20.0, 2.0),
        ];

        let rows = ride_type_breakdown(&activities, Some(8.0));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ride_distance(), 100.0);
        assert_eq!(rows[0].ride_time(), 0.0);
        assert_eq!(rows[0].ebike_time(), 2.0);
        assert_eq!(rows[0].ebike_pct_time(), 100.0);
    }

    #[test]
    fn test_week_with_only_outliers_is_kept() {
        let activities = vec![
            ride("Ride", 2023, 6, 12, 120.0, 10.0),
            ride("Ride", 2023, 6, 20, 10.0, 1.0),
        ];

        let rows = ride_type_breakdown(&activities, Some(8.0));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].week.label(), "2023-W24");
        assert_eq!(rows[0].total_distance(), 120.0);
        assert_eq!(rows[0].total_time(), 0.0);
        assert_eq!(rows[0].ride_pct_time(), 0.0);
        assert_eq!(rows[0].ebike_pct_time(), 0.0);
        assert_eq!(rows[1].total_time(), 1.0);
    }

    #[test]
    fn test_no_cutoff_keeps_all_time() {
        let activities = vec![ride("Ride", 2023, 6, 12, 120.0, 10.0)];

        let rows = ride_type_breakdown(&activities, None);
        assert_eq!(rows[0].ride_time(), 10.0);
    }

    #[test]
    fn test_other_activity_types_ignored() {
        let activities = vec![
            ride("Run", 2023, 6, 12, 6.0, 1.0),
            ride("Cycle", 2023, 6, 12, 6.0, 1.0),
        ];

        assert!(ride_type_breakdown(&activities, Some(8.0)).is_empty());
    }

    #[test]
    fn test_percentages_close_to_hundred() {
        let activities = vec![
            ride("Ride", 2023, 6, 12, 7.0, 1.3),
            ride("E-Bike Ride", 2023, 6, 13, 3.0, 0.7),
        ];

        let row = &ride_type_breakdown(&activities, Some(8.0))[0];
        assert!((row.ride_pct_distance() + row.ebike_pct_distance() - 100.0).abs() < 1e-9);
        assert!((row.ride_pct_time() + row.ebike_pct_time() - 100.0).abs() < 1e-9);
        assert_eq!(row.to_display().ride_pct_distance, 70.0);
    }
}
