use crate::types::{DisplayBucket, Granularity, NormalizedActivity, Period, TimeBucket};
use crate::utils::{group_fold, round_to, round_whole};

/// Running sums for one calendar period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketSums {
    pub ascent_feet: f64,
    pub calories: f64,
    pub distance_miles: f64,
    pub count: usize,
}

impl BucketSums {
    pub fn add(&mut self, activity: &NormalizedActivity) {
        self.ascent_feet += activity.ascent_feet;
        self.calories += activity.calories;
        self.distance_miles += activity.distance_miles;
        self.count += 1;
    }
}

/// Sum activities into calendar buckets of one granularity.
///
/// Every activity lands in exactly one bucket. Buckets are returned in
/// ascending period order and periods without activities are omitted, so an
/// empty input gives an empty result.
pub fn aggregate(activities: &[NormalizedActivity], granularity: Granularity) -> Vec<TimeBucket> {
    group_fold(
        activities,
        |activity| Period::containing(granularity, activity.date.date()),
        |sums: &mut BucketSums, activity| sums.add(activity),
    )
    .into_iter()
    .map(|(period, sums)| bucket_from_sums(period, sums))
    .collect()
}

/// Finish a bucket, deriving the climb/distance ratio.
///
/// The ratio is `0.0` when the bucket covers no distance.
pub fn bucket_from_sums(period: Period, sums: BucketSums) -> TimeBucket {
    let climb_distance_ratio = if sums.distance_miles > 0.0 {
        sums.ascent_feet / sums.distance_miles
    } else {
        0.0
    };

    TimeBucket {
        period,
        ascent_feet: sums.ascent_feet,
        calories: sums.calories,
        distance_miles: sums.distance_miles,
        climb_distance_ratio,
        activity_count: sums.count,
    }
}

impl TimeBucket {
    /// Rounded copy for display: whole feet and calories, one decimal otherwise.
    pub fn to_display(&self) -> DisplayBucket {
        DisplayBucket {
            period: self.period.label(),
            ascent_feet: round_whole(self.ascent_feet),
            calories: round_whole(self.calories),
            distance_miles: round_to(self.distance_miles, 1),
            climb_distance_ratio: round_to(self.climb_distance_ratio, 1),
        }
    }
}

/// Rounded display copies of a bucket sequence, in the same order.
pub fn display_rows(buckets: &[TimeBucket]) -> Vec<DisplayBucket> {
    buckets.iter().map(TimeBucket::to_display).collect()
}
