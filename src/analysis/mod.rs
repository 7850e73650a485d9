mod breakdown;
mod buckets;
mod loader;
mod pipeline;
mod prebucketed;
mod units;

pub use breakdown::ride_type_breakdown;
pub use buckets::{aggregate, bucket_from_sums, display_rows, BucketSums};
pub use loader::{filter_by_type, load_activity_log, load_records};
pub use pipeline::run;
pub use prebucketed::{load_prebucketed, prebucketed_file_name};
pub use units::{normalize, METERS_TO_FEET, METERS_TO_MILES, SECONDS_PER_HOUR};

#[cfg(test)]
mod tests;
