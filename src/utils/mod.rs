mod aggregation;
mod calendar;
mod rounding;

pub use aggregation::group_fold;
pub use calendar::{parse_period_key, period_start};
pub(crate) use calendar::DATE_FORMATS;
pub use rounding::{round_to, round_whole};
