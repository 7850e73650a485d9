//! # Cycling Activity Dashboard Library
//!
//! `ridestats` turns a log of cycling activities into year, month and week
//! aggregates, a climb/distance ratio per period and a weekly ride versus
//! e-bike breakdown, then renders them as charts and tables.
//!
//! ## Features
//!
//! - Load an activity log (one row per activity) or pre-bucketed summaries
//! - Filter by activity type, where an empty selection shows every type
//! - Sum ascent, calories and distance per calendar year, month and ISO week
//! - Split weekly distance and time between rides and e-bike rides
//! - Interactive egui dashboard, plus headless CSV/PNG/SVG export
//!
//! ## Example
//!
//! ```no_run
//! use ridestats::{analysis, PipelineConfig};
//!
//! let config = PipelineConfig::for_activity_log("activities.csv");
//! let data = analysis::run(&config)?;
//! for bucket in &data.years {
//!     println!("{}: {:.1} miles", bucket.period, bucket.distance_miles);
//! }
//! # Ok::<(), ridestats::DashboardError>(())
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod plotting;
pub mod report;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::App as DashboardApp;
pub use config::{ActivityFilter, InputSource, PipelineConfig};
pub use error::DashboardError;
pub use types::{BreakdownRow, DashboardData, Granularity, Period, TimeBucket};
