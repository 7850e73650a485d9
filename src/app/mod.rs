//! Interactive dashboard built on eframe.

mod state;
mod ui;

pub use state::{App, PeriodTab, RideTab};
pub use ui::draw_ui;
