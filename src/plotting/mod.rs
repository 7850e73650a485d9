mod chart;
mod styles;

pub use chart::{draw_chart, render_rgb, save_chart, ChartFormat, ChartKind, PlotError};
pub use styles::{ChartStyle, ChartTheme};
