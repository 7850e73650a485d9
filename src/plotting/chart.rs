use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::RGBAColor;
use std::error::Error;
use std::fmt;
use std::path::Path;

use super::styles::{ChartStyle, ChartTheme};
use crate::types::{BreakdownRow, DashboardData, Granularity};

pub type PlotError = Box<dyn Error + Send + Sync>;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// The charts the dashboard can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Ascent (feet) and calories per period
    AscentCalories(Granularity),
    /// Climb/distance ratio per period
    ClimbRatio(Granularity),
    /// Weekly miles, ride stacked under e-bike
    RideTypeDistance,
    /// Weekly hours, ride stacked under e-bike
    RideTypeTime,
    /// Weekly share of distance by ride type
    RideTypeShare,
}

impl ChartKind {
    /// Every chart, in dashboard order.
    pub fn all() -> Vec<ChartKind> {
        let mut kinds = Vec::new();
        for granularity in Granularity::ALL {
            kinds.push(ChartKind::AscentCalories(granularity));
            kinds.push(ChartKind::ClimbRatio(granularity));
        }
        kinds.extend([
            ChartKind::RideTypeDistance,
            ChartKind::RideTypeTime,
            ChartKind::RideTypeShare,
        ]);
        kinds
    }

    pub fn title(&self) -> String {
        match self {
            ChartKind::AscentCalories(g) => format!("Ascent & Calories by {g}"),
            ChartKind::ClimbRatio(g) => format!("Ascent/distance ratio by {g}"),
            ChartKind::RideTypeDistance => "Weekly distance by ride type".to_string(),
            ChartKind::RideTypeTime => "Weekly time by ride type".to_string(),
            ChartKind::RideTypeShare => "Weekly distance share by ride type".to_string(),
        }
    }

    /// File stem used when the chart is exported.
    pub fn file_stem(&self) -> String {
        match self {
            ChartKind::AscentCalories(g) => format!("{}_ascent_calories", g.file_stem()),
            ChartKind::ClimbRatio(g) => format!("{}_climb_ratio", g.file_stem()),
            ChartKind::RideTypeDistance => "ride_type_distance".to_string(),
            ChartKind::RideTypeTime => "ride_type_time".to_string(),
            ChartKind::RideTypeShare => "ride_type_share".to_string(),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

/// Output format for exported charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

enum Layout {
    Lines,
    Stacked,
}

struct Series {
    label: &'static str,
    values: Vec<f64>,
    color: RGBAColor,
}

/// The columns of one chart, read from the aggregate tables.
struct ChartData {
    labels: Vec<String>,
    series: Vec<Series>,
    layout: Layout,
    y_desc: &'static str,
}

impl ChartData {
    fn collect(kind: ChartKind, data: &DashboardData, theme: &ChartTheme) -> Self {
        match kind {
            ChartKind::AscentCalories(granularity) => {
                let buckets = data.buckets(granularity);
                Self {
                    labels: buckets.iter().map(|b| b.period.label()).collect(),
                    series: vec![
                        Series {
                            label: "Ascent (feet)",
                            values: buckets.iter().map(|b| b.ascent_feet).collect(),
                            color: theme.ascent_color,
                        },
                        Series {
                            label: "Calories",
                            values: buckets.iter().map(|b| b.calories).collect(),
                            color: theme.calories_color,
                        },
                    ],
                    layout: Layout::Lines,
                    y_desc: "Ascent / Calories",
                }
            }
            ChartKind::ClimbRatio(granularity) => {
                let buckets = data.buckets(granularity);
                Self {
                    labels: buckets.iter().map(|b| b.period.label()).collect(),
                    series: vec![Series {
                        label: "Climb/distance ratio",
                        values: buckets.iter().map(|b| b.climb_distance_ratio).collect(),
                        color: theme.ratio_color,
                    }],
                    layout: Layout::Lines,
                    y_desc: "Feet per mile",
                }
            }
            ChartKind::RideTypeDistance => Self::ride_types(
                data,
                theme,
                |row| (row.ride_distance(), row.ebike_distance()),
                "Miles",
            ),
            ChartKind::RideTypeTime => Self::ride_types(
                data,
                theme,
                |row| (row.ride_time(), row.ebike_time()),
                "Hours",
            ),
            ChartKind::RideTypeShare => Self::ride_types(
                data,
                theme,
                |row| (row.ride_pct_distance(), row.ebike_pct_distance()),
                "% of distance",
            ),
        }
    }

    fn ride_types<F>(data: &DashboardData, theme: &ChartTheme, split: F, y_desc: &'static str) -> Self
    where
        F: Fn(&BreakdownRow) -> (f64, f64),
    {
        let (ride, ebike): (Vec<f64>, Vec<f64>) = data.ride_types.iter().map(split).unzip();
        Self {
            labels: data.ride_types.iter().map(|row| row.week.label()).collect(),
            series: vec![
                Series {
                    label: "Ride",
                    values: ride,
                    color: theme.ride_color,
                },
                Series {
                    label: "E-Bike Ride",
                    values: ebike,
                    color: theme.ebike_color,
                },
            ],
            layout: Layout::Stacked,
            y_desc,
        }
    }

    fn y_max(&self) -> f64 {
        let max = match self.layout {
            Layout::Lines => self
                .series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .fold(0.0, f64::max),
            Layout::Stacked => (0..self.labels.len())
                .map(|i| self.series.iter().map(|s| s.values[i]).sum::<f64>())
                .fold(0.0, f64::max),
        };
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }
}

/// Draw one chart onto any plotters drawing area.
///
/// Empty tables draw an empty-state caption instead of failing.
pub fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    data: &DashboardData,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&theme.background_color)?;
    let chart_data = ChartData::collect(kind, data, theme);

    if chart_data.labels.is_empty() {
        if style.text {
            let (width, height) = root.dim_in_pixel();
            let text_style = ("sans-serif", f64::from(style.caption_size))
                .into_font()
                .color(&theme.text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                format!("{}: no data", kind.title()),
                (width as i32 / 2, height as i32 / 2),
                text_style,
            ))?;
        }
        return Ok(());
    }

    let count = chart_data.labels.len() as f64;
    let mut builder = ChartBuilder::on(root);
    builder
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size);
    if style.text {
        builder.caption(
            kind.title(),
            ("sans-serif", f64::from(style.caption_size))
                .into_font()
                .color(&theme.text_color),
        );
    }
    let mut chart = builder.build_cartesian_2d(-0.5f64..(count - 0.5), 0f64..chart_data.y_max())?;

    let labels = &chart_data.labels;
    let x_label_formatter = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 || idx as usize >= labels.len() {
            return String::new();
        }
        labels[idx as usize].clone()
    };

    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color);
    if style.text {
        mesh.y_desc(chart_data.y_desc)
            .x_labels(labels.len().min(12))
            .label_style(
                ("sans-serif", f64::from(style.font_size))
                    .into_font()
                    .color(&theme.text_color),
            )
            .x_label_formatter(&x_label_formatter)
            .y_label_formatter(&format_axis_value);
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    match chart_data.layout {
        Layout::Lines => draw_lines(&mut chart, &chart_data.series, style)?,
        Layout::Stacked => draw_stacked_bars(&mut chart, &chart_data.series)?,
    }

    if style.text {
        chart
            .configure_series_labels()
            .background_style(theme.background_color)
            .border_style(theme.axis_color)
            .label_font(
                ("sans-serif", f64::from(style.font_size))
                    .into_font()
                    .color(&theme.text_color),
            )
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
    }

    Ok(())
}

fn draw_lines<DB>(chart: &mut Chart<'_, DB>, series: &[Series], style: &ChartStyle) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    for s in series {
        let color = s.color;
        let points: Vec<(f64, f64)> = s
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect();

        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(style.line_width),
            ))?
            .label(s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        if points.len() <= style.marker_limit {
            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
            )?;
        }
    }
    Ok(())
}

fn draw_stacked_bars<DB>(chart: &mut Chart<'_, DB>, series: &[Series]) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let bar_half_width = 0.4;
    let len = series.first().map_or(0, |s| s.values.len());
    let mut base = vec![0.0; len];

    for s in series {
        let color = s.color;
        let bars: Vec<Rectangle<(f64, f64)>> = s
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let x = i as f64;
                let y0 = base[i];
                Rectangle::new(
                    [(x - bar_half_width, y0), (x + bar_half_width, y0 + v)],
                    color.filled(),
                )
            })
            .collect();
        for (b, v) in base.iter_mut().zip(&s.values) {
            *b += v;
        }

        chart
            .draw_series(bars)?
            .label(s.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
    }
    Ok(())
}

/// Axis labels with K/M suffixes for large values.
fn format_axis_value(y: &f64) -> String {
    if y.abs() >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if y.abs() >= 1_000.0 {
        format!("{:.1}K", y / 1_000.0)
    } else if y.abs() >= 10.0 || *y == 0.0 {
        format!("{:.0}", y)
    } else {
        format!("{:.1}", y)
    }
}

/// Render a chart into an RGB pixel buffer sized by `style`.
pub fn render_rgb(
    kind: ChartKind,
    data: &DashboardData,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<Vec<u8>, PlotError> {
    let (width, height) = style.size();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_chart(&root, kind, data, theme, style)?;
        root.present()?;
    }
    Ok(buffer)
}

/// Write a chart to `path` as PNG or SVG.
pub fn save_chart(
    kind: ChartKind,
    data: &DashboardData,
    path: &Path,
    format: ChartFormat,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let theme = ChartTheme::default();

    match format {
        ChartFormat::Png => {
            let buffer = render_rgb(kind, data, &theme, style)?;
            let image = image::RgbImage::from_raw(style.width, style.height, buffer)
                .ok_or("rendered buffer does not match the chart size")?;
            image.save(path)?;
        }
        ChartFormat::Svg => {
            let root = SVGBackend::new(path, style.size()).into_drawing_area();
            draw_chart(&root, kind, data, &theme, style)?;
            root.present()?;
        }
    }
    Ok(())
}
