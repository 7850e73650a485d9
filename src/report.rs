//! Headless export of the dashboard tables and charts.
//!
//! Tables are written from the rounded display copies, one CSV per
//! granularity plus the weekly ride-type breakdown.

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analysis::display_rows;
use crate::error::{DashboardError, Result};
use crate::plotting::{save_chart, ChartFormat, ChartKind, ChartStyle};
use crate::types::{DashboardData, DisplayBreakdownRow, DisplayBucket, Granularity};

pub const RIDE_TYPES_FILE: &str = "ride_types.csv";

/// Files written by one export, in write order.
#[derive(Debug, Default)]
pub struct ReportFiles {
    pub tables: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
}

/// Write `rows` under `header` as CSV. An empty table still gets its header.
pub fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let export_error = |source: csv::Error| DashboardError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(export_error)?;
    writer.write_record(header).map_err(export_error)?;
    for row in rows {
        writer.serialize(row).map_err(export_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Export every table and chart into `out_dir`, creating it when missing.
pub fn export_report(
    data: &DashboardData,
    out_dir: &Path,
    format: ChartFormat,
    style: &ChartStyle,
) -> Result<ReportFiles> {
    fs::create_dir_all(out_dir)?;
    let mut files = ReportFiles::default();

    for granularity in Granularity::ALL {
        let path = out_dir.join(format!("{}.csv", granularity.file_stem()));
        let rows = display_rows(data.buckets(granularity));
        write_table(&path, &DisplayBucket::headers(granularity), &rows)?;
        debug!(path = %path.display(), rows = rows.len(), "table written");
        files.tables.push(path);
    }

    let path = out_dir.join(RIDE_TYPES_FILE);
    let rows: Vec<DisplayBreakdownRow> = data.ride_types.iter().map(|row| row.to_display()).collect();
    write_table(&path, &DisplayBreakdownRow::HEADERS, &rows)?;
    files.tables.push(path);

    for kind in ChartKind::all() {
        let path = out_dir.join(format!("{}.{}", kind.file_stem(), format.extension()));
        save_chart(kind, data, &path, format, style)
            .map_err(|e| DashboardError::Render(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), chart = %kind, "chart written");
        files.charts.push(path);
    }

    info!(
        directory = %out_dir.display(),
        tables = files.tables.len(),
        charts = files.charts.len(),
        "report exported"
    );
    Ok(files)
}

/// Print the year, month and week tables as aligned text.
pub fn write_summary<W: Write>(out: &mut W, data: &DashboardData) -> io::Result<()> {
    writeln!(out, "{} activities", data.activity_count)?;

    for granularity in Granularity::ALL {
        let rows = display_rows(data.buckets(granularity));
        let [period, ascent, calories, distance, ratio] = DisplayBucket::headers(granularity);

        writeln!(out)?;
        writeln!(out, "Data by {granularity}")?;
        writeln!(
            out,
            "{period:<10} {ascent:>14} {calories:>10} {distance:>17} {ratio:>22}"
        )?;
        if rows.is_empty() {
            writeln!(out, "(no activities)")?;
        }
        for row in rows {
            writeln!(
                out,
                "{:<10} {:>14} {:>10} {:>17.1} {:>22.1}",
                row.period, row.ascent_feet, row.calories, row.distance_miles, row.climb_distance_ratio
            )?;
        }
    }

    if !data.ride_types.is_empty() {
        writeln!(out)?;
        writeln!(out, "Ride vs E-Bike Ride: {} weeks", data.ride_types.len())?;
    }
    Ok(())
}
