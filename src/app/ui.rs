use egui::{Context, TextureHandle, TextureOptions, Ui};
use egui_extras::{Column, TableBuilder, TableRow};
use tracing::warn;

use super::{App, PeriodTab, RideTab};
use crate::analysis::display_rows;
use crate::config::DEFAULT_MAX_RIDE_HOURS;
use crate::plotting::{render_rgb, ChartKind};
use crate::types::{DisplayBreakdownRow, DisplayBucket, Granularity};

const ROW_HEIGHT: f32 = 18.0;
const TABLE_HEIGHT: f32 = 320.0;

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context) {
    if app.update_needed {
        app.refresh();
    }

    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        draw_side_panel(app, ui);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Cycling Data");
        ui.label(app.status_line());
        ui.separator();

        if let Some(message) = app.error_message.clone() {
            ui.colored_label(ui.visuals().error_fg_color, message);
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for granularity in Granularity::ALL {
                draw_period_section(app, ui, ctx, granularity);
                ui.separator();
            }
            draw_ride_type_section(app, ui, ctx);
        });
    });
}

fn draw_side_panel(app: &mut App, ui: &mut Ui) {
    ui.heading("Activity Types");
    ui.separator();

    for label in app.type_options() {
        let mut selected = app.config.filter.contains(&label);
        if ui.checkbox(&mut selected, label.as_str()).changed() {
            app.set_type_selected(&label, selected);
        }
    }
    if app.config.filter.is_accept_all() {
        ui.weak("Nothing selected, showing every type");
    }
    ui.horizontal(|ui| {
        if ui.button("Rides only").clicked() {
            app.select_ride_types();
        }
        if ui.button("Clear").clicked() {
            app.clear_type_selection();
        }
    });

    ui.separator();
    ui.heading("Ride Time");
    let mut skip_long = app.config.max_ride_hours.is_some();
    if ui.checkbox(&mut skip_long, "Skip long rides").changed() {
        app.set_max_ride_hours(skip_long.then_some(DEFAULT_MAX_RIDE_HOURS));
    }
    if let Some(mut hours) = app.config.max_ride_hours {
        let response = ui.add(
            egui::DragValue::new(&mut hours)
                .range(0.5..=48.0)
                .clamp_existing_to_range(false)
                .speed(0.5)
                .suffix(" h"),
        );
        if response.changed() {
            app.set_max_ride_hours(Some(hours));
        }
    }

    ui.separator();
    if ui.button("Reload").clicked() {
        app.update_needed = true;
    }
}

fn draw_period_section(app: &mut App, ui: &mut Ui, ctx: &Context, granularity: Granularity) {
    ui.heading(format!("Data by {granularity}"));

    let mut tab = app.period_tab(granularity);
    ui.horizontal(|ui| {
        ui.selectable_value(&mut tab, PeriodTab::AscentCalories, "Ascent & Calories");
        ui.selectable_value(&mut tab, PeriodTab::ClimbRatio, "Ascent/distance ratio");
        ui.selectable_value(&mut tab, PeriodTab::Table, "Dataframe");
    });
    app.set_period_tab(granularity, tab);

    match tab {
        PeriodTab::AscentCalories => show_chart(app, ui, ctx, ChartKind::AscentCalories(granularity)),
        PeriodTab::ClimbRatio => show_chart(app, ui, ctx, ChartKind::ClimbRatio(granularity)),
        PeriodTab::Table => {
            let rows = app
                .data
                .as_ref()
                .map(|data| display_rows(data.buckets(granularity)))
                .unwrap_or_default();
            ui.push_id(granularity.name(), |ui| bucket_table(ui, granularity, &rows));
        }
    }
}

fn draw_ride_type_section(app: &mut App, ui: &mut Ui, ctx: &Context) {
    ui.heading("Ride vs E-Bike Ride by Week");

    ui.horizontal(|ui| {
        ui.selectable_value(&mut app.ride_tab, RideTab::Distance, "Distance");
        ui.selectable_value(&mut app.ride_tab, RideTab::Time, "Time");
        ui.selectable_value(&mut app.ride_tab, RideTab::Share, "Share");
        ui.selectable_value(&mut app.ride_tab, RideTab::Table, "Dataframe");
    });

    let tab = app.ride_tab;
    match tab {
        RideTab::Distance => show_chart(app, ui, ctx, ChartKind::RideTypeDistance),
        RideTab::Time => show_chart(app, ui, ctx, ChartKind::RideTypeTime),
        RideTab::Share => show_chart(app, ui, ctx, ChartKind::RideTypeShare),
        RideTab::Table => {
            let rows: Vec<DisplayBreakdownRow> = app
                .data
                .as_ref()
                .map(|data| data.ride_types.iter().map(|row| row.to_display()).collect())
                .unwrap_or_default();
            ui.push_id("ride_types", |ui| {
                egui::ScrollArea::horizontal().show(ui, |ui| breakdown_table(ui, &rows));
            });
        }
    }
}

fn show_chart(app: &mut App, ui: &mut Ui, ctx: &Context, kind: ChartKind) {
    match chart_texture(app, ctx, kind) {
        Some(texture) => {
            let width = ui.available_width().min(texture.size_vec2().x);
            ui.add(egui::Image::new(&texture).max_width(width));
        }
        None => {
            ui.weak(format!("{kind} could not be drawn"));
        }
    }
}

/// Texture for `kind`, rendered and uploaded on first use after a refresh.
fn chart_texture(app: &mut App, ctx: &Context, kind: ChartKind) -> Option<TextureHandle> {
    if let Some(slot) = app.textures.get(&kind) {
        return slot.clone();
    }
    let data = app.data.as_ref()?;

    let texture = match render_rgb(kind, data, &app.theme, &app.style) {
        Ok(pixels) => {
            let (width, height) = app.style.size();
            let image = egui::ColorImage::from_rgb([width as usize, height as usize], &pixels);
            Some(ctx.load_texture(kind.file_stem(), image, TextureOptions::LINEAR))
        }
        Err(e) => {
            warn!(chart = %kind, error = %e, "chart rendering failed");
            None
        }
    };
    app.textures.insert(kind, texture.clone());
    texture
}

fn table(ui: &mut Ui, columns: usize) -> TableBuilder<'_> {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(TABLE_HEIGHT)
        .columns(Column::auto().at_least(70.0), columns)
}

fn cell(row: &mut TableRow<'_, '_>, text: impl Into<String>) {
    let text = text.into();
    row.col(|ui| {
        ui.label(text);
    });
}

fn bucket_table(ui: &mut Ui, granularity: Granularity, rows: &[DisplayBucket]) {
    let headers = DisplayBucket::headers(granularity);

    table(ui, headers.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in headers {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let bucket = &rows[row.index()];
                cell(&mut row, bucket.period.as_str());
                cell(&mut row, bucket.ascent_feet.to_string());
                cell(&mut row, bucket.calories.to_string());
                cell(&mut row, format!("{:.1}", bucket.distance_miles));
                cell(&mut row, format!("{:.1}", bucket.climb_distance_ratio));
            });
        });
}

fn breakdown_table(ui: &mut Ui, rows: &[DisplayBreakdownRow]) {
    let headers = DisplayBreakdownRow::HEADERS;

    table(ui, headers.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in headers {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let week = &rows[row.index()];
                cell(&mut row, week.week.as_str());
                for value in [
                    week.ride_distance,
                    week.ebike_distance,
                    week.total_distance,
                    week.ride_pct_distance,
                    week.ebike_pct_distance,
                    week.ride_time,
                    week.ebike_time,
                    week.total_time,
                    week.ride_pct_time,
                    week.ebike_pct_time,
                ] {
                    cell(&mut row, format!("{value:.1}"));
                }
            });
        });
}
