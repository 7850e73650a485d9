use eframe::App as EApp;
use egui::TextureHandle;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use tracing::{debug, warn};

use crate::analysis;
use crate::config::PipelineConfig;
use crate::plotting::{ChartKind, ChartStyle, ChartTheme};
use crate::types::{DashboardData, Granularity, RideType};

/// View shown under each year/month/week heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodTab {
    #[default]
    AscentCalories,
    ClimbRatio,
    Table,
}

/// View shown under the ride-type heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RideTab {
    #[default]
    Distance,
    Time,
    Share,
    Table,
}

/// Main application state
pub struct App {
    pub config: PipelineConfig,
    pub data: Option<DashboardData>,
    pub error_message: Option<String>,
    /// Re-run the pipeline before the next frame is drawn
    pub update_needed: bool,
    pub period_tabs: HashMap<Granularity, PeriodTab>,
    pub ride_tab: RideTab,
    pub theme: ChartTheme,
    pub style: ChartStyle,
    /// Uploaded charts; `None` marks a chart that failed to render
    pub textures: HashMap<ChartKind, Option<TextureHandle>>,
    pub last_run_ms: Option<u128>,
}

impl App {
    /// Create the dashboard; data is loaded on the first frame.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            data: None,
            error_message: None,
            update_needed: true,
            period_tabs: HashMap::new(),
            ride_tab: RideTab::default(),
            theme: ChartTheme::default(),
            style: ChartStyle::default(),
            textures: HashMap::new(),
            last_run_ms: None,
        }
    }

    /// Run the pipeline with the current config and replace every table.
    ///
    /// A failed run clears the previous data so stale charts are never shown.
    pub fn refresh(&mut self) {
        let start_time = Instant::now();
        match analysis::run(&self.config) {
            Ok(data) => {
                self.data = Some(data);
                self.error_message = None;
            }
            Err(e) => {
                warn!(error = %e, "dashboard refresh failed");
                self.data = None;
                self.error_message = Some(if e.is_data_unavailable() {
                    format!("Data unavailable: {e}")
                } else {
                    e.to_string()
                });
            }
        }
        self.last_run_ms = Some(start_time.elapsed().as_millis());
        self.textures.clear();
        self.update_needed = false;
    }

    /// Labels offered for selection: the ride types, every type seen in the
    /// data and anything already selected.
    pub fn type_options(&self) -> Vec<String> {
        let mut options: BTreeSet<String> = RideType::ALL
            .iter()
            .map(|ride| ride.label().to_string())
            .collect();
        if let Some(data) = &self.data {
            options.extend(data.available_types.iter().cloned());
        }
        options.extend(self.config.filter.labels().map(str::to_string));
        options.into_iter().collect()
    }

    pub fn set_type_selected(&mut self, label: &str, selected: bool) {
        if selected {
            self.config.filter.insert(label);
        } else {
            self.config.filter.remove(label);
        }
        debug!(label, selected, "activity type selection changed");
        self.update_needed = true;
    }

    pub fn select_ride_types(&mut self) {
        for ride in RideType::ALL {
            self.config.filter.insert(ride.label());
        }
        self.update_needed = true;
    }

    /// Drop every selected label, which shows all activity types.
    pub fn clear_type_selection(&mut self) {
        let labels: Vec<String> = self.config.filter.labels().map(str::to_string).collect();
        for label in labels {
            self.config.filter.remove(&label);
        }
        self.update_needed = true;
    }

    pub fn set_max_ride_hours(&mut self, hours: Option<f64>) {
        if self.config.max_ride_hours != hours {
            self.config.max_ride_hours = hours;
            self.update_needed = true;
        }
    }

    pub fn period_tab(&self, granularity: Granularity) -> PeriodTab {
        self.period_tabs.get(&granularity).copied().unwrap_or_default()
    }

    pub fn set_period_tab(&mut self, granularity: Granularity, tab: PeriodTab) {
        self.period_tabs.insert(granularity, tab);
    }

    /// One-line summary of what is on screen.
    pub fn status_line(&self) -> String {
        let Some(data) = &self.data else {
            return "No data loaded".to_string();
        };
        let selection = if self.config.filter.is_accept_all() {
            "all types".to_string()
        } else {
            self.config.filter.labels().collect::<Vec<_>>().join(", ")
        };
        let mut line = format!("{} activities selected ({selection})", data.activity_count);
        if let Some(ms) = self.last_run_ms {
            line.push_str(&format!(", loaded in {ms} ms"));
        }
        line
    }
}

impl EApp for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        super::ui::draw_ui(self, ctx);
    }
}
