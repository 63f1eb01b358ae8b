/*!
 * Desktop dashboard for scdash-rs - supply-chain filters, KPIs and charts
 *
 * A cross-platform desktop application providing:
 * - Checkbox filters for product type, supplier and transportation mode
 * - Live KPIs and the six dashboard charts for the current selection
 * - Export of the dashboard page (HTML) or the filtered records (CSV)
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::{Context, Result};
use eframe::egui;
use scdash_rs::report::{self, ReportOptions};
use scdash_rs::viz::{self, ChartKind, ChartOptions};
use scdash_rs::{Axis, Dashboard, Dataset, FilterSelection, storage};
use std::path::PathBuf;

const DEFAULT_DATA: &str = "supply_chain_data.csv";
const WIDE_CHART: [u32; 2] = [1100, 420];
const HALF_CHART: [u32; 2] = [540, 420];

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA));
    // Load before opening a window: a broken file is fatal.
    let dataset = storage::load_csv(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Supply Chain Insights"),
        ..Default::default()
    };

    eframe::run_native(
        "Supply Chain Insights",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the window: {e}"))
}

/// Main application state
struct DashboardApp {
    dataset: Dataset,
    /// Observed values per axis, in `Axis::ALL` order.
    options: Vec<(Axis, Vec<String>)>,
    selection: FilterSelection,

    // Derived view, rebuilt when `dirty` is set
    dashboard: Dashboard,
    charts: Vec<(ChartKind, egui::TextureHandle)>,
    dirty: bool,

    export_dir: PathBuf,
    status_message: String,
    error_message: String,
}

impl DashboardApp {
    fn new(dataset: Dataset) -> Self {
        let options = Axis::ALL
            .iter()
            .map(|axis| {
                let values = dataset
                    .observed(*axis)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (*axis, values)
            })
            .collect();
        let selection = FilterSelection::all_of(&dataset);
        let export_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            dataset,
            options,
            selection,
            dashboard: Dashboard::default(),
            charts: Vec::new(),
            dirty: true,
            export_dir,
            status_message: String::new(),
            error_message: String::new(),
        }
    }

    /// Filter, aggregate and render again; the previous textures are dropped.
    fn refresh(&mut self, ctx: &egui::Context) {
        self.dirty = false;
        self.dashboard = Dashboard::build(&self.dataset, &self.selection);
        self.charts.clear();

        for kind in ChartKind::ALL {
            let [width, height] = if kind.is_wide() { WIDE_CHART } else { HALF_CHART };
            let opts = ChartOptions {
                width,
                height,
                ..ChartOptions::default()
            };
            match viz::chart_rgb_buffer(&self.dashboard, kind, &opts) {
                Ok(rgb) => {
                    let image =
                        egui::ColorImage::from_rgb([width as usize, height as usize], &rgb);
                    let texture =
                        ctx.load_texture(kind.file_stem(), image, egui::TextureOptions::LINEAR);
                    self.charts.push((kind, texture));
                }
                Err(err) => {
                    self.error_message = format!("Failed to render {}: {}", kind.title(), err);
                }
            }
        }
    }

    fn export_html(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.export_dir)
            .set_file_name("dashboard.html")
            .add_filter("HTML", &["html"])
            .save_file()
        else {
            return;
        };
        let result = report::write_html(
            &path,
            &self.dataset,
            &self.selection,
            &self.dashboard,
            &ReportOptions::default(),
        );
        self.report_export(result, path);
    }

    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.export_dir)
            .set_file_name("filtered_supply_chain.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        let result = storage::save_csv(&self.dashboard.filtered, &path);
        self.report_export(result, path);
    }

    fn report_export(&mut self, result: Result<()>, path: PathBuf) {
        match result {
            Ok(()) => {
                self.status_message = format!("Saved {}", path.display());
                self.error_message.clear();
                if let Some(dir) = path.parent() {
                    self.export_dir = dir.to_path_buf();
                }
            }
            Err(err) => {
                self.error_message = format!("Export failed: {}", err);
                self.status_message.clear();
            }
        }
    }

    fn filter_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Filter Data");
        ui.add_space(5.0);

        for (axis, values) in &self.options {
            ui.group(|ui| {
                ui.label(axis.label());
                ui.horizontal(|ui| {
                    if ui.small_button("All").clicked() {
                        self.selection.set_accepted(*axis, values.iter().cloned());
                        self.dirty = true;
                    }
                    if ui.small_button("None").clicked() {
                        self.selection.set_accepted(*axis, Vec::<String>::new());
                        self.dirty = true;
                    }
                });
                for value in values {
                    let mut on = self.selection.accepts(*axis, value);
                    if ui.checkbox(&mut on, value.as_str()).changed()
                        && self.selection.set(*axis, value, on)
                    {
                        self.dirty = true;
                    }
                }
            });
            ui.add_space(5.0);
        }
    }

    fn chart(&self, ui: &mut egui::Ui, kind: ChartKind) {
        if let Some((_, texture)) = self.charts.iter().find(|(k, _)| *k == kind) {
            ui.add(egui::Image::new(texture).max_width(ui.available_width()));
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.dirty {
            self.refresh(ctx);
        }

        egui::SidePanel::left("filters")
            .resizable(true)
            .default_width(240.0)
            .min_width(180.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.filter_panel(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let defaults = ReportOptions::default();
                ui.heading(&defaults.title);
                ui.label(&defaults.subtitle);
                ui.label(format!(
                    "Showing {} of {} records",
                    self.dashboard.matched(),
                    self.dashboard.total_records
                ));
                ui.add_space(10.0);

                let kpis = &self.dashboard.kpis;
                ui.columns(3, |cols| {
                    for (col, (label, value)) in cols.iter_mut().zip([
                        ("Total Revenue", report::format_currency(kpis.total_revenue)),
                        ("Total Costs", report::format_currency(kpis.total_costs)),
                        ("Products Sold", kpis.products_sold.to_string()),
                    ]) {
                        col.group(|ui| {
                            ui.label(label);
                            ui.heading(value);
                        });
                    }
                });
                ui.add_space(10.0);

                self.chart(ui, ChartKind::RevenueVsCost);
                ui.columns(2, |cols| {
                    self.chart(&mut cols[0], ChartKind::StockByProduct);
                    self.chart(&mut cols[1], ChartKind::ProductionBySupplier);
                });
                ui.columns(2, |cols| {
                    self.chart(&mut cols[0], ChartKind::ShippingCostByCarrier);
                    self.chart(&mut cols[1], ChartKind::TransportModeFrequency);
                });
                self.chart(ui, ChartKind::DefectRateByProduct);

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Export HTML").clicked() {
                        self.export_html();
                    }
                    if ui.button("Export CSV").clicked() {
                        self.export_csv();
                    }
                });

                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }

                ui.separator();
                ui.small("Built with scdash-rs");
            });
        });
    }
}
