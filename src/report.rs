//! Self-contained HTML dashboard page: KPI panels and the six charts as inline SVG.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use chrono::Local;
use log::info;
use num_format::{Locale, ToFormattedString};

use crate::dashboard::Dashboard;
use crate::dataset::Dataset;
use crate::models::{Axis, FilterSelection};
use crate::viz::{self, ChartKind, ChartOptions, LegendMode};

/// Page texts and chart geometry for [`render_html`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Browser tab title.
    pub page_title: String,
    pub title: String,
    pub subtitle: String,
    /// Width of the full-row charts (scatter, defect rates).
    pub wide_width: u32,
    /// Width of the charts sharing a row.
    pub half_width: u32,
    pub chart_height: u32,
    pub locale: String,
    pub legend: LegendMode,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            page_title: "Supply Chain Insights".to_string(),
            title: "Supply Chain Management Dashboard".to_string(),
            subtitle: "Real-time analytics for inventory, logistics, and manufacturing".to_string(),
            wide_width: 1100,
            half_width: 540,
            chart_height: 420,
            locale: "en".to_string(),
            legend: viz::DEFAULT_LEGEND_MODE,
        }
    }
}

impl ReportOptions {
    fn chart_options(&self, kind: ChartKind) -> ChartOptions {
        ChartOptions {
            width: if kind.is_wide() {
                self.wide_width
            } else {
                self.half_width
            },
            height: self.chart_height,
            locale: self.locale.clone(),
            legend: self.legend,
        }
    }
}

/// Whole-dollar amount with thousands separators, e.g. `$1,234`.
pub fn format_currency(v: f64) -> String {
    let rounded = v.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let whole = rounded.abs() as u64;
    format!("{sign}${}", whole.to_formatted_string(&Locale::en))
}

/// Escape text for HTML element content and attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human summary of one axis of the selection: `All`, `None`, or the sorted values.
fn describe_axis(dataset: &Dataset, selection: &FilterSelection, axis: Axis) -> String {
    let observed = dataset.observed(axis);
    let accepted = selection.accepted(axis);
    if !observed.is_empty() && observed.iter().all(|v| accepted.contains(*v)) {
        "All".to_string()
    } else if accepted.is_empty() {
        "None".to_string()
    } else {
        selection.sorted(axis).join(", ")
    }
}

const STYLE: &str = "\
body{font-family:'DejaVu Sans',Helvetica,Arial,sans-serif;margin:0;background:#f5f6f8;color:#222}
main{max-width:1140px;margin:0 auto;padding:24px}
h1{margin:0 0 4px 0}
.subtitle{color:#555;margin:0 0 16px 0}
.filters{font-size:14px;color:#444;margin-bottom:16px}
.kpis{display:flex;gap:16px;margin-bottom:24px}
.kpi{flex:1;background:#fff;border-radius:6px;padding:12px 16px;box-shadow:0 1px 2px rgba(0,0,0,.1)}
.kpi .label{font-size:14px;color:#555}
.kpi .value{font-size:28px;font-weight:bold}
.row{display:flex;gap:16px;margin-bottom:16px}
.chart{background:#fff;border-radius:6px;padding:4px;box-shadow:0 1px 2px rgba(0,0,0,.1)}
footer{border-top:1px solid #ccc;margin-top:24px;padding-top:8px;font-size:12px;color:#777}
";

/// Render the complete dashboard page for one selection.
pub fn render_html(
    dataset: &Dataset,
    selection: &FilterSelection,
    dashboard: &Dashboard,
    opts: &ReportOptions,
) -> Result<String> {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>{}</title>", html_escape(&opts.page_title))?;
    writeln!(html, "<style>\n{STYLE}</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>\n<main>")?;
    writeln!(html, "<h1>{}</h1>", html_escape(&opts.title))?;
    writeln!(html, "<p class=\"subtitle\">{}</p>", html_escape(&opts.subtitle))?;

    writeln!(html, "<div class=\"filters\">")?;
    for axis in Axis::ALL {
        writeln!(
            html,
            "<div><strong>{}:</strong> {}</div>",
            html_escape(axis.label()),
            html_escape(&describe_axis(dataset, selection, axis))
        )?;
    }
    writeln!(
        html,
        "<div>Showing {} of {} records</div>",
        dashboard.matched(),
        dashboard.total_records
    )?;
    writeln!(html, "</div>")?;

    let kpis = &dashboard.kpis;
    writeln!(html, "<div class=\"kpis\">")?;
    for (label, value) in [
        ("Total Revenue", format_currency(kpis.total_revenue)),
        ("Total Costs", format_currency(kpis.total_costs)),
        ("Products Sold", kpis.products_sold.to_string()),
    ] {
        writeln!(
            html,
            "<div class=\"kpi\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            html_escape(label),
            html_escape(&value)
        )?;
    }
    writeln!(html, "</div>")?;

    let rows: [&[ChartKind]; 4] = [
        &[ChartKind::RevenueVsCost],
        &[ChartKind::StockByProduct, ChartKind::ProductionBySupplier],
        &[
            ChartKind::ShippingCostByCarrier,
            ChartKind::TransportModeFrequency,
        ],
        &[ChartKind::DefectRateByProduct],
    ];
    for row in rows {
        writeln!(html, "<div class=\"row\">")?;
        for &kind in row {
            let svg = viz::chart_svg_string(dashboard, kind, &opts.chart_options(kind))?;
            writeln!(
                html,
                "<div class=\"chart\" id=\"{}\">\n{}\n</div>",
                kind.file_stem(),
                svg
            )?;
        }
        writeln!(html, "</div>")?;
    }

    writeln!(
        html,
        "<footer>Generated by scdash on {}</footer>",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(html, "</main>\n</body>\n</html>")?;
    Ok(html)
}

/// Render the page and write it to `path`.
pub fn write_html<P: AsRef<Path>>(
    path: P,
    dataset: &Dataset,
    selection: &FilterSelection,
    dashboard: &Dashboard,
    opts: &ReportOptions,
) -> Result<()> {
    let path = path.as_ref();
    let html = render_html(dataset, selection, dashboard, opts)?;
    std::fs::write(path, html)?;
    info!("wrote dashboard page to {}", path.display());
    Ok(())
}
