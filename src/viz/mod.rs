//! Visualization: render the six dashboard charts to **SVG** or **PNG**.
//!
//! - Distinct category colors (Microsoft Office palette)
//! - Locale-aware tick labels (`30,000` vs `30.000`)
//! - Scatter legend placement: `Inside`, `Right`, `Bottom` (non-overlapping for external legends)
//! - Box plots with 1.5 IQR whiskers, bar charts with value labels
//! - Titled placeholder when the current filters leave a chart empty
//!
//! Files are written by extension (`.svg` or anything else as PNG). The HTML page embeds
//! [`chart_svg_string`] output; the desktop app uploads [`chart_rgb_buffer`] output as textures.

mod charts;
pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::{ChartKind, ChartOptions, DEFAULT_LEGEND_MODE, LegendMode};

use crate::dashboard::Dashboard;
use anyhow::{Result, anyhow};
use log::debug;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::{Path, PathBuf};
use std::sync::Once;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        // From `src/viz/mod.rs` to the project root, then `assets/DejaVuSans.ttf`.
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Render one chart to a file. `.svg` selects the SVG backend, any other extension PNG.
pub fn plot_chart<P: AsRef<Path>>(
    dashboard: &Dashboard,
    kind: ChartKind,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    check_size(opts)?;
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    debug!("rendering {:?} to {}", kind, out_path.display());

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, (opts.width, opts.height)).into_drawing_area();
        draw_chart(&root, dashboard, kind, opts)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    } else {
        let root = BitMapBackend::new(out_path, (opts.width, opts.height)).into_drawing_area();
        draw_chart(&root, dashboard, kind, opts)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Render one chart to an SVG document held in memory.
pub fn chart_svg_string(dashboard: &Dashboard, kind: ChartKind, opts: &ChartOptions) -> Result<String> {
    check_size(opts)?;
    ensure_fonts_registered();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        draw_chart(&root, dashboard, kind, opts)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(svg)
}

/// Render one chart into a packed RGB buffer of `width * height * 3` bytes, row-major.
pub fn chart_rgb_buffer(dashboard: &Dashboard, kind: ChartKind, opts: &ChartOptions) -> Result<Vec<u8>> {
    check_size(opts)?;
    ensure_fonts_registered();
    let mut buf = vec![0u8; opts.width as usize * opts.height as usize * 3];
    {
        let root =
            BitMapBackend::with_buffer(&mut buf, (opts.width, opts.height)).into_drawing_area();
        draw_chart(&root, dashboard, kind, opts)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

/// Render every chart into `dir` as `<file_stem>.<ext>`; returns the written paths in
/// dashboard order.
pub fn plot_all<P: AsRef<Path>>(
    dashboard: &Dashboard,
    dir: P,
    ext: &str,
    opts: &ChartOptions,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(ChartKind::ALL.len());
    for kind in ChartKind::ALL {
        let path = dir.join(format!("{}.{}", kind.file_stem(), ext));
        plot_chart(dashboard, kind, &path, opts)?;
        written.push(path);
    }
    Ok(written)
}

fn check_size(opts: &ChartOptions) -> Result<()> {
    if opts.width < 200 || opts.height < 150 {
        return Err(anyhow!(
            "chart size {}x{} is too small (minimum 200x150)",
            opts.width,
            opts.height
        ));
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dashboard: &Dashboard,
    kind: ChartKind,
    opts: &ChartOptions,
) -> Result<()> {
    match kind {
        ChartKind::RevenueVsCost => charts::draw_scatter(root, &dashboard.revenue_vs_cost, opts),
        ChartKind::StockByProduct => {
            charts::draw_box_plot(root, kind, &dashboard.stock_by_product, opts)
        }
        ChartKind::ProductionBySupplier => {
            let bars: Vec<(String, f64)> = dashboard
                .production_by_supplier
                .iter()
                .map(|g| (g.group.clone(), g.mean))
                .collect();
            charts::draw_bars(root, kind, &bars, 1, opts)
        }
        ChartKind::ShippingCostByCarrier => {
            charts::draw_box_plot(root, kind, &dashboard.shipping_cost_by_carrier, opts)
        }
        ChartKind::TransportModeFrequency => {
            let bars: Vec<(String, f64)> = dashboard
                .transport_mode_counts
                .iter()
                .map(|c| (c.category.clone(), c.count as f64))
                .collect();
            charts::draw_bars(root, kind, &bars, 0, opts)
        }
        ChartKind::DefectRateByProduct => {
            charts::draw_box_plot(root, kind, &dashboard.defect_rate_by_product, opts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_buffer_has_three_bytes_per_pixel() {
        let opts = ChartOptions {
            width: 320,
            height: 200,
            ..ChartOptions::default()
        };
        let buf = chart_rgb_buffer(&Dashboard::default(), ChartKind::StockByProduct, &opts).unwrap();
        assert_eq!(buf.len(), 320 * 200 * 3);
        // The placeholder fills the canvas white.
        assert_eq!(&buf[..3], &[255, 255, 255]);
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let opts = ChartOptions {
            width: 10,
            height: 10,
            ..ChartOptions::default()
        };
        assert!(chart_svg_string(&Dashboard::default(), ChartKind::RevenueVsCost, &opts).is_err());
    }
}
