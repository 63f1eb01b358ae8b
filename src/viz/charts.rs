//! Drawing routines for the three chart shapes of the dashboard: scatter, box plot, bars.
//!
//! Categorical charts use a plain `f64` x range of `-0.5..n-0.5` so each category owns a
//! unit-wide slot centred on its index. Plotters' own x labels are disabled and category
//! names are drawn onto the root area below the axis.

use anyhow::{Result, anyhow};
use num_format::Locale;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::legend::{draw_legend_panel, estimate_bottom_legend_height_px};
use super::text::truncate_to_width;
use super::types::{ChartKind, ChartOptions, LegendMode};
use super::util::{
    choose_axis_scale, compute_left_label_area_px, format_number, format_tick, map_locale,
    office_color, padded_range, scaled_axis_title,
};
use crate::dashboard::ScatterPoint;
use crate::stats::{BoxStats, GroupValues};

const MARGIN: i32 = 16;
const CAPTION_PX: u32 = 20;
const TICK_FONT_PX: u32 = 12;
const DESC_FONT_PX: u32 = 14;
const Y_TICKS: usize = 8;
const BOTTOM_LABEL_PX: u32 = 56;
const CATEGORY_LABEL_GAP: i32 = 8;
const BOX_HALF_WIDTH: f64 = 0.3;
const CAP_HALF_WIDTH: f64 = 0.15;
const BAR_HALF_WIDTH: f64 = 0.35;
const MUTED: RGBColor = RGBColor(99, 99, 99);

pub(crate) const EMPTY_MESSAGE: &str = "No data for the current filters";

type CategoryChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn plot_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// Titled placeholder for an aggregate with nothing in it.
pub(crate) fn draw_empty<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    kind: ChartKind,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let body = root
        .titled(kind.title(), (FontFamily::SansSerif, CAPTION_PX))
        .map_err(plot_err)?;
    let (w, h) = body.dim_in_pixel();
    let style = TextStyle::from((FontFamily::SansSerif, DESC_FONT_PX))
        .color(&MUTED)
        .pos(Pos::new(HPos::Center, VPos::Center));
    body.draw(&Text::new(
        EMPTY_MESSAGE,
        (w as i32 / 2, h as i32 / 2),
        style,
    ))
    .map_err(plot_err)?;
    Ok(())
}

/// Scatter of revenue against manufacturing cost, one color per product type.
pub(crate) fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[ScatterPoint],
    opts: &ChartOptions,
) -> Result<()> {
    let kind = ChartKind::RevenueVsCost;
    if points.is_empty() {
        return draw_empty(root, kind);
    }
    let (locale, dec_sep) = map_locale(&opts.locale);

    // Series in first-appearance order of product type.
    let mut series: Vec<(&str, Vec<(f64, f64)>)> = Vec::new();
    for p in points {
        let xy = (p.manufacturing_cost, p.revenue);
        match series.iter_mut().find(|(name, _)| *name == p.product_type) {
            Some((_, v)) => v.push(xy),
            None => series.push((p.product_type.as_str(), vec![xy])),
        }
    }

    let (x_lo, x_hi) = min_max(points.iter().map(|p| p.manufacturing_cost));
    let (y_lo, y_hi) = min_max(points.iter().map(|p| p.revenue));
    let (xscale, x_word) = choose_axis_scale(x_lo.abs().max(x_hi.abs()));
    let (yscale, y_word) = choose_axis_scale(y_lo.abs().max(y_hi.abs()));
    let (x_lo, x_hi) = padded_range(x_lo / xscale, x_hi / xscale, false);
    let (y_lo, y_hi) = padded_range(y_lo / yscale, y_hi / yscale, false);

    let (x_title, y_title) = kind.axis_titles();
    let left_px = compute_left_label_area_px(y_lo, y_hi, Y_TICKS, TICK_FONT_PX, locale, dec_sep);
    let axis_x_start_px = MARGIN + left_px as i32;

    let legend_items: Vec<(String, RGBAColor)> = series
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.to_string(), office_color(i)))
        .collect();
    let labels: Vec<String> = legend_items.iter().map(|(l, _)| l.clone()).collect();

    let (root_w, root_h) = root.dim_in_pixel();
    let (plot_area, legend_area) = match opts.legend {
        LegendMode::Right => {
            let (plot, legend) = root.split_horizontally(80.percent_width());
            (plot, Some(legend))
        }
        LegendMode::Bottom => {
            let h = estimate_bottom_legend_height_px(&labels, axis_x_start_px, root_w as i32)
                .max(40);
            let (plot, legend) = root.split_vertically((root_h as i32 - h).max(40));
            (plot, Some(legend))
        }
        LegendMode::Inside => (root.clone(), None),
    };
    plot_area.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(kind.title(), (FontFamily::SansSerif, CAPTION_PX))
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, BOTTOM_LABEL_PX)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(plot_err)?;

    let fmt = |v: &f64| format_tick(*v, locale, dec_sep);
    chart
        .configure_mesh()
        .x_desc(scaled_axis_title(x_title, x_word))
        .y_desc(scaled_axis_title(y_title, y_word))
        .x_labels(10)
        .y_labels(Y_TICKS)
        .x_label_formatter(&fmt)
        .y_label_formatter(&fmt)
        .label_style((FontFamily::SansSerif, TICK_FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, DESC_FONT_PX))
        .draw()
        .map_err(plot_err)?;

    for (i, (name, xy)) in series.iter().enumerate() {
        let color = office_color(i);
        let elem = chart
            .draw_series(
                xy.iter()
                    .map(|(x, y)| Circle::new((x / xscale, y / yscale), 4, color.mix(0.8).filled())),
            )
            .map_err(plot_err)?;
        if legend_area.is_none() {
            let label = name.to_string();
            elem.label(label).legend(move |(x, y)| {
                Circle::new((x + 8, y), 4, color.filled())
            });
        }
    }

    match legend_area {
        Some(ref area) => draw_legend_panel(area, &legend_items, opts.legend, axis_x_start_px)?,
        None => chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, DESC_FONT_PX))
            .draw()
            .map_err(plot_err)?,
    }
    Ok(())
}

/// Box plots with 1.5 IQR whiskers and hollow outlier markers, one box per group.
pub(crate) fn draw_box_plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    groups: &[GroupValues],
    opts: &ChartOptions,
) -> Result<()> {
    let boxes: Vec<(&str, BoxStats)> = groups
        .iter()
        .filter_map(|g| g.summary().map(|s| (g.group.as_str(), s)))
        .collect();
    if boxes.is_empty() {
        return draw_empty(root, kind);
    }
    let (locale, dec_sep) = map_locale(&opts.locale);

    let (lo, hi) = min_max(boxes.iter().flat_map(|(_, s)| [s.min, s.max]));
    let (yscale, y_word) = choose_axis_scale(lo.abs().max(hi.abs()));
    let (y_lo, y_hi) = padded_range(lo / yscale, hi / yscale, false);

    let names: Vec<&str> = boxes.iter().map(|(name, _)| *name).collect();
    let mut chart = category_chart(root, kind, names.len(), y_lo, y_hi, y_word, locale, dec_sep)?;

    for (i, (_, s)) in boxes.iter().enumerate() {
        let x = i as f64;
        let color = office_color(i);
        let y = |v: f64| v / yscale;

        chart
            .draw_series([
                Rectangle::new(
                    [(x - BOX_HALF_WIDTH, y(s.q1)), (x + BOX_HALF_WIDTH, y(s.q3))],
                    color.mix(0.45).filled(),
                ),
                Rectangle::new(
                    [(x - BOX_HALF_WIDTH, y(s.q1)), (x + BOX_HALF_WIDTH, y(s.q3))],
                    color.stroke_width(1),
                ),
            ])
            .map_err(plot_err)?;

        let whisker_style = BLACK.stroke_width(1);
        chart
            .draw_series([
                PathElement::new(vec![(x, y(s.q3)), (x, y(s.upper_whisker))], whisker_style),
                PathElement::new(vec![(x, y(s.q1)), (x, y(s.lower_whisker))], whisker_style),
                PathElement::new(
                    vec![
                        (x - CAP_HALF_WIDTH, y(s.upper_whisker)),
                        (x + CAP_HALF_WIDTH, y(s.upper_whisker)),
                    ],
                    whisker_style,
                ),
                PathElement::new(
                    vec![
                        (x - CAP_HALF_WIDTH, y(s.lower_whisker)),
                        (x + CAP_HALF_WIDTH, y(s.lower_whisker)),
                    ],
                    whisker_style,
                ),
                PathElement::new(
                    vec![
                        (x - BOX_HALF_WIDTH, y(s.median)),
                        (x + BOX_HALF_WIDTH, y(s.median)),
                    ],
                    BLACK.stroke_width(2),
                ),
            ])
            .map_err(plot_err)?;

        chart
            .draw_series(
                s.outliers
                    .iter()
                    .map(|v| Circle::new((x, y(*v)), 3, BLACK.stroke_width(1))),
            )
            .map_err(plot_err)?;
    }

    draw_category_labels(root, &chart, &names, y_lo)
}

/// Vertical bars from zero with the value printed above each bar.
/// `precision` is the number of decimals of the value labels.
pub(crate) fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    bars: &[(String, f64)],
    precision: usize,
    opts: &ChartOptions,
) -> Result<()> {
    if bars.is_empty() {
        return draw_empty(root, kind);
    }
    let (locale, dec_sep) = map_locale(&opts.locale);

    let (lo, hi) = min_max(bars.iter().map(|(_, v)| *v));
    let (yscale, y_word) = choose_axis_scale(lo.abs().max(hi.abs()));
    let (y_lo, y_hi) = padded_range(lo / yscale, hi / yscale, true);

    let names: Vec<&str> = bars.iter().map(|(name, _)| name.as_str()).collect();
    let mut chart = category_chart(root, kind, names.len(), y_lo, y_hi, y_word, locale, dec_sep)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
            let x = i as f64;
            Rectangle::new(
                [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, v / yscale)],
                office_color(i).filled(),
            )
        }))
        .map_err(plot_err)?;

    let value_style = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
            Text::new(
                format_number(*v, precision, locale, dec_sep),
                (i as f64, v / yscale),
                value_style.clone(),
            )
        }))
        .map_err(plot_err)?;

    draw_category_labels(root, &chart, &names, y_lo)
}

/// Mesh for a categorical x axis: unit slots around each index, no x ticks.
#[allow(clippy::too_many_arguments)]
fn category_chart<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    kind: ChartKind,
    categories: usize,
    y_lo: f64,
    y_hi: f64,
    y_word: &str,
    locale: &Locale,
    dec_sep: char,
) -> Result<CategoryChart<'a, DB>> {
    root.fill(&WHITE).map_err(plot_err)?;
    let left_px = compute_left_label_area_px(y_lo, y_hi, Y_TICKS, TICK_FONT_PX, locale, dec_sep);
    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN as u32)
        .caption(kind.title(), (FontFamily::SansSerif, CAPTION_PX))
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, BOTTOM_LABEL_PX)
        .build_cartesian_2d(-0.5..(categories as f64 - 0.5), y_lo..y_hi)
        .map_err(plot_err)?;

    let (x_title, y_title) = kind.axis_titles();
    let fmt = |v: &f64| format_tick(*v, locale, dec_sep);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_labels(Y_TICKS)
        .y_label_formatter(&fmt)
        .x_desc(x_title)
        .y_desc(scaled_axis_title(y_title, y_word))
        .label_style((FontFamily::SansSerif, TICK_FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, DESC_FONT_PX))
        .draw()
        .map_err(plot_err)?;
    Ok(chart)
}

/// Category names centred under their slots, truncated to the slot width.
fn draw_category_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &CategoryChart<'_, DB>,
    labels: &[&str],
    y_base: f64,
) -> Result<()> {
    if labels.is_empty() {
        return Ok(());
    }
    let (x_range, _) = chart.plotting_area().get_pixel_range();
    let slot_px = ((x_range.end - x_range.start) / labels.len() as i32 - 4).max(12) as u32;
    let (base_x, base_y) = root.get_base_pixel();
    let style = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX))
        .pos(Pos::new(HPos::Center, VPos::Top));

    for (i, label) in labels.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64, y_base));
        let text = truncate_to_width(label, TICK_FONT_PX, slot_px);
        root.draw(&Text::new(
            text,
            (x - base_x, y - base_y + CATEGORY_LABEL_GAP),
            style.clone(),
        ))
        .map_err(plot_err)?;
    }
    Ok(())
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
