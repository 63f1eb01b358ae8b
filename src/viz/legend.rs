//! Legend layout and drawing for the external legend panel of the scatter chart.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width, wrap_text_to_width};
use super::types::LegendMode;

const FONT_PX: u32 = 14;
const LINE_H: i32 = FONT_PX as i32 + 2;
const ROW_GAP: i32 = 4;
const PAD_BAND: i32 = 8;
const MARKER_RADIUS: i32 = 4;
const MARKER_TO_TEXT_GAP: i32 = 12;
const TRAILING_GAP: i32 = 12;

/// One bottom-band row: (label index, text as drawn, x of the text column).
type BandRow = Vec<(usize, String, i32)>;

/// Greedy flow of labels into rows starting at `start_x`. Labels wider than
/// 35% of the band are truncated. Shared by the estimator and the drawer.
fn flow_rows(labels: &[String], start_x: i32, total_w: i32) -> Vec<BandRow> {
    let usable_w = (total_w - PAD_BAND).max(start_x + 60);
    let cap = (((usable_w - start_x) as f32) * 0.35).max(80.0) as u32;

    let mut rows: Vec<BandRow> = Vec::new();
    let mut cur: BandRow = Vec::new();
    let mut x = start_x;
    for (i, label) in labels.iter().enumerate() {
        let text = truncate_to_width(label, FONT_PX, cap);
        let block_w = MARKER_TO_TEXT_GAP
            + MARKER_RADIUS
            + estimate_text_width_px(&text, FONT_PX) as i32
            + TRAILING_GAP;
        if x + block_w > usable_w && !cur.is_empty() {
            rows.push(std::mem::take(&mut cur));
            x = start_x;
        }
        cur.push((i, text, x + MARKER_TO_TEXT_GAP));
        x += block_w;
    }
    if !cur.is_empty() {
        rows.push(cur);
    }
    rows
}

/// Height in pixels the bottom legend band needs to fit all labels.
pub fn estimate_bottom_legend_height_px(labels: &[String], start_x: i32, total_w: i32) -> i32 {
    let rows = flow_rows(labels, start_x, total_w).len() as i32;
    PAD_BAND * 2 + rows * LINE_H + (rows - 1).max(0) * ROW_GAP
}

/// Draw the legend panel: `Right` is a single wrapped column, `Bottom` a multi-row band
/// whose first column aligns with the plot's x-axis start. `Inside` draws nothing here.
pub fn draw_legend_panel<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    placement: LegendMode,
    axis_x_start_px: i32,
) -> Result<()> {
    legend_area
        .fill(&WHITE)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let (w_u32, _) = legend_area.dim_in_pixel();
    let w = w_u32 as i32;
    let label_style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    match placement {
        LegendMode::Right => {
            let pad_x: i32 = 6;
            let text_x = pad_x + 24;
            let max_text_w = (w - text_x - pad_x).max(40) as u32;
            let mut y = PAD_BAND + 6;

            for (label, color) in items {
                let lines = wrap_text_to_width(label, FONT_PX, max_text_w);
                let block_h = (lines.len().max(1) as i32) * LINE_H;

                legend_area
                    .draw(&Circle::new(
                        (pad_x + 12, y + block_h / 2),
                        MARKER_RADIUS,
                        color.filled(),
                    ))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                for (i, line) in lines.iter().enumerate() {
                    let line_center_y = y + (i as i32) * LINE_H + LINE_H / 2;
                    legend_area
                        .draw(&Text::new(
                            line.as_str(),
                            (text_x, line_center_y),
                            label_style.clone(),
                        ))
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                }
                y += block_h + ROW_GAP;
            }
        }
        LegendMode::Bottom => {
            let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();
            let mut y_center = PAD_BAND + LINE_H / 2;
            for row in flow_rows(&labels, axis_x_start_px, w) {
                for (idx, text, text_x) in row {
                    let color = items[idx].1;
                    legend_area
                        .draw(&Circle::new(
                            ((text_x - MARKER_TO_TEXT_GAP).max(0), y_center),
                            MARKER_RADIUS,
                            color.filled(),
                        ))
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                    legend_area
                        .draw(&Text::new(text, (text_x, y_center), label_style.clone()))
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                }
                y_center += LINE_H + ROW_GAP;
            }
        }
        LegendMode::Inside => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_labels_need_more_rows() {
        let few = vec!["haircare".to_string(), "skincare".to_string()];
        let many: Vec<String> = (0..30).map(|i| format!("Product type {i}")).collect();
        let h_few = estimate_bottom_legend_height_px(&few, 60, 800);
        let h_many = estimate_bottom_legend_height_px(&many, 60, 800);
        assert_eq!(h_few, PAD_BAND * 2 + LINE_H);
        assert!(h_many > h_few);
    }
}
