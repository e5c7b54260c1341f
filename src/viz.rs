//! Render the "new per day" chart to **SVG** or **PNG**.
//!
//! The chart is a filled line in the statistic's colour, without axis text, so it
//! renders without any font available. Titles and tick values belong to whoever
//! embeds the image.

use crate::models::{ChartPoint, StatKind};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::{AreaSeries, LineSeries};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

/// Parse `#RRGGBB` into a colour. Falls back to black on malformed input.
pub fn hex_color(hex: &str) -> RGBColor {
    let h = hex.trim_start_matches('#');
    let channel = |i: usize| {
        h.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    if h.len() != 6 {
        return RGBColor(0, 0, 0);
    }
    RGBColor(channel(0), channel(2), channel(4))
}

/// Draw `points` to `out_path`; the extension picks the backend (`.svg`, else PNG).
pub fn plot_series<P: AsRef<Path>>(
    points: &[ChartPoint],
    kind: StatKind,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if points.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    // Keep zero on screen so the fill has a baseline.
    let mut min_val = points.iter().map(|p| p.value).min().unwrap_or(0).min(0) as f64;
    let mut max_val = points.iter().map(|p| p.value).max().unwrap_or(0).max(0) as f64;
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }
    let headroom = (max_val - min_val) * 0.05;
    let y_range = (min_val - if min_val < 0.0 { headroom } else { 0.0 })..(max_val + headroom);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, points, kind, y_range)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, points, kind, y_range)?;
    }
    Ok(())
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    points: &[ChartPoint],
    kind: StatKind,
    y_range: std::ops::Range<f64>,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let x_max = (points.len().max(2) - 1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .build_cartesian_2d(0f64..x_max, y_range)
        .map_err(|e| anyhow!("{:?}", e))?;

    let color = hex_color(kind.color_hex());
    let series: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value as f64))
        .collect();

    chart
        .draw_series(AreaSeries::new(series.clone(), 0.0, color.mix(0.5)))
        .map_err(|e| anyhow!("{:?}", e))?;
    chart
        .draw_series(LineSeries::new(
            series,
            ShapeStyle {
                color: color.to_rgba(),
                filled: false,
                stroke_width: 2,
            },
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stat_colors() {
        assert_eq!(hex_color("#CC1034"), RGBColor(0xCC, 0x10, 0x34));
        assert_eq!(hex_color("#7dd71d"), RGBColor(0x7d, 0xd7, 0x1d));
        assert_eq!(hex_color("nope"), RGBColor(0, 0, 0));
    }
}
