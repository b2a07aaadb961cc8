use base64::{engine::general_purpose, Engine as _};
use chrono::Duration;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{Error, Result};
use crate::pipeline::MergedSeries;

/// Everything cosmetic about the rendered chart. The near-duplicate
/// styling variants of the dashboard collapse into this one struct;
/// the pipeline itself never branches on style.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    /// One color per category, in canonical category order.
    pub palette: Vec<RGBColor>,
    pub index_color: RGBColor,
    pub index_label: String,
    pub left_axis_label: String,
    pub right_axis_label: String,
    /// Snap the right axis outward to multiples of this step.
    pub right_axis_step: f64,
    /// Show roughly one x tick label per this many rows, as dd/mm.
    pub x_tick_step: usize,
    pub watermark: Option<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            background: RGBColor(0x11, 0x18, 0x27),
            palette: vec![
                RGBColor(0x3b, 0x82, 0xf6),
                RGBColor(0xf9, 0x73, 0x16),
                RGBColor(0x22, 0xc5, 0x5e),
                RGBColor(0x06, 0xb6, 0xd4),
                RGBColor(0xa8, 0x55, 0xf7),
            ],
            index_color: WHITE,
            index_label: "Ibovespa".to_string(),
            left_axis_label: "Acumulado (R$ bilhões)".to_string(),
            right_axis_label: "Ibovespa (pts)".to_string(),
            right_axis_step: 2500.0,
            x_tick_step: 7,
            watermark: None,
        }
    }
}

/// Renders the dual-axis chart (cumulative flow left, index level
/// right) into an in-memory PNG and returns it base64 encoded, ready
/// to embed in an `<img>` data URI.
pub fn render_chart(series: &MergedSeries, style: &ChartStyle) -> Result<String> {
    if series.rows.is_empty() {
        return Err(Error::Chart("nothing to plot".to_string()));
    }

    let first = series.rows[0].date;
    let mut last = series.rows[series.rows.len() - 1].date;
    if last == first {
        last = last + Duration::days(1);
    }

    let (flow_min, flow_max) = flow_bounds(series);
    let (idx_min, idx_max) = index_bounds(series, style.right_axis_step);

    let mut rgb = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut rgb, (style.width, style.height)).into_drawing_area();
        root.fill(&style.background).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(75)
            .right_y_label_area_size(75)
            .build_cartesian_2d(first..last, flow_min..flow_max)
            .map_err(chart_err)?
            .set_secondary_coord(first..last, idx_min..idx_max);

        let x_labels = series
            .rows
            .len()
            .div_ceil(style.x_tick_step.max(1))
            .max(2);
        chart
            .configure_mesh()
            .light_line_style(&WHITE.mix(0.08))
            .bold_line_style(&WHITE.mix(0.15))
            .axis_style(&WHITE.mix(0.5))
            .label_style(("sans-serif", 16).into_font().color(&WHITE))
            .x_labels(x_labels)
            .x_label_formatter(&|d| d.format("%d/%m").to_string())
            .y_desc(style.left_axis_label.as_str())
            .draw()
            .map_err(chart_err)?;

        let idx_labels = ((idx_max - idx_min) / style.right_axis_step).round() as usize + 1;
        chart
            .configure_secondary_axes()
            .axis_style(&WHITE.mix(0.5))
            .label_style(("sans-serif", 16).into_font().color(&WHITE))
            .y_labels(idx_labels)
            .y_label_formatter(&|v| thousands_dotted(*v))
            .y_desc(style.right_axis_label.as_str())
            .draw()
            .map_err(chart_err)?;

        for (i, cat) in series.categories.iter().enumerate() {
            let color = style.palette[i % style.palette.len()];
            chart
                .draw_series(LineSeries::new(
                    series.rows.iter().map(|r| (r.date, r.cumulative[i])),
                    color.stroke_width(3),
                ))
                .map_err(chart_err)?
                .label(cat.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(3))
                });
        }

        let index_color = style.index_color;
        chart
            .draw_secondary_series(DashedLineSeries::new(
                series
                    .rows
                    .iter()
                    .filter_map(|r| r.index_close.map(|c| (r.date, c))),
                6,
                4,
                index_color.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label(style.index_label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], index_color.stroke_width(2))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&style.background.mix(0.8))
            .border_style(&WHITE.mix(0.4))
            .label_font(("sans-serif", 18).into_font().color(&WHITE))
            .draw()
            .map_err(chart_err)?;

        if let Some(text) = &style.watermark {
            let font = ("sans-serif", 120)
                .into_font()
                .color(&WHITE.mix(0.07))
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw_text(
                text,
                &font,
                ((style.width / 2) as i32, (style.height / 2) as i32),
            )
            .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)?;
    }

    let png = encode_png(style.width, style.height, rgb)?;
    Ok(general_purpose::STANDARD.encode(png))
}

fn encode_png(width: u32, height: u32, rgb: Vec<u8>) -> Result<Vec<u8>> {
    let img = image::RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| Error::Chart("pixel buffer size mismatch".to_string()))?;
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| Error::Chart(e.to_string()))?;
    Ok(png)
}

fn flow_bounds(series: &MergedSeries) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in &series.rows {
        for v in &row.cumulative {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(0.1);
    (min - pad, max + pad)
}

/// Right-axis bounds snapped outward to multiples of `step`, the way
/// the dashboard has always drawn the index axis.
fn index_bounds(series: &MergedSeries, step: f64) -> (f64, f64) {
    let closes: Vec<f64> = series.rows.iter().filter_map(|r| r.index_close).collect();
    let (min, max) = match (
        closes.iter().cloned().reduce(f64::min),
        closes.iter().cloned().reduce(f64::max),
    ) {
        (Some(min), Some(max)) => (min, max),
        _ => return (0.0, 1.0),
    };
    snap_bounds(min, max, step)
}

fn snap_bounds(min: f64, max: f64, step: f64) -> (f64, f64) {
    let lo = (min / step).floor() * step;
    let hi = (max / step).floor() * step + step;
    (lo, hi)
}

fn thousands_dotted(v: f64) -> String {
    let n = v.round() as i64;
    let digits = n.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

fn chart_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Chart(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_bounds_to_step() {
        assert_eq!(snap_bounds(72_103.0, 72_103.0, 2500.0), (70_000.0, 72_500.0));
        assert_eq!(snap_bounds(118_300.0, 134_800.0, 2500.0), (117_500.0, 135_000.0));
    }

    #[test]
    fn test_thousands_dotted() {
        assert_eq!(thousands_dotted(134_925.4), "134.925");
        assert_eq!(thousands_dotted(950.0), "950");
        assert_eq!(thousands_dotted(-12_500.0), "-12.500");
    }
}
