//! SVG-геометрия графиков (чистые функции, координаты в единицах viewBox)

use contracts::shared::widgets::{series_max, SeriesPoint};
use std::f64::consts::PI;

pub const PALETTE: [&str; 8] = [
    "#2563eb", "#16a34a", "#f59e0b", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Bars bottom-aligned in a `width`×`height` box; negative values are drawn as empty bars
pub fn bar_layout(points: &[SeriesPoint], width: f64, height: f64) -> Vec<Bar> {
    if points.is_empty() {
        return Vec::new();
    }
    let max = series_max(points);
    let slot = width / points.len() as f64;
    let bar_width = slot * 0.7;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let h = (p.value.max(0.0) / max) * height;
            Bar {
                x: i as f64 * slot + (slot - bar_width) / 2.0,
                y: height - h,
                width: bar_width,
                height: h,
            }
        })
        .collect()
}

/// `points` attribute of an SVG polyline; x spread evenly, y scaled to the max
pub fn line_points(points: &[SeriesPoint], width: f64, height: f64) -> String {
    let max = series_max(points);
    let step = if points.len() > 1 {
        width / (points.len() - 1) as f64
    } else {
        0.0
    };

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = if points.len() > 1 { i as f64 * step } else { width / 2.0 };
            let y = height - (p.value.max(0.0) / max) * height;
            format!("{:.2},{:.2}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn polar(cx: f64, cy: f64, r: f64, fraction: f64) -> (f64, f64) {
    // 0.0 = 12 часов, по часовой стрелке
    let angle = fraction * 2.0 * PI - PI / 2.0;
    (cx + r * angle.cos(), cy + r * angle.sin())
}

/// Donut segment between `start` and `end` (fractions of the full circle)
pub fn arc_path(cx: f64, cy: f64, outer: f64, inner: f64, start: f64, end: f64) -> String {
    let end = end.min(start + 0.9999);
    let large = if end - start > 0.5 { 1 } else { 0 };

    let (x0, y0) = polar(cx, cy, outer, start);
    let (x1, y1) = polar(cx, cy, outer, end);
    let (x2, y2) = polar(cx, cy, inner, end);
    let (x3, y3) = polar(cx, cy, inner, start);

    format!(
        "M {:.2} {:.2} A {outer} {outer} 0 {large} 1 {:.2} {:.2} L {:.2} {:.2} A {inner} {inner} 0 {large} 0 {:.2} {:.2} Z",
        x0, y0, x1, y1, x2, y2, x3, y3
    )
}

/// Start/end fractions of each slice from percentages
pub fn donut_segments(percentages: &[f64]) -> Vec<(f64, f64)> {
    let mut start = 0.0;
    percentages
        .iter()
        .map(|p| {
            let end = start + p / 100.0;
            let segment = (start, end);
            start = end;
            segment
        })
        .collect()
}

/// Gauge value arc over the upper half circle (viewBox 0 0 200 110, center 100,100, r 80)
pub fn gauge_arc(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction <= 0.0 {
        return String::new();
    }
    let angle = PI + fraction * PI;
    let x = 100.0 + 80.0 * angle.cos();
    let y = 100.0 + 80.0 * angle.sin();
    format!("M 20 100 A 80 80 0 0 1 {:.2} {:.2}", x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint {
                label: format!("p{i}"),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let bars = bar_layout(&pts(&[50.0, 100.0, -5.0]), 300.0, 200.0);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[1].height, 200.0);
        assert_eq!(bars[1].y, 0.0);
        assert_eq!(bars[0].height, 100.0);
        assert_eq!(bars[2].height, 0.0);
        assert!(bars[0].x + bars[0].width <= bars[1].x);
    }

    #[test]
    fn line_points_span_width() {
        assert_eq!(line_points(&pts(&[0.0, 10.0]), 100.0, 50.0), "0.00,50.00 100.00,0.00");
        assert_eq!(line_points(&pts(&[4.0]), 100.0, 50.0), "50.00,0.00");
        assert_eq!(line_points(&[], 100.0, 50.0), "");
    }

    #[test]
    fn donut_segments_are_contiguous() {
        let segments = donut_segments(&[25.0, 25.0, 50.0]);
        assert_eq!(segments, vec![(0.0, 0.25), (0.25, 0.5), (0.5, 1.0)]);
    }

    #[test]
    fn arc_starts_at_twelve_o_clock() {
        let path = arc_path(50.0, 50.0, 40.0, 25.0, 0.0, 0.25);
        assert!(path.starts_with("M 50.00 10.00 A 40 40 0 0 1 90.00 50.00"), "{path}");
        let large = arc_path(50.0, 50.0, 40.0, 25.0, 0.0, 0.75);
        assert!(large.contains(" 0 1 1 "), "{large}");
    }

    #[test]
    fn gauge_arc_ends() {
        assert_eq!(gauge_arc(0.0), "");
        assert_eq!(gauge_arc(1.0), "M 20 100 A 80 80 0 0 1 180.00 100.00");
        assert_eq!(gauge_arc(0.5), "M 20 100 A 80 80 0 0 1 100.00 20.00");
    }
}
