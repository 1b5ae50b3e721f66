use contracts::shared::data_source::QueryRows;
use contracts::shared::widgets::{series, WidgetConfig};
use leptos::prelude::*;

use super::geometry::{bar_layout, line_points, palette_color};
use crate::shared::format::format_value;

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 200.0;

/// Bar or line chart: column 0 is the label, column 1 the value
#[component]
pub fn ChartView(rows: QueryRows, config: WidgetConfig, line: bool) -> impl IntoView {
    let points = series(&rows);
    let color = config
        .color
        .clone()
        .unwrap_or_else(|| palette_color(0).to_string());
    let view_box = format!("0 0 {} {}", WIDTH, HEIGHT);

    let shapes = if line {
        let coords = line_points(&points, WIDTH, HEIGHT);
        view! {
            <polyline points=coords fill="none" stroke=color stroke-width="2" />
        }
        .into_any()
    } else {
        bar_layout(&points, WIDTH, HEIGHT)
            .into_iter()
            .zip(points.iter())
            .map(|(bar, p)| {
                let tooltip = format!("{}: {}", p.label, format_value(p.value));
                view! {
                    <rect x=bar.x y=bar.y width=bar.width height=bar.height fill=color.clone()>
                        <title>{tooltip}</title>
                    </rect>
                }
            })
            .collect_view()
            .into_any()
    };

    let labels = points
        .iter()
        .map(|p| view! { <span class="chart__label" title=p.label.clone()>{p.label.clone()}</span> })
        .collect_view();

    view! {
        <div class="chart">
            <svg viewBox=view_box preserveAspectRatio="none" class="chart__svg">
                {shapes}
            </svg>
            <div class="chart__labels">{labels}</div>
        </div>
    }
}
