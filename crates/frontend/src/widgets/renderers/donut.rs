use contracts::shared::data_source::QueryRows;
use contracts::shared::widgets::donut;
use leptos::prelude::*;

use super::geometry::{arc_path, donut_segments, palette_color};
use crate::shared::format::{format_percent, format_value};

#[component]
pub fn DonutView(rows: QueryRows) -> impl IntoView {
    let Some(data) = donut(&rows) else {
        return view! { <div class="widget__message">"Ожидалось две колонки"</div> }.into_any();
    };

    let percentages = data.percentages();
    let segments = donut_segments(&percentages);

    let arcs = segments
        .iter()
        .enumerate()
        .filter(|(_, (start, end))| end > start)
        .map(|(i, (start, end))| {
            view! { <path d=arc_path(50.0, 50.0, 45.0, 28.0, *start, *end) fill=palette_color(i) /> }
        })
        .collect_view();

    let legend = data
        .slices
        .iter()
        .zip(percentages.iter())
        .enumerate()
        .map(|(i, (slice, pct))| {
            let swatch = format!("background: {};", palette_color(i));
            view! {
                <li class="donut__legend-item">
                    <span class="donut__swatch" style=swatch></span>
                    <span class="donut__name">{slice.label.clone()}</span>
                    <span class="donut__value">
                        {format!("{} ({})", format_value(slice.value), format_percent(*pct))}
                    </span>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="donut">
            <svg viewBox="0 0 100 100" class="donut__svg">{arcs}</svg>
            <div class="donut__legend">
                <div class="donut__legend-header">
                    <span>{data.name_key.clone()}</span>
                    <span>{data.value_key.clone()}</span>
                </div>
                <ul>{legend}</ul>
                <div class="donut__total">{format!("Σ {}", format_value(data.total()))}</div>
            </div>
        </div>
    }
    .into_any()
}
