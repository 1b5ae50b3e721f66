use contracts::shared::data_source::QueryRows;
use contracts::shared::widgets::{gauge_fraction, scalar, WidgetConfig};
use leptos::prelude::*;

use super::geometry::{gauge_arc, palette_color};
use crate::shared::format::{format_percent, format_value};

pub const DEFAULT_MIN: f64 = 0.0;
pub const DEFAULT_MAX: f64 = 100.0;

pub fn gauge_range(config: &WidgetConfig) -> (f64, f64) {
    (
        config.min.unwrap_or(DEFAULT_MIN),
        config.max.unwrap_or(DEFAULT_MAX),
    )
}

#[component]
pub fn GaugeView(rows: QueryRows, config: WidgetConfig) -> impl IntoView {
    let (min, max) = gauge_range(&config);
    let value = scalar(&rows);
    let fraction = value.map(|v| gauge_fraction(v, min, max)).unwrap_or(0.0);
    let color = config
        .color
        .clone()
        .unwrap_or_else(|| palette_color(0).to_string());

    view! {
        <div class="gauge">
            <svg viewBox="0 0 200 110" class="gauge__svg">
                <path d="M 20 100 A 80 80 0 0 1 180 100" class="gauge__track" fill="none" stroke-width="16" />
                <path d=gauge_arc(fraction) fill="none" stroke=color stroke-width="16" />
            </svg>
            <div class="gauge__value">
                {value.map(format_value).unwrap_or_else(|| "—".to_string())}
            </div>
            <div class="gauge__range">
                <span>{format_value(min)}</span>
                <span>{format_percent(fraction * 100.0)}</span>
                <span>{format_value(max)}</span>
            </div>
        </div>
    }
}
