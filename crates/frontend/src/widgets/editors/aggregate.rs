use contracts::shared::data_source::ColumnInfo;
use contracts::shared::widgets::WidgetConfig;
use leptos::prelude::*;

use super::{patch, AggregationSelect, ColumnSelect};
use crate::widgets::metadata::{keep_if_offered, value_columns};

/// Parse an optional number field; empty or invalid input clears it
pub fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// KPI и gauge: агрегат + колонка (+ диапазон для gauge)
#[component]
pub fn AggregateEditor(
    #[prop(into)] config: Signal<WidgetConfig>,
    #[prop(into)] columns: Signal<Vec<ColumnInfo>>,
    on_change: Callback<WidgetConfig>,
    with_range: bool,
) -> impl IntoView {
    let aggregation = Signal::derive(move || config.with(|c| c.aggregation));
    let column = Signal::derive(move || config.with(|c| c.column.clone()));
    let offered = Signal::derive(move || value_columns(&columns.get(), aggregation.get()));

    let on_aggregation = Callback::new(move |value| {
        let all = columns.get_untracked();
        patch(config, on_change, |c| {
            c.aggregation = value;
            c.column = keep_if_offered(c.column.take(), &value_columns(&all, value));
        });
    });

    let on_column = Callback::new(move |value| patch(config, on_change, |c| c.column = value));

    let range = with_range.then(|| {
        let bound_input = move |label: &'static str, is_max: bool| {
            let current = move || {
                config
                    .with(|c| if is_max { c.max } else { c.min })
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            };
            view! {
                <div class="form__group">
                    <label class="form__label">{label}</label>
                    <input
                        type="number"
                        class="form__input"
                        prop:value=current
                        on:change=move |ev| {
                            let value = parse_bound(&event_target_value(&ev));
                            patch(config, on_change, |c| {
                                if is_max { c.max = value } else { c.min = value }
                            });
                        }
                    />
                </div>
            }
        };
        view! {
            <div class="details-grid--2col">
                {bound_input("Минимум (по умолчанию 0)", false)}
                {bound_input("Максимум (по умолчанию 100)", true)}
            </div>
        }
    });

    view! {
        <div class="details-grid--2col">
            <AggregationSelect label="Агрегат" value=aggregation on_select=on_aggregation />
            <ColumnSelect label="Колонка" columns=offered value=column on_select=on_column />
        </div>
        {range}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bounds() {
        assert_eq!(parse_bound("100"), Some(100.0));
        assert_eq!(parse_bound(" 12,5 "), Some(12.5));
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("abc"), None);
    }
}
