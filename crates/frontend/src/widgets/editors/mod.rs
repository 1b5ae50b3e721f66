//! Редакторы конфигурации виджетов.
//!
//! Каждый редактор получает текущий черновик `WidgetConfig` и колонки
//! выбранной таблицы, а изменения отдаёт целиком через `on_change`.

pub mod aggregate;
pub mod chart;
pub mod columns;
pub mod donut;

use contracts::shared::data_source::ColumnInfo;
use contracts::shared::widgets::{Aggregation, WidgetConfig, WidgetType};
use leptos::prelude::*;

/// Apply `edit` to a copy of the current config and publish it
pub fn patch(
    config: Signal<WidgetConfig>,
    on_change: Callback<WidgetConfig>,
    edit: impl FnOnce(&mut WidgetConfig),
) {
    let mut next = config.get_untracked();
    edit(&mut next);
    on_change.run(next);
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Native select over column names; "" means nothing selected
#[component]
pub fn ColumnSelect(
    label: &'static str,
    #[prop(into)] columns: Signal<Vec<ColumnInfo>>,
    #[prop(into)] value: Signal<Option<String>>,
    on_select: Callback<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <select
                class="form__select"
                prop:value=move || value.get().unwrap_or_default()
                on:change=move |ev| on_select.run(non_empty(event_target_value(&ev)))
            >
                <option value="">"— выберите колонку —"</option>
                {move || {
                    let current = value.get();
                    columns
                        .get()
                        .into_iter()
                        .map(|c| {
                            let selected = current.as_deref() == Some(c.column_name.as_str());
                            view! {
                                <option value=c.column_name.clone() selected=selected>
                                    {format!("{} ({})", c.column_name, c.data_type)}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

#[component]
pub fn AggregationSelect(
    label: &'static str,
    #[prop(into)] value: Signal<Option<Aggregation>>,
    on_select: Callback<Option<Aggregation>>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <select
                class="form__select"
                prop:value=move || value.get().map(|a| a.to_sql()).unwrap_or_default()
                on:change=move |ev| on_select.run(Aggregation::parse(&event_target_value(&ev)))
            >
                <option value="">"— агрегат —"</option>
                {Aggregation::ALL
                    .into_iter()
                    .map(|a| {
                        let selected = move || value.get() == Some(a);
                        view! { <option value=a.to_sql() selected=selected>{a.to_sql()}</option> }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

/// Редактор для типа виджета
#[component]
pub fn WidgetEditor(
    #[prop(into)] widget_type: Signal<WidgetType>,
    #[prop(into)] config: Signal<WidgetConfig>,
    #[prop(into)] columns: Signal<Vec<ColumnInfo>>,
    on_change: Callback<WidgetConfig>,
) -> impl IntoView {
    move || match widget_type.get() {
        WidgetType::DataTable => view! {
            <columns::TableColumnsEditor config=config columns=columns on_change=on_change />
        }
        .into_any(),
        WidgetType::Kpi => view! {
            <aggregate::AggregateEditor config=config columns=columns on_change=on_change with_range=false />
        }
        .into_any(),
        WidgetType::Gauge => view! {
            <aggregate::AggregateEditor config=config columns=columns on_change=on_change with_range=true />
        }
        .into_any(),
        WidgetType::DonutChart => view! {
            <donut::DonutEditor config=config columns=columns on_change=on_change />
        }
        .into_any(),
        WidgetType::BarChart | WidgetType::LineChart => view! {
            <chart::ChartEditor config=config columns=columns on_change=on_change />
        }
        .into_any(),
    }
}
