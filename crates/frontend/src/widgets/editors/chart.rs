use contracts::shared::data_source::ColumnInfo;
use contracts::shared::widgets::{Aggregation, WidgetConfig};
use leptos::prelude::*;

use super::{patch, AggregationSelect, ColumnSelect};
use crate::widgets::metadata::{keep_if_offered, value_columns};

/// Bar/line: ось X, агрегат по оси Y и колонка значения (не нужна для COUNT)
#[component]
pub fn ChartEditor(
    #[prop(into)] config: Signal<WidgetConfig>,
    #[prop(into)] columns: Signal<Vec<ColumnInfo>>,
    on_change: Callback<WidgetConfig>,
) -> impl IntoView {
    let x_axis = Signal::derive(move || config.with(|c| c.x_axis.clone()));
    let aggregation = Signal::derive(move || config.with(|c| c.y_axis_aggregation));
    let y_column = Signal::derive(move || config.with(|c| c.y_axis_column.clone()));
    let offered = Signal::derive(move || value_columns(&columns.get(), aggregation.get()));

    let on_aggregation = Callback::new(move |value: Option<Aggregation>| {
        let all = columns.get_untracked();
        patch(config, on_change, |c| {
            c.y_axis_aggregation = value;
            c.y_axis_column = if value == Some(Aggregation::Count) {
                None
            } else {
                keep_if_offered(c.y_axis_column.take(), &value_columns(&all, value))
            };
        });
    });

    view! {
        <div class="details-grid--3col">
            <ColumnSelect
                label="Ось X"
                columns=columns
                value=x_axis
                on_select=Callback::new(move |v| patch(config, on_change, |c| c.x_axis = v))
            />
            <AggregationSelect label="Ось Y" value=aggregation on_select=on_aggregation />
            <Show
                when=move || aggregation.get() != Some(Aggregation::Count)
                fallback=|| view! { <div class="form__group text-muted">"COUNT(*) — колонка не нужна"</div> }
            >
                <ColumnSelect
                    label="Колонка Y"
                    columns=offered
                    value=y_column
                    on_select=Callback::new(move |v| patch(config, on_change, |c| c.y_axis_column = v))
                />
            </Show>
        </div>
    }
}
