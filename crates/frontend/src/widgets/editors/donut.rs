use contracts::shared::data_source::ColumnInfo;
use contracts::shared::widgets::WidgetConfig;
use leptos::prelude::*;

use super::{patch, ColumnSelect};

/// Donut: колонка категорий и числовая колонка значений (SUM по категории)
#[component]
pub fn DonutEditor(
    #[prop(into)] config: Signal<WidgetConfig>,
    #[prop(into)] columns: Signal<Vec<ColumnInfo>>,
    on_change: Callback<WidgetConfig>,
) -> impl IntoView {
    let category = Signal::derive(move || config.with(|c| c.category.clone()));
    let value = Signal::derive(move || config.with(|c| c.value.clone()));
    let numeric = Signal::derive(move || {
        columns
            .get()
            .into_iter()
            .filter(ColumnInfo::is_numeric)
            .collect::<Vec<_>>()
    });

    view! {
        <div class="details-grid--2col">
            <ColumnSelect
                label="Категория"
                columns=columns
                value=category
                on_select=Callback::new(move |v| patch(config, on_change, |c| c.category = v))
            />
            <ColumnSelect
                label="Значение (SUM)"
                columns=numeric
                value=value
                on_select=Callback::new(move |v| patch(config, on_change, |c| c.value = v))
            />
        </div>
    }
}
