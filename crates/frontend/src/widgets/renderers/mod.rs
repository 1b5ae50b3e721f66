//! Отрисовка виджетов: конфигурация → SQL → `execute_query` → представление.
//!
//! Каждый рендерер держит свой счётчик запросов, так что медленный ответ
//! на старую конфигурацию не перетирает более новый.

pub mod chart;
pub mod donut;
pub mod gauge;
pub mod geometry;
pub mod kpi;
pub mod table;

use contracts::shared::widgets::{build_widget_query, WidgetConfig, WidgetType};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::state::RenderState;
use crate::shared::request_generation::RequestGeneration;
use crate::shared::rpc;

/// SQL for the draft; "" when the table is not chosen or the config is incomplete
pub fn query_for(widget_type: WidgetType, config: &WidgetConfig) -> String {
    match config.table.as_deref() {
        Some(table) => build_widget_query(widget_type.as_str(), table, config),
        None => String::new(),
    }
}

#[component]
pub fn WidgetRenderer(
    #[prop(into)] widget_type: Signal<WidgetType>,
    #[prop(into)] config: Signal<WidgetConfig>,
    /// Incrementing it re-runs the query
    #[prop(optional, into)]
    refresh: Signal<u32>,
) -> impl IntoView {
    let state = RwSignal::new(RenderState::NotConfigured);
    let generation = RequestGeneration::new();

    let query = Memo::new(move |_| config.with(|c| query_for(widget_type.get(), c)));

    Effect::new(move |_| {
        refresh.track();
        let sql = query.get();

        if sql.is_empty() {
            generation.invalidate();
            state.set(RenderState::NotConfigured);
            return;
        }

        let ticket = generation.next();
        state.set(RenderState::Loading);
        spawn_local(async move {
            let result = rpc::execute_query(sql).await;
            if generation.is_current(ticket) {
                state.set(RenderState::from_result(result));
            } else {
                log::debug!("Dropped stale result for request {}", ticket);
            }
        });
    });

    move || match state.get() {
        RenderState::NotConfigured => view! {
            <div class="widget__message">"Виджет не настроен"</div>
        }
        .into_any(),
        RenderState::Loading => view! {
            <div class="widget__message"><Spinner /></div>
        }
        .into_any(),
        RenderState::Error(e) => view! {
            <div class="widget__message widget__message--error">{e}</div>
        }
        .into_any(),
        RenderState::NoData => view! {
            <div class="widget__message">"Нет данных"</div>
        }
        .into_any(),
        RenderState::Ready(rows) => {
            let config = config.get();
            match widget_type.get() {
                WidgetType::Kpi => view! { <kpi::KpiView rows=rows config=config /> }.into_any(),
                WidgetType::Gauge => view! { <gauge::GaugeView rows=rows config=config /> }.into_any(),
                WidgetType::BarChart => {
                    view! { <chart::ChartView rows=rows config=config line=false /> }.into_any()
                }
                WidgetType::LineChart => {
                    view! { <chart::ChartView rows=rows config=config line=true /> }.into_any()
                }
                WidgetType::DonutChart => view! { <donut::DonutView rows=rows /> }.into_any(),
                WidgetType::DataTable => view! { <table::TableView rows=rows /> }.into_any(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::widgets::Aggregation;

    #[test]
    fn no_query_without_table_or_fields() {
        let mut config = WidgetConfig {
            x_axis: Some("region".into()),
            y_axis_aggregation: Some(Aggregation::Count),
            ..Default::default()
        };
        assert_eq!(query_for(WidgetType::BarChart, &config), "");

        config.table = Some("ventas".into());
        assert!(query_for(WidgetType::BarChart, &config).starts_with("SELECT \"region\", COUNT(*)"));
        assert_eq!(query_for(WidgetType::DonutChart, &config), "");
    }
}
