use contracts::shared::data_source::QueryRows;
use contracts::shared::widgets::{scalar, WidgetConfig};
use leptos::prelude::*;

use crate::shared::format::format_value;

/// Caption under the KPI value, e.g. `SUM(monto)`
pub fn kpi_caption(config: &WidgetConfig) -> String {
    match (config.aggregation, config.column.as_deref()) {
        (Some(a), Some(c)) => format!("{}({})", a.to_sql(), c),
        _ => String::new(),
    }
}

#[component]
pub fn KpiView(rows: QueryRows, config: WidgetConfig) -> impl IntoView {
    let value = scalar(&rows).map(format_value).unwrap_or_else(|| "—".to_string());
    let style = config
        .color
        .as_ref()
        .map(|c| format!("color: {};", c))
        .unwrap_or_default();

    view! {
        <div class="kpi">
            <div class="kpi__value" style=style>{value}</div>
            <div class="kpi__caption">{kpi_caption(&config)}</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::widgets::Aggregation;

    #[test]
    fn caption_shows_aggregate_expression() {
        let config = WidgetConfig {
            aggregation: Some(Aggregation::Avg),
            column: Some("monto".into()),
            ..Default::default()
        };
        assert_eq!(kpi_caption(&config), "AVG(monto)");
        assert_eq!(kpi_caption(&WidgetConfig::default()), "");
    }
}
