use serde::{Deserialize, Serialize};

use super::config::{WidgetConfig, WidgetType};
use super::grid_layout::WidgetLayout;
use super::query_builder::build_widget_query;

/// Persisted widget, owned by a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub dashboard_id: String,
    pub widget_type: WidgetType,
    pub config: WidgetConfig,
    pub layout: WidgetLayout,
    /// SQL produced by the builder when the widget was last saved ("" if unbuildable)
    #[serde(default)]
    pub query: Option<String>,
}

impl Widget {
    /// Table the widget reads from
    pub fn table(&self) -> Option<&str> {
        self.config.table.as_deref().filter(|t| !t.is_empty())
    }

    /// Query for the current config; empty when the config is incomplete
    pub fn current_query(&self) -> String {
        match self.table() {
            Some(table) => build_widget_query(self.widget_type.as_str(), table, &self.config),
            None => String::new(),
        }
    }

    pub fn title(&self) -> String {
        self.config.display_title(self.widget_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::widgets::Aggregation;

    #[test]
    fn current_query_follows_config() {
        let mut widget = Widget {
            id: "w1".into(),
            dashboard_id: "d1".into(),
            widget_type: WidgetType::Kpi,
            config: WidgetConfig {
                column: Some("monto".into()),
                aggregation: Some(Aggregation::Sum),
                ..Default::default()
            },
            layout: WidgetLayout::default(),
            query: None,
        };
        assert_eq!(widget.current_query(), "");

        widget.config.table = Some("ventas".into());
        assert_eq!(
            widget.current_query(),
            r#"SELECT SUM("monto") FROM "be_exponential"."ventas""#
        );
    }

    #[test]
    fn widget_json_shape() {
        let json = r#"{
            "id": "w1",
            "dashboard_id": "d1",
            "widget_type": "donut_chart",
            "config": {"table": "ventas", "category": "region", "value": "monto", "title": "Por región"},
            "layout": {"x": 0, "y": 2, "w": 4, "h": 4}
        }"#;
        let widget: Widget = serde_json::from_str(json).unwrap();
        assert_eq!(widget.widget_type, WidgetType::DonutChart);
        assert_eq!(widget.layout.y, 2);
        assert_eq!(widget.query, None);
        assert_eq!(widget.title(), "Por región");
    }
}
