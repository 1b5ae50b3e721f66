//! Dashboard entity and the dashboard/widget RPC contracts

use serde::{Deserialize, Serialize};

use super::widgets::{Widget, WidgetConfig, WidgetLayout};

/// Dashboard with all of its widgets, loaded wholesale per page view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_user_id: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
    pub created_at: String,
    pub updated_at: String,
}

impl Dashboard {
    pub fn layouts(&self) -> Vec<WidgetLayout> {
        self.widgets.iter().map(|w| w.layout).collect()
    }
}

/// Row of the dashboards list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub widget_count: i64,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDashboardRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDashboardRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// RPC bodies
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDashboardDetailsRequest {
    pub p_dashboard_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertWidgetRequest {
    pub p_dashboard_id: String,
    pub p_widget_type: String,
    #[serde(default)]
    pub p_config: WidgetConfig,
    /// Placed at the first free grid slot when absent
    #[serde(default)]
    pub p_layout: Option<WidgetLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWidgetRequest {
    pub p_widget_id: String,
    #[serde(default)]
    pub p_config: Option<WidgetConfig>,
    #[serde(default)]
    pub p_layout: Option<WidgetLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteWidgetRequest {
    pub p_widget_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_widget_body_defaults() {
        let req: InsertWidgetRequest = serde_json::from_str(
            r#"{"p_dashboard_id": "d1", "p_widget_type": "kpi"}"#,
        )
        .unwrap();
        assert_eq!(req.p_config, WidgetConfig::default());
        assert!(req.p_layout.is_none());
    }

    #[test]
    fn update_widget_body_partial() {
        let req: UpdateWidgetRequest = serde_json::from_str(
            r#"{"p_widget_id": "w1", "p_layout": {"x": 1, "y": 2, "w": 3, "h": 4}}"#,
        )
        .unwrap();
        assert!(req.p_config.is_none());
        assert_eq!(req.p_layout, Some(WidgetLayout { x: 1, y: 2, w: 3, h: 4 }));
    }
}
