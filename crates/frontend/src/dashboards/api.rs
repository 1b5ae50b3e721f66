use contracts::shared::dashboards::{
    CreateDashboardRequest, Dashboard, DashboardSummary, UpdateDashboardRequest,
};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, auth_header, error_message};

const API_BASE: &str = "/api/dashboards";

/// Дашборды текущего пользователя (администратор видит все)
pub async fn list_dashboards() -> Result<Vec<DashboardSummary>, String> {
    let response = Request::get(&api_url(API_BASE))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn create_dashboard(name: String, description: Option<String>) -> Result<Dashboard, String> {
    let response = Request::post(&api_url(API_BASE))
        .header("Authorization", &auth_header()?)
        .json(&CreateDashboardRequest { name, description })
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn update_dashboard(
    id: &str,
    name: String,
    description: Option<String>,
) -> Result<Dashboard, String> {
    let response = Request::put(&api_url(&format!("{}/{}", API_BASE, id)))
        .header("Authorization", &auth_header()?)
        .json(&UpdateDashboardRequest { name, description })
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn delete_dashboard(id: &str) -> Result<(), String> {
    let response = Request::delete(&api_url(&format!("{}/{}", API_BASE, id)))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }
    Ok(())
}
