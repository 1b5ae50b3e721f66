//! Вызовы `POST /api/rpc/<name>`.
//!
//! Каждая функция соответствует одной удалённой процедуре; тела запросов
//! используют имена параметров `p_*`.

use contracts::shared::dashboards::{
    Dashboard, DeleteWidgetRequest, GetDashboardDetailsRequest, InsertWidgetRequest,
    SuccessResponse, UpdateWidgetRequest,
};
use contracts::shared::data_source::{
    ColumnInfo, ExecuteQueryRequest, GetSchemaTablesRequest, GetTableColumnsRequest, QueryRows,
    SchemaTable,
};
use contracts::shared::widgets::Widget;
use gloo_net::http::Request;
use serde::{de::DeserializeOwned, Serialize};

use super::api_utils::{api_url, auth_header, error_message};

async fn call<B, T>(name: &str, body: &B) -> Result<T, String>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let response = Request::post(&api_url(&format!("/api/rpc/{}", name)))
        .header("Authorization", &auth_header()?)
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn execute_query(query: String) -> Result<QueryRows, String> {
    call("execute_query", &ExecuteQueryRequest { p_query: query }).await
}

pub async fn get_schema_tables() -> Result<Vec<SchemaTable>, String> {
    call("get_schema_tables", &GetSchemaTablesRequest {}).await
}

pub async fn get_table_columns(table: String, schema: Option<String>) -> Result<Vec<ColumnInfo>, String> {
    call(
        "get_table_columns",
        &GetTableColumnsRequest {
            p_table_name: table,
            p_schema_name: schema,
        },
    )
    .await
}

pub async fn get_dashboard_details(dashboard_id: String) -> Result<Dashboard, String> {
    call(
        "get_dashboard_details",
        &GetDashboardDetailsRequest {
            p_dashboard_id: dashboard_id,
        },
    )
    .await
}

pub async fn insert_widget(request: InsertWidgetRequest) -> Result<Widget, String> {
    call("insert_widget", &request).await
}

pub async fn update_widget(request: UpdateWidgetRequest) -> Result<Widget, String> {
    call("update_widget", &request).await
}

pub async fn delete_widget(widget_id: String) -> Result<(), String> {
    let response: SuccessResponse = call(
        "delete_widget",
        &DeleteWidgetRequest {
            p_widget_id: widget_id,
        },
    )
    .await?;
    if response.success {
        Ok(())
    } else {
        Err("Widget was not deleted".to_string())
    }
}
