//! `POST /api/rpc/<name>`: remote procedures called by the dashboard UI.
//! Bodies use the `p_*` parameter names of the procedures.

use axum::Json;
use contracts::shared::dashboards::{
    Dashboard, DeleteWidgetRequest, GetDashboardDetailsRequest, InsertWidgetRequest,
    SuccessResponse, UpdateWidgetRequest,
};
use contracts::shared::data_source::{
    ColumnInfo, ExecuteQueryRequest, GetSchemaTablesRequest, GetTableColumnsRequest, QueryRows,
    SchemaTable,
};
use contracts::shared::widgets::Widget;

use crate::domain::{dashboards, widgets};
use crate::shared::data::db::get_connection;
use crate::shared::data_source::{executor, get_data_source, metadata};
use crate::shared::error::AppError;
use crate::system::auth::extractor::CurrentUser;

/// POST /api/rpc/execute_query
pub async fn execute_query(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<ExecuteQueryRequest>,
) -> Result<Json<QueryRows>, AppError> {
    tracing::debug!("execute_query by {}: {}", claims.username, request.p_query);
    let rows = executor::execute_query(get_data_source(), &request.p_query).await?;
    Ok(Json(rows))
}

/// POST /api/rpc/get_table_columns
pub async fn get_table_columns(
    CurrentUser(_claims): CurrentUser,
    Json(request): Json<GetTableColumnsRequest>,
) -> Result<Json<Vec<ColumnInfo>>, AppError> {
    let columns = metadata::get_table_columns(
        get_data_source(),
        &request.p_table_name,
        request.p_schema_name.as_deref(),
    )
    .await?;
    Ok(Json(columns))
}

/// POST /api/rpc/get_schema_tables
pub async fn get_schema_tables(
    CurrentUser(_claims): CurrentUser,
    _body: Option<Json<GetSchemaTablesRequest>>,
) -> Result<Json<Vec<SchemaTable>>, AppError> {
    Ok(Json(metadata::get_schema_tables(get_data_source()).await?))
}

/// POST /api/rpc/get_dashboard_details
pub async fn get_dashboard_details(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<GetDashboardDetailsRequest>,
) -> Result<Json<Dashboard>, AppError> {
    let dashboard =
        dashboards::service::get_details(get_connection(), &claims, &request.p_dashboard_id).await?;
    Ok(Json(dashboard))
}

/// POST /api/rpc/insert_widget
pub async fn insert_widget(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<InsertWidgetRequest>,
) -> Result<Json<Widget>, AppError> {
    Ok(Json(
        widgets::service::insert_widget(get_connection(), &claims, request).await?,
    ))
}

/// POST /api/rpc/update_widget
pub async fn update_widget(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<UpdateWidgetRequest>,
) -> Result<Json<Widget>, AppError> {
    Ok(Json(
        widgets::service::update_widget(get_connection(), &claims, request).await?,
    ))
}

/// POST /api/rpc/delete_widget
pub async fn delete_widget(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<DeleteWidgetRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    widgets::service::delete_widget(get_connection(), &claims, request).await?;
    Ok(Json(SuccessResponse { success: true }))
}
