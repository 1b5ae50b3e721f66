use axum::{extract::Path, Json};
use contracts::shared::dashboards::{
    CreateDashboardRequest, Dashboard, DashboardSummary, SuccessResponse, UpdateDashboardRequest,
};

use crate::domain::dashboards::service;
use crate::shared::data::db::get_connection;
use crate::shared::error::AppError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/dashboards
pub async fn list(CurrentUser(claims): CurrentUser) -> Result<Json<Vec<DashboardSummary>>, AppError> {
    Ok(Json(service::list(get_connection(), &claims).await?))
}

/// POST /api/dashboards
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<CreateDashboardRequest>,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(service::create(get_connection(), &claims, request).await?))
}

/// PUT /api/dashboards/:id
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateDashboardRequest>,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(service::update(get_connection(), &claims, &id, request).await?))
}

/// DELETE /api/dashboards/:id
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    service::delete(get_connection(), &claims, &id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
