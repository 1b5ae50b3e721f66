use axum::{extract::Path, Json};
use contracts::shared::dashboards::SuccessResponse;
use contracts::system::notifications::{Notification, UnreadCountResponse};

use crate::domain::notifications::service;
use crate::shared::data::db::get_connection;
use crate::shared::error::AppError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/notifications
pub async fn list(CurrentUser(claims): CurrentUser) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(service::list(get_connection(), &claims).await?))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    Ok(Json(service::unread_count(get_connection(), &claims).await?))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    service::mark_read(get_connection(), &claims, &id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    CurrentUser(claims): CurrentUser,
) -> Result<Json<SuccessResponse>, AppError> {
    let updated = service::mark_all_read(get_connection(), &claims).await?;
    tracing::debug!("{} notifications marked read for {}", updated, claims.username);
    Ok(Json(SuccessResponse { success: true }))
}
