use axum::extract::Json;
use contracts::system::users::{CreateUserDto, User};

use crate::domain::notifications::service as notifications;
use crate::shared::data::db::get_connection;
use crate::shared::error::AppError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// List all users (admin only)
pub async fn list(CurrentUser(_claims): CurrentUser) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(service::list_all().await?))
}

/// Create user (admin only)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    let username = dto.username.clone();
    let user_id = service::create(dto).await.map_err(|e| {
        tracing::warn!("Failed to create user {}: {}", username, e);
        AppError::BadRequest(e.to_string())
    })?;

    tracing::info!("User {} created by {}", username, claims.username);
    if let Err(e) = notifications::notify(
        get_connection(),
        &user_id,
        "Welcome",
        &format!("Your account was created by {}", claims.username),
        None,
    )
    .await
    {
        tracing::warn!("Failed to create welcome notification: {}", e);
    }

    Ok(Json(serde_json::json!({ "id": user_id })))
}
