use axum::{extract::Json, http::StatusCode};
use chrono::Utc;
use contracts::system::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;
use crate::shared::error::AppError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::{auth::jwt, users::service as user_service};

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        is_admin: user.is_admin,
    }
}

/// Login handler
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, AppError> {
    let user = user_service::verify_credentials(request.username.trim(), &request.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin).await?;
    let refresh_token = jwt::generate_refresh_token();
    store_refresh_token(&user.id, &refresh_token).await?;

    tracing::info!("User {} signed in", user.username);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user_info(user),
    }))
}

/// Refresh token handler
pub async fn refresh(Json(request): Json<RefreshRequest>) -> Result<Json<RefreshResponse>, AppError> {
    let user_id = validate_refresh_token(&request.refresh_token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let user = user_service::get_by_id(&user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::Unauthorized)?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.is_admin).await?;
    Ok(Json(RefreshResponse { access_token }))
}

/// Logout handler: revokes the refresh token
pub async fn logout(Json(request): Json<RefreshRequest>) -> Result<StatusCode, AppError> {
    revoke_refresh_token(&request.refresh_token).await?;
    Ok(StatusCode::OK)
}

/// Get current user handler (protected by middleware)
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Result<Json<UserInfo>, AppError> {
    let user = user_service::get_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;
    Ok(Json(user_info(user)))
}

// Refresh tokens are stored as SHA-256 hashes only

async fn store_refresh_token(user_id: &str, token: &str) -> anyhow::Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                uuid::Uuid::new_v4().to_string().into(),
                user_id.to_string().into(),
                hash_token(token).into(),
                jwt::calculate_refresh_token_expiration().into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await?;
    Ok(())
}

async fn validate_refresh_token(token: &str) -> anyhow::Result<Option<String>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [hash_token(token).into(), Utc::now().to_rfc3339().into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "user_id")?)),
        None => Ok(None),
    }
}

async fn revoke_refresh_token(token: &str) -> anyhow::Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
            [Utc::now().to_rfc3339().into(), hash_token(token).into()],
        ))
        .await?;
    Ok(())
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_stable_hex() {
        let h = hash_token("abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_ne!(hash_token("abd"), h);
    }
}
