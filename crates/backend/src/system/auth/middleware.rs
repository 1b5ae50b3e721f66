use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use contracts::system::auth::TokenClaims;

use crate::shared::error::AppError;

/// `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Токен копируется из запроса до `.await`: `Request<Body>` не `Sync`
fn owned_token(req: &Request<Body>) -> Result<String, AppError> {
    bearer_token(req.headers())
        .map(str::to_owned)
        .ok_or(AppError::Unauthorized)
}

async fn authenticate(token: String) -> Result<TokenClaims, AppError> {
    super::jwt::validate_token(&token).await.map_err(|e| {
        tracing::debug!("Rejected token: {:#}", e);
        AppError::Unauthorized
    })
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let token = owned_token(&req)?;
    let claims = authenticate(token).await?;
    // Claims are read back by the CurrentUser extractor
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Middleware that requires admin privileges
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let token = owned_token(&req)?;
    let claims = authenticate(token).await?;
    if !claims.is_admin {
        return Err(AppError::Forbidden);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
