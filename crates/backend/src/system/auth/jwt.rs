use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use tokio::sync::OnceCell;

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;
const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 90;
const JWT_SECRET_KEY: &str = "jwt_secret";

/// Секрет читается из sys_settings один раз за время жизни процесса
static JWT_SECRET: OnceCell<String> = OnceCell::const_new();

pub fn claims_for(user_id: &str, username: &str, is_admin: bool) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        is_admin,
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(token_data.claims)
}

/// Generate JWT access token with 24 hours lifetime
pub async fn generate_access_token(user_id: &str, username: &str, is_admin: bool) -> Result<String> {
    let secret = get_jwt_secret().await?;
    encode_claims(&claims_for(user_id, username, is_admin), secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_claims(token, secret)
}

/// Opaque refresh token (UUID-based), stored only as a hash
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Calculate refresh token expiration timestamp
pub fn calculate_refresh_token_expiration() -> String {
    let exp = Utc::now() + chrono::Duration::days(REFRESH_TOKEN_LIFETIME_DAYS);
    exp.to_rfc3339()
}

async fn get_jwt_secret() -> Result<&'static str> {
    let secret = JWT_SECRET
        .get_or_try_init(|| async {
            match load_jwt_secret().await? {
                Some(secret) => Ok::<String, anyhow::Error>(secret),
                None => {
                    let secret = generate_jwt_secret();
                    save_jwt_secret(&secret).await?;
                    tracing::info!("Generated new JWT secret");
                    Ok(secret)
                }
            }
        })
        .await?;
    Ok(secret.as_str())
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn load_jwt_secret() -> Result<Option<String>> {
    use crate::shared::data::db::get_connection;

    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret(secret: &str) -> Result<()> {
    use crate::shared::data::db::get_connection;

    let now = Utc::now().to_rfc3339();
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                JWT_SECRET_KEY.into(),
                secret.to_string().into(),
                "Auto-generated JWT secret for authentication".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_claims() {
        let claims = claims_for("u1", "ana", true);
        let token = encode_claims(&claims, "secret").unwrap();
        let decoded = decode_claims(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.username, "ana");
        assert!(decoded.is_admin);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn wrong_secret_or_expired_token_rejected() {
        let token = encode_claims(&claims_for("u1", "ana", false), "secret").unwrap();
        assert!(decode_claims(&token, "other").is_err());

        let expired = TokenClaims {
            exp: (Utc::now() - chrono::Duration::hours(2)).timestamp() as usize,
            ..claims_for("u1", "ana", false)
        };
        let token = encode_claims(&expired, "secret").unwrap();
        assert!(decode_claims(&token, "secret").is_err());
    }

    #[test]
    fn generated_secrets_differ() {
        assert_ne!(generate_jwt_secret(), generate_jwt_secret());
        assert_eq!(generate_jwt_secret().len(), 44);
    }
}
