use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{CreateUserDto, User};

use super::repository;
use crate::system::auth::password;

/// Проверка полей нового пользователя (без обращения к БД)
pub fn validate_new_user(dto: &CreateUserDto) -> Result<()> {
    if dto.username.trim().is_empty() {
        return Err(anyhow::anyhow!("Username cannot be empty"));
    }
    if dto.username.trim() != dto.username {
        return Err(anyhow::anyhow!("Username cannot start or end with spaces"));
    }
    if let Some(ref email) = dto.email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(anyhow::anyhow!("Invalid email format"));
        }
    }
    password::validate_password_strength(&dto.password)?;
    Ok(())
}

/// Create a new user, returns its id
pub async fn create(dto: CreateUserDto) -> Result<String> {
    validate_new_user(&dto)?;

    if repository::get_by_username(&dto.username).await?.is_some() {
        return Err(anyhow::anyhow!("Username already exists"));
    }

    let password_hash = password::hash_password(&dto.password)?;
    let now = Utc::now().to_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: dto.username,
        email: dto.email.filter(|e| !e.trim().is_empty()),
        full_name: dto.full_name,
        is_active: true,
        is_admin: dto.is_admin,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(&user, &password_hash).await?;
    Ok(user.id)
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Verify user credentials (for login).
/// `None` for an unknown user, a wrong password or an inactive account.
pub async fn verify_credentials(username: &str, password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user {}", username);
        return Ok(None);
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(username: &str, password: &str, email: Option<&str>) -> CreateUserDto {
        CreateUserDto {
            username: username.into(),
            password: password.into(),
            email: email.map(str::to_string),
            full_name: None,
            is_admin: false,
        }
    }

    #[test]
    fn new_user_validation() {
        assert!(validate_new_user(&dto("ana", "secreto", Some("ana@example.com"))).is_ok());
        assert!(validate_new_user(&dto("ana", "secreto", Some(""))).is_ok());
        assert!(validate_new_user(&dto("", "secreto", None)).is_err());
        assert!(validate_new_user(&dto(" ana", "secreto", None)).is_err());
        assert!(validate_new_user(&dto("ana", "secreto", Some("no-at-sign"))).is_err());
        assert!(validate_new_user(&dto("ana", "abc", None)).is_err());
    }
}
