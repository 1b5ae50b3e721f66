use chrono::Utc;
use contracts::system::auth::TokenClaims;
use contracts::system::notifications::{Notification, UnreadCountResponse};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::AppError;

const LIST_LIMIT: u64 = 50;

/// Записать уведомление для пользователя
pub async fn notify(
    db: &DatabaseConnection,
    user_id: &str,
    title: &str,
    message: &str,
    dashboard_id: Option<&str>,
) -> Result<Notification, AppError> {
    let item = Notification {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        dashboard_id: dashboard_id.map(str::to_string),
        is_read: false,
        created_at: Utc::now().to_rfc3339(),
    };
    repository::insert(db, &item).await?;
    Ok(item)
}

/// Сообщить владельцу дашборда, что его изменил кто-то другой (администратор).
/// Ошибка записи уведомления не должна ломать основную операцию.
pub async fn notify_owner_of_change(
    db: &DatabaseConnection,
    actor: &TokenClaims,
    owner_user_id: &str,
    dashboard_id: Option<&str>,
    message: String,
) {
    if actor.sub == owner_user_id {
        return;
    }
    if let Err(e) = notify(db, owner_user_id, "Dashboard changed", &message, dashboard_id).await {
        tracing::warn!("Failed to notify user {}: {}", owner_user_id, e);
    }
}

pub async fn list(db: &DatabaseConnection, claims: &TokenClaims) -> Result<Vec<Notification>, AppError> {
    Ok(repository::list_for_user(db, &claims.sub, LIST_LIMIT).await?)
}

pub async fn unread_count(
    db: &DatabaseConnection,
    claims: &TokenClaims,
) -> Result<UnreadCountResponse, AppError> {
    let count = repository::unread_count(db, &claims.sub).await?;
    Ok(UnreadCountResponse { count: count as i64 })
}

pub async fn mark_read(db: &DatabaseConnection, claims: &TokenClaims, id: &str) -> Result<(), AppError> {
    if repository::mark_read(db, &claims.sub, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Notification".into()))
    }
}

pub async fn mark_all_read(db: &DatabaseConnection, claims: &TokenClaims) -> Result<u64, AppError> {
    Ok(repository::mark_all_read(db, &claims.sub).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;

    fn claims(sub: &str, is_admin: bool) -> TokenClaims {
        TokenClaims {
            sub: sub.into(),
            username: sub.into(),
            is_admin,
            exp: 0,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn unread_count_and_mark_read() {
        let db = memory_connection().await;
        let user = claims("u1", false);
        let first = notify(&db, "u1", "Hola", "uno", None).await.unwrap();
        notify(&db, "u1", "Hola", "dos", Some("d1")).await.unwrap();
        notify(&db, "u2", "Hola", "ajeno", None).await.unwrap();

        assert_eq!(unread_count(&db, &user).await.unwrap().count, 2);
        assert_eq!(list(&db, &user).await.unwrap().len(), 2);

        mark_read(&db, &user, &first.id).await.unwrap();
        assert_eq!(unread_count(&db, &user).await.unwrap().count, 1);

        assert_eq!(mark_all_read(&db, &user).await.unwrap(), 1);
        assert_eq!(unread_count(&db, &user).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn cannot_mark_someone_elses_notification() {
        let db = memory_connection().await;
        let other = notify(&db, "u2", "Hola", "ajeno", None).await.unwrap();
        let err = mark_read(&db, &claims("u1", false), &other.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn owner_is_not_notified_about_own_changes() {
        let db = memory_connection().await;
        let owner = claims("u1", false);
        notify_owner_of_change(&db, &owner, "u1", Some("d1"), "self".into()).await;
        assert_eq!(unread_count(&db, &owner).await.unwrap().count, 0);

        notify_owner_of_change(&db, &claims("admin", true), "u1", Some("d1"), "by admin".into()).await;
        assert_eq!(unread_count(&db, &owner).await.unwrap().count, 1);
    }
}
