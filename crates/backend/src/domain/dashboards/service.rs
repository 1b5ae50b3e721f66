use chrono::Utc;
use contracts::shared::dashboards::{
    CreateDashboardRequest, Dashboard, DashboardSummary, UpdateDashboardRequest,
};
use contracts::system::auth::TokenClaims;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::notifications::service as notifications;
use crate::domain::widgets::repository as widget_repository;
use crate::shared::error::AppError;

const MAX_NAME_LEN: usize = 120;

/// Владелец или администратор
pub fn can_access(dashboard: &Dashboard, claims: &TokenClaims) -> bool {
    claims.is_admin || dashboard.owner_user_id == claims.sub
}

/// Дашборд, доступный пользователю. Чужой дашборд неотличим от
/// несуществующего (NotFound), чтобы не раскрывать чужие ID.
pub async fn load_accessible(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    id: &str,
) -> Result<Dashboard, AppError> {
    match repository::find_by_id(db, id).await? {
        Some(dashboard) if can_access(&dashboard, claims) => Ok(dashboard),
        _ => Err(AppError::NotFound("Dashboard".into())),
    }
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Dashboard name cannot be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Dashboard name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Список дашбордов: свои для пользователя, все для администратора
pub async fn list(
    db: &DatabaseConnection,
    claims: &TokenClaims,
) -> Result<Vec<DashboardSummary>, AppError> {
    let owner = if claims.is_admin { None } else { Some(claims.sub.as_str()) };
    let dashboards = repository::list(db, owner).await?;
    let counts = repository::widget_counts(db).await?;

    Ok(dashboards
        .into_iter()
        .map(|d| DashboardSummary {
            widget_count: counts.get(&d.id).copied().unwrap_or(0),
            id: d.id,
            name: d.name,
            description: d.description,
            updated_at: d.updated_at,
        })
        .collect())
}

pub async fn create(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    request: CreateDashboardRequest,
) -> Result<Dashboard, AppError> {
    let now = Utc::now().to_rfc3339();
    let dashboard = Dashboard {
        id: uuid::Uuid::new_v4().to_string(),
        name: validate_name(&request.name)?,
        description: clean_description(request.description),
        owner_user_id: claims.sub.clone(),
        widgets: Vec::new(),
        created_at: now.clone(),
        updated_at: now,
    };

    repository::insert(db, &dashboard).await?;
    tracing::info!("Dashboard {} created by {}", dashboard.id, claims.username);
    Ok(dashboard)
}

pub async fn update(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    id: &str,
    request: UpdateDashboardRequest,
) -> Result<Dashboard, AppError> {
    let mut dashboard = load_accessible(db, claims, id).await?;
    dashboard.name = validate_name(&request.name)?;
    dashboard.description = clean_description(request.description);
    dashboard.updated_at = Utc::now().to_rfc3339();

    repository::update(db, &dashboard).await?;

    notifications::notify_owner_of_change(
        db,
        claims,
        &dashboard.owner_user_id,
        Some(&dashboard.id),
        format!("{} renamed dashboard \"{}\"", claims.username, dashboard.name),
    )
    .await;

    dashboard.widgets = widget_repository::list_by_dashboard(db, &dashboard.id).await?;
    Ok(dashboard)
}

/// Удаляет дашборд вместе с виджетами
pub async fn delete(db: &DatabaseConnection, claims: &TokenClaims, id: &str) -> Result<(), AppError> {
    let dashboard = load_accessible(db, claims, id).await?;

    let txn = db.begin().await?;
    let removed_widgets = widget_repository::delete_by_dashboard(&txn, &dashboard.id).await?;
    repository::delete(&txn, &dashboard.id).await?;
    txn.commit().await?;
    tracing::info!(
        "Dashboard {} deleted by {} ({} widgets)",
        dashboard.id,
        claims.username,
        removed_widgets
    );

    notifications::notify_owner_of_change(
        db,
        claims,
        &dashboard.owner_user_id,
        None,
        format!("{} deleted dashboard \"{}\"", claims.username, dashboard.name),
    )
    .await;

    Ok(())
}

/// Дашборд со всеми виджетами (RPC get_dashboard_details)
pub async fn get_details(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    id: &str,
) -> Result<Dashboard, AppError> {
    let mut dashboard = load_accessible(db, claims, id).await?;
    dashboard.widgets = widget_repository::list_by_dashboard(db, &dashboard.id).await?;
    Ok(dashboard)
}


#[cfg(test)]
mod tests {
    use super::test_support::{admin, user};
    use super::*;
    use crate::domain::notifications::service as notifications;
    use crate::shared::data::db::memory_connection;
    use contracts::shared::widgets::{Widget, WidgetConfig, WidgetLayout, WidgetType};

    fn named(name: &str) -> CreateDashboardRequest {
        CreateDashboardRequest {
            name: name.into(),
            description: Some("  ".into()),
        }
    }

    #[tokio::test]
    async fn create_trims_and_assigns_owner() {
        let db = memory_connection().await;
        let created = create(&db, &user("u1"), named("  Ventas 2024 ")).await.unwrap();
        assert_eq!(created.name, "Ventas 2024");
        assert_eq!(created.owner_user_id, "u1");
        assert_eq!(created.description, None);

        let err = create(&db, &user("u1"), named("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn users_only_see_their_own_dashboards() {
        let db = memory_connection().await;
        let mine = create(&db, &user("u1"), named("Mío")).await.unwrap();
        let theirs = create(&db, &user("u2"), named("Ajeno")).await.unwrap();

        let listed = list(&db, &user("u1")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
        assert_eq!(listed[0].widget_count, 0);

        let err = get_details(&db, &user("u1"), &theirs.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete(&db, &user("u1"), &theirs.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert_eq!(list(&db, &admin()).await.unwrap().len(), 2);
        assert!(get_details(&db, &admin(), &theirs.id).await.is_ok());
    }

    #[tokio::test]
    async fn admin_changes_notify_the_owner() {
        let db = memory_connection().await;
        let owner = user("u1");
        let created = create(&db, &owner, named("Mío")).await.unwrap();

        let renamed = update(
            &db,
            &admin(),
            &created.id,
            UpdateDashboardRequest {
                name: "Renombrado".into(),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Renombrado");
        assert_eq!(renamed.owner_user_id, "u1");

        assert_eq!(notifications::unread_count(&db, &owner).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn delete_removes_dashboard_and_its_widgets() {
        let db = memory_connection().await;
        let owner = user("u1");
        let kept = create(&db, &owner, named("Kept")).await.unwrap();
        let doomed = create(&db, &owner, named("Doomed")).await.unwrap();

        for (dashboard_id, id) in [(&doomed.id, "w1"), (&doomed.id, "w2"), (&kept.id, "w3")] {
            let widget = Widget {
                id: id.into(),
                dashboard_id: dashboard_id.clone(),
                widget_type: WidgetType::Kpi,
                config: WidgetConfig::default(),
                query: None,
                layout: WidgetLayout::default(),
            };
            widget_repository::insert(&db, &widget).await.unwrap();
        }

        delete(&db, &owner, &doomed.id).await.unwrap();

        assert!(repository::find_by_id(&db, &doomed.id).await.unwrap().is_none());
        assert!(widget_repository::list_by_dashboard(&db, &doomed.id).await.unwrap().is_empty());
        let details = get_details(&db, &owner, &kept.id).await.unwrap();
        assert_eq!(details.widgets.len(), 1);

        // соединение одно: транзакция должна быть закрыта
        assert_eq!(list(&db, &owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_dashboard_is_not_found() {
        let db = memory_connection().await;
        let err = delete(&db, &user("u1"), "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
