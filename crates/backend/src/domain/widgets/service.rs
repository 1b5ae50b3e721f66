use contracts::shared::dashboards::{DeleteWidgetRequest, InsertWidgetRequest, UpdateWidgetRequest};
use contracts::shared::widgets::{
    default_size, place_new, try_build_widget_query, Widget, WidgetConfig, WidgetType,
};
use contracts::system::auth::TokenClaims;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::dashboards::repository as dashboard_repository;
use crate::domain::dashboards::service::load_accessible;
use crate::domain::notifications::service as notifications;
use crate::shared::error::AppError;

/// Пересчитать SQL виджета. Неполная конфигурация сохраняется (это черновик),
/// запрос тогда пустой.
fn refresh_query(widget: &mut Widget) {
    let table = widget.config.table.clone().unwrap_or_default();
    match try_build_widget_query(widget.widget_type.as_str(), &table, &widget.config) {
        Ok(sql) => widget.query = Some(sql),
        Err(reason) => {
            tracing::debug!("Widget {} is not configured yet: {}", widget.id, reason);
            widget.query = Some(String::new());
        }
    }
}

/// Виджет, доступный пользователю через его дашборд
pub async fn load_accessible_widget(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    widget_id: &str,
) -> Result<Widget, AppError> {
    let widget = repository::find_by_id(db, widget_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Widget".into()))?;
    load_accessible(db, claims, &widget.dashboard_id)
        .await
        .map_err(|_| AppError::NotFound("Widget".into()))?;
    Ok(widget)
}

/// RPC insert_widget
pub async fn insert_widget(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    request: InsertWidgetRequest,
) -> Result<Widget, AppError> {
    let widget_type = WidgetType::parse(&request.p_widget_type).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown widget type: {}", request.p_widget_type))
    })?;
    let dashboard = load_accessible(db, claims, &request.p_dashboard_id).await?;

    let layout = match request.p_layout {
        Some(layout) => layout.clamped(),
        None => {
            let existing: Vec<_> = repository::list_by_dashboard(db, &dashboard.id)
                .await?
                .iter()
                .map(|w| w.layout)
                .collect();
            let (w, h) = default_size(widget_type);
            place_new(&existing, w, h)
        }
    };

    let mut widget = Widget {
        id: uuid::Uuid::new_v4().to_string(),
        dashboard_id: dashboard.id.clone(),
        widget_type,
        config: WidgetConfig {
            widget_type: Some(widget_type),
            ..request.p_config
        },
        layout,
        query: None,
    };
    refresh_query(&mut widget);

    repository::insert(db, &widget).await?;
    dashboard_repository::touch(db, &dashboard.id).await?;
    tracing::info!(
        "Widget {} ({}) added to dashboard {}",
        widget.id,
        widget_type.as_str(),
        dashboard.id
    );

    notifications::notify_owner_of_change(
        db,
        claims,
        &dashboard.owner_user_id,
        Some(&dashboard.id),
        format!("{} added \"{}\" to \"{}\"", claims.username, widget.title(), dashboard.name),
    )
    .await;

    Ok(widget)
}

/// RPC update_widget: конфигурация и/или раскладка
pub async fn update_widget(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    request: UpdateWidgetRequest,
) -> Result<Widget, AppError> {
    let mut widget = load_accessible_widget(db, claims, &request.p_widget_id).await?;

    if let Some(config) = request.p_config {
        widget.config = WidgetConfig {
            widget_type: Some(widget.widget_type),
            ..config
        };
    }
    if let Some(layout) = request.p_layout {
        widget.layout = layout.clamped();
    }
    refresh_query(&mut widget);

    repository::update(db, &widget).await?;
    dashboard_repository::touch(db, &widget.dashboard_id).await?;

    if let Some(dashboard) = dashboard_repository::find_by_id(db, &widget.dashboard_id).await? {
        notifications::notify_owner_of_change(
            db,
            claims,
            &dashboard.owner_user_id,
            Some(&dashboard.id),
            format!("{} changed \"{}\" on \"{}\"", claims.username, widget.title(), dashboard.name),
        )
        .await;
    }

    Ok(widget)
}

/// RPC delete_widget
pub async fn delete_widget(
    db: &DatabaseConnection,
    claims: &TokenClaims,
    request: DeleteWidgetRequest,
) -> Result<(), AppError> {
    let widget = load_accessible_widget(db, claims, &request.p_widget_id).await?;

    let txn = db.begin().await?;
    repository::delete(&txn, &widget.id).await?;
    dashboard_repository::touch(&txn, &widget.dashboard_id).await?;
    txn.commit().await?;
    tracing::info!("Widget {} deleted from dashboard {}", widget.id, widget.dashboard_id);

    if let Some(dashboard) = dashboard_repository::find_by_id(db, &widget.dashboard_id).await? {
        notifications::notify_owner_of_change(
            db,
            claims,
            &dashboard.owner_user_id,
            Some(&dashboard.id),
            format!("{} removed \"{}\" from \"{}\"", claims.username, widget.title(), dashboard.name),
        )
        .await;
    }

    Ok(())
}
