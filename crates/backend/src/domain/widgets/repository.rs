use contracts::shared::widgets::{Widget, WidgetConfig, WidgetLayout, WidgetType};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

mod widget {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "widgets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub dashboard_id: String,
        pub widget_type: String,
        pub config_json: String,
        pub layout_json: String,
        pub query: Option<String>,
        pub created_at: String,
        pub updated_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Строка таблицы → виджет. Битый JSON конфигурации даёт пустую конфигурацию
/// (виджет покажется как "не настроен"), неизвестный тип пропускается.
fn to_widget(m: widget::Model) -> Option<Widget> {
    let Some(widget_type) = WidgetType::parse(&m.widget_type) else {
        tracing::warn!("Widget {} has unknown type '{}', skipped", m.id, m.widget_type);
        return None;
    };

    let config: WidgetConfig = serde_json::from_str(&m.config_json).unwrap_or_else(|e| {
        tracing::warn!("Widget {} has unreadable config: {}", m.id, e);
        WidgetConfig::new(widget_type)
    });
    let layout: WidgetLayout = serde_json::from_str(&m.layout_json).unwrap_or_default();

    Some(Widget {
        id: m.id,
        dashboard_id: m.dashboard_id,
        widget_type,
        config,
        layout,
        query: m.query,
    })
}

fn to_active_model(item: &Widget, created_at: String, updated_at: String) -> widget::ActiveModel {
    let config_json = serde_json::to_string(&item.config).unwrap_or_else(|_| "{}".to_string());
    let layout_json = serde_json::to_string(&item.layout).unwrap_or_else(|_| "{}".to_string());

    widget::ActiveModel {
        id: Set(item.id.clone()),
        dashboard_id: Set(item.dashboard_id.clone()),
        widget_type: Set(item.widget_type.as_str().to_string()),
        config_json: Set(config_json),
        layout_json: Set(layout_json),
        query: Set(item.query.clone()),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
    }
}

/// Виджеты дашборда в порядке раскладки (сверху вниз, слева направо)
pub async fn list_by_dashboard(
    db: &DatabaseConnection,
    dashboard_id: &str,
) -> Result<Vec<Widget>, DbErr> {
    let models = widget::Entity::find()
        .filter(widget::Column::DashboardId.eq(dashboard_id))
        .order_by_asc(widget::Column::CreatedAt)
        .all(db)
        .await?;

    let mut widgets: Vec<Widget> = models.into_iter().filter_map(to_widget).collect();
    widgets.sort_by_key(|w| (w.layout.y, w.layout.x));
    Ok(widgets)
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Widget>, DbErr> {
    let model = widget::Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.and_then(to_widget))
}

pub async fn insert(db: &DatabaseConnection, item: &Widget) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();
    let active_model = to_active_model(item, now.clone(), now);
    widget::Entity::insert(active_model).exec(db).await?;
    Ok(())
}

pub async fn update(db: &DatabaseConnection, item: &Widget) -> Result<(), DbErr> {
    let existing = widget::Entity::find_by_id(item.id.clone())
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("widget {}", item.id)))?;

    let active_model = to_active_model(item, existing.created_at, chrono::Utc::now().to_rfc3339());
    widget::Entity::update(active_model).exec(db).await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, DbErr> {
    let result = widget::Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_by_dashboard<C: ConnectionTrait>(db: &C, dashboard_id: &str) -> Result<u64, DbErr> {
    let result = widget::Entity::delete_many()
        .filter(widget::Column::DashboardId.eq(dashboard_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;
    use contracts::shared::widgets::Aggregation;

    fn kpi(id: &str, dashboard_id: &str, layout: WidgetLayout) -> Widget {
        let config = WidgetConfig {
            table: Some("ventas".into()),
            column: Some("monto".into()),
            aggregation: Some(Aggregation::Sum),
            ..WidgetConfig::new(WidgetType::Kpi)
        };
        Widget {
            id: id.into(),
            dashboard_id: dashboard_id.into(),
            widget_type: WidgetType::Kpi,
            config,
            layout,
            query: None,
        }
    }

    #[tokio::test]
    async fn stores_config_and_layout_as_json() {
        let db = memory_connection().await;
        let mut item = kpi("w1", "d1", WidgetLayout::new(2, 1, 3, 2));
        item.query = Some(item.current_query());
        insert(&db, &item).await.unwrap();

        let found = find_by_id(&db, "w1").await.unwrap().unwrap();
        assert_eq!(found, item);
        assert_eq!(
            found.query.as_deref(),
            Some(r#"SELECT SUM("monto") FROM "be_exponential"."ventas""#)
        );
    }

    #[tokio::test]
    async fn list_is_ordered_by_layout() {
        let db = memory_connection().await;
        insert(&db, &kpi("lower", "d1", WidgetLayout::new(0, 3, 3, 2))).await.unwrap();
        insert(&db, &kpi("right", "d1", WidgetLayout::new(6, 0, 3, 2))).await.unwrap();
        insert(&db, &kpi("left", "d1", WidgetLayout::new(0, 0, 3, 2))).await.unwrap();
        insert(&db, &kpi("other", "d2", WidgetLayout::default())).await.unwrap();

        let ids: Vec<String> = list_by_dashboard(&db, "d1")
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["left", "right", "lower"]);
    }

    #[tokio::test]
    async fn update_replaces_config() {
        let db = memory_connection().await;
        let mut item = kpi("w1", "d1", WidgetLayout::default());
        insert(&db, &item).await.unwrap();

        item.config.aggregation = Some(Aggregation::Avg);
        item.layout = item.layout.moved_by(1, 0);
        update(&db, &item).await.unwrap();

        let found = find_by_id(&db, "w1").await.unwrap().unwrap();
        assert_eq!(found.config.aggregation, Some(Aggregation::Avg));
        assert_eq!(found.layout.x, 1);

        let missing = kpi("nope", "d1", WidgetLayout::default());
        assert!(update(&db, &missing).await.is_err());
    }

    #[tokio::test]
    async fn delete_by_dashboard_removes_only_its_widgets() {
        let db = memory_connection().await;
        insert(&db, &kpi("a", "d1", WidgetLayout::default())).await.unwrap();
        insert(&db, &kpi("b", "d1", WidgetLayout::default())).await.unwrap();
        insert(&db, &kpi("c", "d2", WidgetLayout::default())).await.unwrap();

        assert_eq!(delete_by_dashboard(&db, "d1").await.unwrap(), 2);
        assert!(list_by_dashboard(&db, "d1").await.unwrap().is_empty());
        assert_eq!(list_by_dashboard(&db, "d2").await.unwrap().len(), 1);
        assert!(delete(&db, "c").await.unwrap());
    }
}
