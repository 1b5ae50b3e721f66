use chrono::Utc;
use contracts::shared::dashboards::Dashboard;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::Expr;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, EntityTrait, QueryFilter, QueryOrder, Set, Statement,
};
use std::collections::HashMap;

mod dashboard {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "dashboards")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub owner_user_id: String,
        pub created_at: String,
        pub updated_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<dashboard::Model> for Dashboard {
    fn from(m: dashboard::Model) -> Self {
        Dashboard {
            id: m.id,
            name: m.name,
            description: m.description,
            owner_user_id: m.owner_user_id,
            widgets: Vec::new(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Дашборды владельца (или все, если `owner_user_id` = None), новые сверху
pub async fn list(
    db: &DatabaseConnection,
    owner_user_id: Option<&str>,
) -> Result<Vec<Dashboard>, DbErr> {
    let mut query = dashboard::Entity::find();
    if let Some(owner) = owner_user_id {
        query = query.filter(dashboard::Column::OwnerUserId.eq(owner));
    }
    let models = query
        .order_by_desc(dashboard::Column::UpdatedAt)
        .all(db)
        .await?;

    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Найти дашборд по ID (без виджетов)
pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Dashboard>, DbErr> {
    let model = dashboard::Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(|m| m.into()))
}

pub async fn insert(db: &DatabaseConnection, item: &Dashboard) -> Result<(), DbErr> {
    let active_model = dashboard::ActiveModel {
        id: Set(item.id.clone()),
        name: Set(item.name.clone()),
        description: Set(item.description.clone()),
        owner_user_id: Set(item.owner_user_id.clone()),
        created_at: Set(item.created_at.clone()),
        updated_at: Set(item.updated_at.clone()),
    };

    dashboard::Entity::insert(active_model).exec(db).await?;
    Ok(())
}

/// Переименовать / сменить описание
pub async fn update(db: &DatabaseConnection, item: &Dashboard) -> Result<(), DbErr> {
    let active_model = dashboard::ActiveModel {
        id: Set(item.id.clone()),
        name: Set(item.name.clone()),
        description: Set(item.description.clone()),
        owner_user_id: Set(item.owner_user_id.clone()),
        created_at: Set(item.created_at.clone()),
        updated_at: Set(item.updated_at.clone()),
    };

    dashboard::Entity::update(active_model).exec(db).await?;
    Ok(())
}

/// Отметить изменение (виджет добавлен / изменён / удалён)
pub async fn touch<C: ConnectionTrait>(db: &C, id: &str) -> Result<(), DbErr> {
    dashboard::Entity::update_many()
        .col_expr(dashboard::Column::UpdatedAt, Expr::value(Utc::now().to_rfc3339()))
        .filter(dashboard::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, DbErr> {
    let result = dashboard::Entity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Количество виджетов по каждому дашборду
pub async fn widget_counts(db: &DatabaseConnection) -> Result<HashMap<String, i64>, DbErr> {
    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT dashboard_id, COUNT(*) AS cnt FROM widgets GROUP BY dashboard_id".to_string(),
        ))
        .await?;

    let mut counts = HashMap::new();
    for row in rows {
        let dashboard_id: String = row.try_get("", "dashboard_id")?;
        let cnt: i64 = row.try_get("", "cnt")?;
        counts.insert(dashboard_id, cnt);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;

    fn sample(id: &str, owner: &str, updated_at: &str) -> Dashboard {
        Dashboard {
            id: id.into(),
            name: format!("Dashboard {id}"),
            description: None,
            owner_user_id: owner.into(),
            widgets: Vec::new(),
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: updated_at.into(),
        }
    }

    #[tokio::test]
    async fn list_filters_by_owner_newest_first() {
        let db = memory_connection().await;
        insert(&db, &sample("a", "u1", "2024-01-01T00:00:00+00:00")).await.unwrap();
        insert(&db, &sample("b", "u1", "2024-03-01T00:00:00+00:00")).await.unwrap();
        insert(&db, &sample("c", "u2", "2024-02-01T00:00:00+00:00")).await.unwrap();

        let mine: Vec<String> = list(&db, Some("u1")).await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(mine, vec!["b", "a"]);

        let all = list(&db, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let db = memory_connection().await;
        let mut item = sample("a", "u1", "2024-01-01T00:00:00+00:00");
        insert(&db, &item).await.unwrap();

        item.name = "Ventas".into();
        item.description = Some("Resumen".into());
        update(&db, &item).await.unwrap();
        let found = find_by_id(&db, "a").await.unwrap().unwrap();
        assert_eq!(found.name, "Ventas");
        assert_eq!(found.description.as_deref(), Some("Resumen"));

        assert!(delete(&db, "a").await.unwrap());
        assert!(!delete(&db, "a").await.unwrap());
        assert!(find_by_id(&db, "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn touch_moves_updated_at_forward() {
        let db = memory_connection().await;
        insert(&db, &sample("a", "u1", "2000-01-01T00:00:00+00:00")).await.unwrap();
        touch(&db, "a").await.unwrap();
        let found = find_by_id(&db, "a").await.unwrap().unwrap();
        assert!(found.updated_at > "2000-01-01T00:00:00+00:00".to_string());
    }
}
