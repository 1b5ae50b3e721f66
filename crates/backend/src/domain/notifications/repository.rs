use contracts::system::notifications::Notification;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::Expr;
use sea_orm::{EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};

mod notification {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "notifications")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub user_id: String,
        pub title: String,
        pub message: String,
        pub dashboard_id: Option<String>,
        pub is_read: bool,
        pub created_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<notification::Model> for Notification {
    fn from(m: notification::Model) -> Self {
        Notification {
            id: m.id,
            user_id: m.user_id,
            title: m.title,
            message: m.message,
            dashboard_id: m.dashboard_id,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

pub async fn insert(db: &DatabaseConnection, item: &Notification) -> Result<(), DbErr> {
    let active_model = notification::ActiveModel {
        id: Set(item.id.clone()),
        user_id: Set(item.user_id.clone()),
        title: Set(item.title.clone()),
        message: Set(item.message.clone()),
        dashboard_id: Set(item.dashboard_id.clone()),
        is_read: Set(item.is_read),
        created_at: Set(item.created_at.clone()),
    };
    notification::Entity::insert(active_model).exec(db).await?;
    Ok(())
}

/// Последние уведомления пользователя, новые сверху
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: &str,
    limit: u64,
) -> Result<Vec<Notification>, DbErr> {
    let models = notification::Entity::find()
        .filter(notification::Column::UserId.eq(user_id))
        .order_by_desc(notification::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn unread_count(db: &DatabaseConnection, user_id: &str) -> Result<u64, DbErr> {
    notification::Entity::find()
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await
}

/// Отметить прочитанным; чужие уведомления не трогаются
pub async fn mark_read(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<bool, DbErr> {
    let result = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::Id.eq(id))
        .filter(notification::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn mark_all_read(db: &DatabaseConnection, user_id: &str) -> Result<u64, DbErr> {
    let result = notification::Entity::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
