use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::api::handlers;
use crate::system;
use crate::system::auth::middleware::{require_admin, require_auth};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        // System auth routes (protected)
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user).layer(middleware::from_fn(require_auth)),
        )
        // System users management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(require_admin)),
        )
        // ========================================
        // RPC (data source + widgets)
        // ========================================
        .route(
            "/api/rpc/execute_query",
            post(handlers::rpc::execute_query).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/rpc/get_table_columns",
            post(handlers::rpc::get_table_columns).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/rpc/get_schema_tables",
            post(handlers::rpc::get_schema_tables).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/rpc/get_dashboard_details",
            post(handlers::rpc::get_dashboard_details).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/rpc/insert_widget",
            post(handlers::rpc::insert_widget).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/rpc/update_widget",
            post(handlers::rpc::update_widget).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/rpc/delete_widget",
            post(handlers::rpc::delete_widget).layer(middleware::from_fn(require_auth)),
        )
        // ========================================
        // DASHBOARDS
        // ========================================
        .route(
            "/api/dashboards",
            get(handlers::dashboards::list)
                .post(handlers::dashboards::create)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/dashboards/:id",
            put(handlers::dashboards::update)
                .delete(handlers::dashboards::delete)
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/widgets/:id/export.csv",
            get(handlers::widgets::export_csv).layer(middleware::from_fn(require_auth)),
        )
        // ========================================
        // NOTIFICATIONS
        // ========================================
        .route(
            "/api/notifications",
            get(handlers::notifications::list).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_read).layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read).layer(middleware::from_fn(require_auth)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    async fn status(method: Method, uri: &str, auth: Option<&str>) -> StatusCode {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            request = request.header(header::AUTHORIZATION, value);
        }
        configure_routes()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn health_is_public() {
        assert_eq!(status(Method::GET, "/health", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_token() {
        assert_eq!(
            status(Method::GET, "/api/dashboards", None).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(Method::POST, "/api/rpc/execute_query", Some("Basic abc")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(Method::GET, "/api/system/users", None).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
