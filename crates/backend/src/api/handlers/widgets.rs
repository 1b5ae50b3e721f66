use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};

use crate::domain::widgets::service;
use crate::shared::data::db::get_connection;
use crate::shared::data_source::{executor, export, get_data_source};
use crate::shared::error::AppError;
use crate::shared::format::format_number;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/widgets/:id/export.csv
///
/// Строки виджета в CSV. Запрос строится заново из текущей конфигурации.
pub async fn export_csv(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let widget = service::load_accessible_widget(get_connection(), &claims, &id).await?;

    let sql = widget.current_query();
    if sql.is_empty() {
        return Err(AppError::BadRequest("Widget is not configured".into()));
    }

    let rows = executor::execute_query(get_data_source(), &sql).await?;
    let csv = export::rows_to_csv(&rows)?;
    let file_name = export::csv_file_name(&widget.title());

    tracing::info!(
        "Widget {} exported by {} ({} rows{})",
        widget.id,
        claims.username,
        format_number(rows.rows.len()),
        if rows.truncated { ", truncated" } else { "" }
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        csv,
    )
        .into_response())
}
