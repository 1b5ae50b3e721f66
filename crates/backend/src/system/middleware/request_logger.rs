use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Строка журнала запроса: `200 POST /api/rpc/execute_query | 12ms | 1.234 B`
pub fn format_line(status: StatusCode, method: &Method, path: &str, millis: u128, size: Option<usize>) -> String {
    let size = match size {
        Some(bytes) => format!("{} B", format_number(bytes)),
        None => "error".to_string(),
    };
    format!("{} {} {} | {}ms | {}", status.as_u16(), method, path, millis, size)
}

/// Middleware для логирования HTTP запросов
///
/// Пишет в tracing статус, метод, путь, длительность и реальный размер ответа.
/// Ответы 4xx/5xx идут уровнем WARN.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let (bytes, size) = match to_bytes(body, usize::MAX).await {
        Ok(b) => {
            let len = b.len();
            (b, Some(len))
        }
        Err(_) => (Default::default(), None),
    };

    let line = format_line(parts.status, &method, &path, start.elapsed().as_millis(), size);
    if parts.status.is_client_error() || parts.status.is_server_error() || size.is_none() {
        tracing::warn!(target: "http", "{}", line);
    } else {
        tracing::info!(target: "http", "{}", line);
    }

    Response::from_parts(parts, Body::from(bytes))
}
