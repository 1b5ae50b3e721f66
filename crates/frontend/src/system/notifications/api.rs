use contracts::system::notifications::{Notification, UnreadCountResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, auth_header, error_message};

pub async fn fetch_unread_count() -> Result<i64, String> {
    let response = Request::get(&api_url("/api/notifications/unread-count"))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<UnreadCountResponse>()
        .await
        .map(|r| r.count)
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn fetch_notifications() -> Result<Vec<Notification>, String> {
    let response = Request::get(&api_url("/api/notifications"))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<Vec<Notification>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn post_empty(path: &str) -> Result<(), String> {
    let response = Request::post(&api_url(path))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }
    Ok(())
}

pub async fn mark_read(id: &str) -> Result<(), String> {
    post_empty(&format!("/api/notifications/{}/read", id)).await
}

pub async fn mark_all_read() -> Result<(), String> {
    post_empty("/api/notifications/read-all").await
}
