use anyhow::Result;
use contracts::system::users::CreateUserDto;

use crate::domain::notifications::service as notifications;
use crate::shared::data::db::get_connection;
use crate::system::users::{repository, service};

/// Ensure admin user exists (create if table is empty)
pub async fn ensure_admin_user_exists() -> Result<()> {
    if repository::count_users().await? > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let admin_id = service::create(CreateUserDto {
        username: "admin".to_string(),
        password: "admin".to_string(),
        email: None,
        full_name: Some("Administrator".to_string()),
        is_admin: true,
    })
    .await?;

    if let Err(e) = notifications::notify(
        get_connection(),
        &admin_id,
        "Welcome",
        "Default administrator account. Please change the password.",
        None,
    )
    .await
    {
        tracing::warn!("Failed to create welcome notification: {}", e);
    }

    tracing::warn!("═══════════════════════════════════════════════");
    tracing::warn!("  Default admin user created!");
    tracing::warn!("  Username: admin");
    tracing::warn!("  Password: admin");
    tracing::warn!("  User ID: {}", admin_id);
    tracing::warn!("  ⚠️  PLEASE CHANGE THE PASSWORD IMMEDIATELY!");
    tracing::warn!("═══════════════════════════════════════════════");

    Ok(())
}
