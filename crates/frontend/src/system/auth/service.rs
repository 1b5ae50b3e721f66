//! Сессия пользователя.
//!
//! `AuthService` создаётся один раз в `App` и передаётся через context.
//! Жизненный цикл: `init` восстанавливает сессию из localStorage,
//! `sign_in` / `sign_out` открывают и закрывают её. Сервис уведомлений
//! запускается при появлении сессии и останавливается при выходе.

use contracts::system::auth::UserInfo;
use leptos::prelude::*;

use super::{api, storage};
use crate::system::notifications::service::NotificationService;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    fn signed_in(access_token: String, user_info: UserInfo) -> Self {
        Self {
            access_token: Some(access_token),
            user_info: Some(user_info),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user_info.is_some()
    }
}

#[derive(Clone, Copy)]
pub struct AuthService {
    state: RwSignal<AuthState>,
    /// Set after `init` finished, so the login page is not flashed on reload
    ready: RwSignal<bool>,
    notifications: NotificationService,
}

impl AuthService {
    pub fn new(notifications: NotificationService) -> Self {
        Self {
            state: RwSignal::new(AuthState::default()),
            ready: RwSignal::new(false),
            notifications,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(AuthState::is_authenticated)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.with(|s| s.user_info.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.state
            .with(|s| s.user_info.as_ref().map(|u| u.is_admin).unwrap_or(false))
    }

    /// Restore the session from stored tokens, refreshing the access token if it expired
    pub async fn init(&self) {
        if let Some(user) = self.restore().await {
            log::info!("Session restored for {}", user.username);
        }
        self.ready.set(true);
    }

    async fn restore(&self) -> Option<UserInfo> {
        let access_token = storage::get_access_token()?;

        if let Ok(user) = api::get_current_user(&access_token).await {
            self.open_session(access_token, user.clone());
            return Some(user);
        }

        let Some(refresh_token) = storage::get_refresh_token() else {
            storage::clear_tokens();
            return None;
        };

        let refreshed = match api::refresh_token(refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Session refresh failed: {}", e);
                storage::clear_tokens();
                return None;
            }
        };

        storage::save_access_token(&refreshed.access_token);
        match api::get_current_user(&refreshed.access_token).await {
            Ok(user) => {
                self.open_session(refreshed.access_token, user.clone());
                Some(user)
            }
            Err(e) => {
                log::warn!("Cannot load user after refresh: {}", e);
                storage::clear_tokens();
                None
            }
        }
    }

    pub async fn sign_in(&self, username: String, password: String) -> Result<(), String> {
        let response = api::login(username, password).await?;
        storage::save_tokens(&response.access_token, &response.refresh_token);
        self.open_session(response.access_token, response.user);
        Ok(())
    }

    pub async fn sign_out(&self) {
        self.notifications.stop();

        if let Some(refresh_token) = storage::get_refresh_token() {
            if let Err(e) = api::logout(refresh_token).await {
                log::warn!("Logout request failed: {}", e);
            }
        }

        storage::clear_tokens();
        self.state.set(AuthState::default());
    }

    fn open_session(&self, access_token: String, user: UserInfo) {
        self.state.set(AuthState::signed_in(access_token, user));
        self.notifications.start();
    }
}

/// Hook to access the auth service
pub fn use_auth() -> AuthService {
    expect_context::<AuthService>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_requires_token_and_user() {
        assert!(!AuthState::default().is_authenticated());

        let user = UserInfo {
            id: "u1".into(),
            username: "ana".into(),
            full_name: None,
            email: None,
            is_admin: false,
        };
        assert!(AuthState::signed_in("t".into(), user.clone()).is_authenticated());

        let token_only = AuthState {
            access_token: Some("t".into()),
            user_info: None,
        };
        assert!(!token_only.is_authenticated());
    }
}
