use contracts::system::notifications::Notification;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api;
use crate::shared::request_generation::RequestGeneration;

/// Период опроса счётчика непрочитанных
pub const POLL_INTERVAL_MS: u32 = 30_000;

/// Текст бейджа: пусто при нуле, "99+" для больших значений
pub fn badge_text(count: i64) -> Option<String> {
    match count {
        c if c <= 0 => None,
        c if c > 99 => Some("99+".to_string()),
        c => Some(c.to_string()),
    }
}

/// Уведомления текущей сессии.
///
/// Каждый `start` открывает новую сессию опроса; ответы, пришедшие после
/// `stop` (или после следующего `start`), отбрасываются.
#[derive(Clone, Copy)]
pub struct NotificationService {
    pub unread: RwSignal<i64>,
    pub items: RwSignal<Vec<Notification>>,
    pub error: RwSignal<Option<String>>,
    session: RequestGeneration,
    running: StoredValue<bool>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            unread: RwSignal::new(0),
            items: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            session: RequestGeneration::new(),
            running: StoredValue::new(false),
        }
    }

    pub fn start(&self) {
        if self.running.get_value() {
            return;
        }
        self.running.set_value(true);

        let session = self.session.next();
        let this = *self;
        spawn_local(async move {
            while this.session.is_current(session) {
                this.refresh_count(session).await;
                TimeoutFuture::new(POLL_INTERVAL_MS).await;
            }
            log::debug!("Notification polling session {} finished", session);
        });
    }

    pub fn stop(&self) {
        self.session.invalidate();
        let _ = self.running.try_set_value(false);
        let _ = self.unread.try_set(0);
        let _ = self.items.try_set(Vec::new());
        let _ = self.error.try_set(None);
    }

    async fn refresh_count(&self, session: u64) {
        let result = api::fetch_unread_count().await;
        if !self.session.is_current(session) {
            return;
        }
        match result {
            Ok(count) => self.unread.set(count),
            Err(e) => log::warn!("Unread count failed: {}", e),
        }
    }

    /// Load the dropdown list (and the count with it)
    pub fn load(&self) {
        let Some(session) = self.current_session() else {
            return;
        };
        let this = *self;
        spawn_local(async move {
            let result = api::fetch_notifications().await;
            if !this.session.is_current(session) {
                return;
            }
            match result {
                Ok(items) => {
                    this.unread
                        .set(items.iter().filter(|n| !n.is_read).count() as i64);
                    this.items.set(items);
                    this.error.set(None);
                }
                Err(e) => this.error.set(Some(e)),
            }
        });
    }

    pub fn mark_read(&self, id: String) {
        let this = *self;
        spawn_local(async move {
            match api::mark_read(&id).await {
                Ok(()) => this.load(),
                Err(e) => {
                    let _ = this.error.try_set(Some(e));
                }
            }
        });
    }

    pub fn mark_all_read(&self) {
        let this = *self;
        spawn_local(async move {
            match api::mark_all_read().await {
                Ok(()) => this.load(),
                Err(e) => {
                    let _ = this.error.try_set(Some(e));
                }
            }
        });
    }

    fn current_session(&self) -> Option<u64> {
        if self.running.try_get_value().unwrap_or(false) {
            // Читаем текущий номер, не открывая новую сессию
            Some(self.session.current())
        } else {
            None
        }
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notifications() -> NotificationService {
    expect_context::<NotificationService>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_text_caps_and_hides_zero() {
        assert_eq!(badge_text(0), None);
        assert_eq!(badge_text(-1), None);
        assert_eq!(badge_text(7).as_deref(), Some("7"));
        assert_eq!(badge_text(120).as_deref(), Some("99+"));
    }
}
