use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

const DASHBOARD_PARAM: &str = "dashboard";

/// Навигация приложения: открытый дашборд (None = список)
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub active_dashboard: RwSignal<Option<String>>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            active_dashboard: RwSignal::new(None),
        }
    }

    pub fn open_dashboard(&self, id: &str) {
        self.active_dashboard.set(Some(id.to_string()));
    }

    pub fn close_dashboard(&self) {
        self.active_dashboard.set(None);
    }

    /// Синхронизация с `?dashboard=<id>`: начальное значение из URL,
    /// дальше URL следует за сигналом
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if let Some(id) = dashboard_from_query(&search) {
            self.active_dashboard.set(Some(id));
        }

        let this = *self;
        Effect::new(move |_| {
            let new_url = query_for(this.active_dashboard.get().as_deref());

            let Some(w) = window() else {
                return;
            };
            let current_search = w.location().search().unwrap_or_default();
            if current_search != new_url {
                if let Ok(history) = w.history() {
                    // Пустая строка не меняет URL, поэтому для списка оставляем путь
                    let target = if new_url.is_empty() {
                        w.location().pathname().unwrap_or_else(|_| "/".to_string())
                    } else {
                        new_url
                    };
                    let _ = history.replace_state_with_url(
                        &wasm_bindgen::JsValue::NULL,
                        "",
                        Some(&target),
                    );
                }
            }
        });
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

fn dashboard_from_query(search: &str) -> Option<String> {
    let params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params
        .get(DASHBOARD_PARAM)
        .filter(|id| !id.is_empty())
        .cloned()
}

fn query_for(dashboard: Option<&str>) -> String {
    match dashboard {
        Some(id) => {
            let query = serde_qs::to_string(&HashMap::from([(DASHBOARD_PARAM, id)]))
                .unwrap_or_default();
            format!("?{}", query)
        }
        None => String::new(),
    }
}

pub fn use_global_context() -> AppGlobalContext {
    expect_context::<AppGlobalContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_dashboard_from_query_string() {
        assert_eq!(dashboard_from_query("?dashboard=abc-1").as_deref(), Some("abc-1"));
        assert_eq!(dashboard_from_query("?dashboard="), None);
        assert_eq!(dashboard_from_query(""), None);
        assert_eq!(dashboard_from_query("?active=x"), None);
    }

    #[test]
    fn query_round_trip() {
        let q = query_for(Some("d 1"));
        assert!(q.starts_with("?dashboard="));
        assert_eq!(dashboard_from_query(&q).as_deref(), Some("d 1"));
        assert_eq!(query_for(None), "");
    }
}
