use crate::app_shell::AppShell;
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::service::AuthService;
use crate::system::notifications::service::NotificationService;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn App() -> impl IntoView {
    // Services are created once here and passed down via context
    let notifications = NotificationService::new();
    let auth = AuthService::new(notifications);

    provide_context(AppGlobalContext::new());
    provide_context(notifications);
    provide_context(auth);

    spawn_local(async move {
        auth.init().await;
    });

    view! {
        <AppShell />
    }
}
