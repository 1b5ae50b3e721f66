//! Application Shell - корневые компоненты приложения
//!
//! Содержит:
//! - `AppShell` - auth gate (показывает LoginPage или MainLayout)
//! - `MainLayout` - шапка и текущая страница (список или дашборд)

use crate::dashboards::{DashboardPage, DashboardsList};
use crate::layout::global_context::use_global_context;
use crate::layout::Shell;
use crate::system::auth::service::use_auth;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;
use thaw::Spinner;

#[component]
fn MainLayout() -> impl IntoView {
    let ctx = use_global_context();

    // Initialize URL integration once when the layout is created
    ctx.init_router_integration();

    view! {
        <Shell>
            {move || match ctx.active_dashboard.get() {
                Some(id) => view! { <DashboardPage id=id /> }.into_any(),
                None => view! { <DashboardsList /> }.into_any(),
            }}
        </Shell>
    }
}

/// Application shell - auth gate component.
///
/// Пока сессия восстанавливается, показывает индикатор загрузки.
#[component]
pub fn AppShell() -> impl IntoView {
    let auth = use_auth();

    view! {
        <Show when=move || auth.is_ready() fallback=|| view! { <div class="app-loading"><Spinner /></div> }>
            <Show when=move || auth.is_authenticated() fallback=|| view! { <LoginPage /> }>
                <MainLayout />
            </Show>
        </Show>
    }
}
