//! TopHeader component - application top navigation bar.
//!
//! Contains:
//! - Application title (click returns to the dashboards list)
//! - Notification bell
//! - User info and sign out

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::layout::global_context::use_global_context;
use crate::system::auth::service::use_auth;
use crate::system::notifications::bell::NotificationBell;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_global_context();
    let auth = use_auth();

    let logout = move |_| {
        spawn_local(async move {
            auth.sign_out().await;
        });
    };

    let user_label = move || {
        auth.user()
            .map(|u| {
                if u.is_admin {
                    format!("{} (admin)", u.display_name())
                } else {
                    u.display_name().to_string()
                }
            })
            .unwrap_or_default()
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <span class="top-header__title" on:click=move |_| ctx.close_dashboard()>
                    "BI Dashboards"
                </span>
            </div>

            <div class="top-header__actions">
                <NotificationBell />
                <span class="top-header__user">{user_label}</span>
                <button class="top-header__icon-btn" title="Выйти" on:click=logout>
                    "Выйти"
                </button>
            </div>
        </div>
    }
}
