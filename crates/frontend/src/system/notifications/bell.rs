use leptos::prelude::*;
use thaw::*;

use super::service::{badge_text, use_notifications};
use crate::shared::format::format_timestamp;

/// Колокольчик в шапке: счётчик непрочитанных и выпадающий список
#[component]
pub fn NotificationBell() -> impl IntoView {
    let notifications = use_notifications();
    let open = RwSignal::new(false);

    let toggle = move |_| {
        let next = !open.get_untracked();
        open.set(next);
        if next {
            notifications.load();
        }
    };

    view! {
        <div class="notification-bell">
            <button class="notification-bell__button" title="Уведомления" on:click=toggle>
                "🔔"
                {move || badge_text(notifications.unread.get()).map(|text| view! {
                    <Badge appearance=BadgeAppearance::Filled color=BadgeColor::Danger size=BadgeSize::Small>
                        {text}
                    </Badge>
                })}
            </button>

            <Show when=move || open.get()>
                <div class="notification-bell__dropdown">
                    <div class="notification-bell__header">
                        <span>"Уведомления"</span>
                        <Button
                            appearance=ButtonAppearance::Subtle
                            size=ButtonSize::Small
                            disabled=Signal::derive(move || notifications.unread.get() == 0)
                            on_click=move |_| notifications.mark_all_read()
                        >
                            "Прочитать все"
                        </Button>
                    </div>

                    {move || notifications.error.get().map(|e| view! {
                        <div class="error-message">{e}</div>
                    })}

                    <Show
                        when=move || !notifications.items.with(Vec::is_empty)
                        fallback=|| view! { <div class="notification-bell__empty">"Нет уведомлений"</div> }
                    >
                        <ul class="notification-bell__list">
                            <For
                                each=move || notifications.items.get()
                                key=|n| (n.id.clone(), n.is_read)
                                children=move |n| {
                                    let id = n.id.clone();
                                    let class = if n.is_read {
                                        "notification-item"
                                    } else {
                                        "notification-item notification-item--unread"
                                    };
                                    view! {
                                        <li class=class>
                                            <div class="notification-item__title">{n.title.clone()}</div>
                                            <div class="notification-item__message">{n.message.clone()}</div>
                                            <div class="notification-item__meta">
                                                <span>{format_timestamp(&n.created_at)}</span>
                                                {(!n.is_read).then(|| {
                                                    let id = id.clone();
                                                    view! {
                                                        <button
                                                            class="link-button"
                                                            on:click=move |_| notifications.mark_read(id.clone())
                                                        >
                                                            "Прочитано"
                                                        </button>
                                                    }
                                                })}
                                            </div>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
