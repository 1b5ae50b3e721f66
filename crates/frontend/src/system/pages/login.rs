use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::system::auth::service::use_auth;

/// Форма входа. После успешного входа AppShell сам переключается на дашборды.
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let pending = RwSignal::new(false);

    let can_submit = move || {
        !pending.get() && !username.with(|u| u.trim().is_empty()) && !password.with(String::is_empty)
    };

    let submit = move || {
        if !can_submit() {
            return;
        }
        let login = username.get_untracked().trim().to_string();
        let secret = password.get_untracked();
        pending.set(true);
        error.set(None);

        spawn_local(async move {
            if let Err(e) = auth.sign_in(login, secret).await {
                log::warn!("Sign-in failed: {}", e);
                password.set(String::new());
                error.set(Some(e));
            }
            pending.set(false);
        });
    };

    view! {
        <div class="login-container">
            <form
                class="login-box"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    submit();
                }
            >
                <h1>"BI Dashboards"</h1>

                {move || error.get().map(|e| view! {
                    <MessageBar intent=MessageBarIntent::Error>
                        <MessageBarBody>{e}</MessageBarBody>
                    </MessageBar>
                })}

                <Space vertical=true>
                    <label class="form__label">"Логин"</label>
                    <Input value=username placeholder="admin" />
                    <label class="form__label">"Пароль"</label>
                    <Input value=password input_type=InputType::Password />
                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || !can_submit()
                    >
                        {move || if pending.get() { "Вход..." } else { "Войти" }}
                    </button>
                </Space>
            </form>
        </div>
    }
}
