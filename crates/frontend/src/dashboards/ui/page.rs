use contracts::shared::dashboards::{Dashboard, UpdateWidgetRequest};
use contracts::shared::widgets::{Widget, WidgetLayout, GRID_COLUMNS};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::widget_card::WidgetCard;
use crate::layout::global_context::use_global_context;
use crate::shared::export::download_widget_csv;
use crate::shared::request_generation::RequestGeneration;
use crate::shared::rpc;
use crate::widgets::dialog::WidgetDialog;

/// Ключ для `<For>`: меняется при любом изменении виджета
fn widget_key(widget: &Widget) -> String {
    serde_json::to_string(widget).unwrap_or_else(|_| widget.id.clone())
}

/// Страница дашборда: сетка виджетов. После любой мутации дашборд
/// перечитывается целиком через `get_dashboard_details`.
#[component]
pub fn DashboardPage(#[prop(into)] id: Signal<String>) -> impl IntoView {
    let ctx = use_global_context();

    let dashboard = RwSignal::new(None::<Dashboard>);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let refresh = RwSignal::new(0u32);
    let generation = RequestGeneration::new();

    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(None::<Widget>);

    let reload = move || {
        let ticket = generation.next();
        let dashboard_id = id.get_untracked();
        set_loading.set(true);
        spawn_local(async move {
            let result = rpc::get_dashboard_details(dashboard_id).await;
            if !generation.is_current(ticket) {
                return;
            }
            match result {
                Ok(d) => {
                    dashboard.set(Some(d));
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        id.track();
        dashboard.set(None);
        reload();
    });

    let on_edit = Callback::new(move |w: Widget| {
        editing.set(Some(w));
        dialog_open.set(true);
    });

    let add_widget = move |_| {
        editing.set(None);
        dialog_open.set(true);
    };

    let on_layout = Callback::new(move |(widget_id, layout): (String, WidgetLayout)| {
        spawn_local(async move {
            let request = UpdateWidgetRequest {
                p_widget_id: widget_id,
                p_config: None,
                p_layout: Some(layout),
            };
            match rpc::update_widget(request).await {
                Ok(_) => reload(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    let on_delete = Callback::new(move |w: Widget| {
        let confirmed = web_sys::window()
            .and_then(|win| {
                win.confirm_with_message(&format!("Удалить виджет «{}»?", w.title()))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match rpc::delete_widget(w.id.clone()).await {
                Ok(()) => reload(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    let on_export = Callback::new(move |w: Widget| {
        spawn_local(async move {
            let filename = format!("{}.csv", w.title());
            if let Err(e) = download_widget_csv(&w.id, &filename).await {
                set_error.set(Some(e));
            }
        });
    });

    let on_saved = Callback::new(move |_: ()| reload());

    let grid_style = format!(
        "display: grid; grid-template-columns: repeat({}, minmax(0, 1fr)); grid-auto-rows: 90px; gap: 12px;",
        GRID_COLUMNS
    );

    view! {
        <div class="page">
            <div class="page__header">
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| ctx.close_dashboard()>
                    "← Дашборды"
                </Button>
                <div class="page__title">
                    <h2>{move || dashboard.with(|d| d.as_ref().map(|d| d.name.clone()).unwrap_or_default())}</h2>
                    <span class="text-muted">
                        {move || dashboard.with(|d| d.as_ref().and_then(|d| d.description.clone()).unwrap_or_default())}
                    </span>
                </div>
                <Space gap=SpaceGap::Small>
                    <Button on_click=move |_| refresh.update(|r| *r += 1)>"Обновить"</Button>
                    <Button appearance=ButtonAppearance::Primary on_click=add_widget>
                        "Добавить виджет"
                    </Button>
                </Space>
            </div>

            {move || error.get().map(|e| view! {
                <MessageBar intent=MessageBarIntent::Error>
                    <MessageBarBody>{e}</MessageBarBody>
                </MessageBar>
            })}

            <Show when=move || loading.get() && dashboard.with(Option::is_none)>
                <Spinner />
            </Show>

            <Show when=move || dashboard.with(|d| d.as_ref().map(|d| d.widgets.is_empty()).unwrap_or(false))>
                <div class="text-muted">"На дашборде пока нет виджетов"</div>
            </Show>

            <div class="dashboard-grid" style=grid_style>
                <For
                    each=move || dashboard.with(|d| d.as_ref().map(|d| d.widgets.clone()).unwrap_or_default())
                    key=widget_key
                    children=move |w| view! {
                        <WidgetCard
                            widget=w
                            refresh=refresh
                            on_edit=on_edit
                            on_layout=on_layout
                            on_export=on_export
                            on_delete=on_delete
                        />
                    }
                />
            </div>

            <WidgetDialog open=dialog_open dashboard_id=id editing=editing on_saved=on_saved />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::widgets::{WidgetConfig, WidgetType};

    #[test]
    fn key_changes_with_layout() {
        let mut w = Widget {
            id: "w1".into(),
            dashboard_id: "d1".into(),
            widget_type: WidgetType::Kpi,
            config: WidgetConfig::default(),
            layout: WidgetLayout::default(),
            query: None,
        };
        let before = widget_key(&w);
        w.layout = w.layout.moved_by(1, 0);
        assert_ne!(before, widget_key(&w));
    }
}
