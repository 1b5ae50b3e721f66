//! Диалог создания/редактирования виджета: тип, таблица, редактор,
//! предпросмотр запроса и данных.

use contracts::shared::dashboards::{InsertWidgetRequest, UpdateWidgetRequest};
use contracts::shared::data_source::SchemaTable;
use contracts::shared::widgets::{Widget, WidgetConfig, WidgetType};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::editors::WidgetEditor;
use super::metadata::{use_table_columns, TablePicker};
use super::renderers::{query_for, WidgetRenderer};
use crate::shared::rpc;

/// Switch the draft to another widget type, keeping the table and display fields
pub fn reset_for_type(config: &WidgetConfig, widget_type: WidgetType) -> WidgetConfig {
    WidgetConfig {
        widget_type: Some(widget_type),
        table: config.table.clone(),
        schema: config.schema.clone(),
        title: config.title.clone(),
        color: config.color.clone(),
        ..Default::default()
    }
}

/// Point the draft at another table; column choices of the old table are dropped
pub fn with_table(config: &WidgetConfig, table: &SchemaTable) -> WidgetConfig {
    if config.table.as_deref() == Some(table.table_name.as_str()) {
        return config.clone();
    }
    WidgetConfig {
        widget_type: config.widget_type,
        table: Some(table.table_name.clone()),
        schema: Some(table.table_schema.clone()),
        title: config.title.clone(),
        color: config.color.clone(),
        min: config.min,
        max: config.max,
        ..Default::default()
    }
}

#[component]
pub fn WidgetDialog(
    open: RwSignal<bool>,
    #[prop(into)] dashboard_id: Signal<String>,
    /// `None`: новый виджет
    editing: RwSignal<Option<Widget>>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let widget_type = RwSignal::new(WidgetType::Kpi);
    let draft = RwSignal::new(WidgetConfig::new(WidgetType::Kpi));
    let saving = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    // Инициализация черновика при каждом открытии
    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        error.set(None);
        match editing.get_untracked() {
            Some(w) => {
                widget_type.set(w.widget_type);
                let mut config = w.config.clone();
                config.widget_type = Some(w.widget_type);
                draft.set(config);
            }
            None => {
                widget_type.set(WidgetType::Kpi);
                draft.set(WidgetConfig::new(WidgetType::Kpi));
            }
        }
    });

    let table = Signal::derive(move || draft.with(|c| c.table.clone()));
    let schema = Signal::derive(move || draft.with(|c| c.schema.clone()));
    let columns = use_table_columns(table, schema);

    let is_new = move || editing.with(Option::is_none);
    let sql = move || query_for(widget_type.get(), &draft.get());

    let on_type = move |ev| {
        if let Some(t) = WidgetType::parse(&event_target_value(&ev)) {
            widget_type.set(t);
            draft.update(|c| *c = reset_for_type(c, t));
        }
    };

    let on_table = Callback::new(move |t: SchemaTable| draft.update(|c| *c = with_table(c, &t)));
    let on_change = Callback::new(move |config: WidgetConfig| draft.set(config));

    let save = move |_| {
        let config = draft.get_untracked();
        let t = widget_type.get_untracked();
        let target = editing.get_untracked().map(|w| w.id);
        let dashboard = dashboard_id.get_untracked();

        saving.set(true);
        error.set(None);
        spawn_local(async move {
            let result = match target {
                Some(id) => rpc::update_widget(UpdateWidgetRequest {
                    p_widget_id: id,
                    p_config: Some(config),
                    p_layout: None,
                })
                .await,
                None => rpc::insert_widget(InsertWidgetRequest {
                    p_dashboard_id: dashboard,
                    p_widget_type: t.as_str().to_string(),
                    p_config: config,
                    p_layout: None,
                })
                .await,
            };
            saving.set(false);
            match result {
                Ok(w) => {
                    log::info!("Widget {} saved", w.id);
                    open.set(false);
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    view! {
        <Dialog open=open>
            <DialogSurface class="widget-dialog">
                <DialogBody>
                    <DialogTitle>
                        {move || if is_new() { "Новый виджет" } else { "Настройка виджета" }}
                    </DialogTitle>
                    <DialogContent>
                        <div class="widget-dialog__layout">
                            <div class="widget-dialog__form">
                                <div class="details-grid--2col">
                                    <div class="form__group">
                                        <label class="form__label">"Тип"</label>
                                        <select
                                            class="form__select"
                                            prop:value=move || widget_type.get().as_str()
                                            disabled=move || !is_new()
                                            on:change=on_type
                                        >
                                            {WidgetType::ALL
                                                .into_iter()
                                                .map(|t| view! {
                                                    <option value=t.as_str() selected=move || widget_type.get() == t>
                                                        {t.display_name()}
                                                    </option>
                                                })
                                                .collect_view()}
                                        </select>
                                    </div>
                                    <div class="form__group">
                                        <label class="form__label">"Заголовок"</label>
                                        <input
                                            class="form__input"
                                            prop:value=move || draft.with(|c| c.title.clone().unwrap_or_default())
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                draft.update(|c| c.title = (!value.is_empty()).then_some(value));
                                            }
                                        />
                                    </div>
                                </div>

                                <div class="form__group">
                                    <label class="form__label">"Таблица"</label>
                                    <TablePicker value=table on_select=on_table />
                                </div>

                                <Show when=move || table.get().is_some()>
                                    {move || columns.error.get().map(|e| view! { <div class="error-message">{e}</div> })}
                                    <Show when=move || columns.loading.get()>
                                        <Spinner size=SpinnerSize::Tiny />
                                    </Show>
                                    <WidgetEditor
                                        widget_type=widget_type
                                        config=draft
                                        columns=columns.columns
                                        on_change=on_change
                                    />
                                </Show>

                                <div class="form__group">
                                    <label class="form__label">"Цвет"</label>
                                    <input
                                        type="color"
                                        prop:value=move || draft.with(|c| c.color.clone().unwrap_or_else(|| "#2563eb".to_string()))
                                        on:change=move |ev| {
                                            let value = event_target_value(&ev);
                                            draft.update(|c| c.color = Some(value));
                                        }
                                    />
                                </div>
                            </div>

                            <div class="widget-dialog__preview">
                                <div class="widget-dialog__sql">
                                    {move || {
                                        let sql = sql();
                                        if sql.is_empty() { "— конфигурация неполная —".to_string() } else { sql }
                                    }}
                                </div>
                                <div class="widget-dialog__render">
                                    <WidgetRenderer widget_type=widget_type config=draft />
                                </div>
                            </div>
                        </div>

                        {move || error.get().map(|e| view! {
                            <MessageBar intent=MessageBarIntent::Error>
                                <MessageBarBody>{e}</MessageBarBody>
                            </MessageBar>
                        })}
                    </DialogContent>
                    <DialogActions>
                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=Signal::derive(move || saving.get())
                            on_click=save
                        >
                            {move || if saving.get() { "Сохранение…" } else { "Сохранить" }}
                        </Button>
                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| open.set(false)>
                            "Отмена"
                        </Button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}
