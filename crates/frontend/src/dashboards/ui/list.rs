use contracts::shared::dashboards::DashboardSummary;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::api;
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_timestamp;

/// Черновик формы создания/переименования
#[derive(Clone, Copy)]
struct DashboardForm {
    open: RwSignal<bool>,
    /// `None`: создание
    target: RwSignal<Option<String>>,
    name: RwSignal<String>,
    description: RwSignal<String>,
}

impl DashboardForm {
    fn new() -> Self {
        Self {
            open: RwSignal::new(false),
            target: RwSignal::new(None),
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
        }
    }

    fn open_for(&self, existing: Option<&DashboardSummary>) {
        self.target.set(existing.map(|d| d.id.clone()));
        self.name
            .set(existing.map(|d| d.name.clone()).unwrap_or_default());
        self.description.set(
            existing
                .and_then(|d| d.description.clone())
                .unwrap_or_default(),
        );
        self.open.set(true);
    }
}

#[component]
pub fn DashboardsList() -> impl IntoView {
    let ctx = use_global_context();

    let (dashboards, set_dashboards) = signal(Vec::<DashboardSummary>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let form = DashboardForm::new();

    let reload = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::list_dashboards().await {
                Ok(list) => {
                    set_dashboards.set(list);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| reload());

    let submit = move |_| {
        let name = form.name.get_untracked();
        let description = Some(form.description.get_untracked()).filter(|d| !d.trim().is_empty());
        let target = form.target.get_untracked();

        spawn_local(async move {
            let result = match target {
                Some(id) => api::update_dashboard(&id, name, description).await,
                None => api::create_dashboard(name, description).await,
            };
            match result {
                Ok(dashboard) => {
                    form.open.set(false);
                    if target_is_new(&form) {
                        ctx.open_dashboard(&dashboard.id);
                    } else {
                        reload();
                    }
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let remove = move |d: DashboardSummary| {
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("Удалить дашборд «{}» со всеми виджетами?", d.name))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_dashboard(&d.id).await {
                Ok(()) => reload(),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                <h2>"Дашборды"</h2>
                <Button appearance=ButtonAppearance::Primary on_click=move |_| form.open_for(None)>
                    "Новый дашборд"
                </Button>
            </div>

            {move || error.get().map(|e| view! {
                <MessageBar intent=MessageBarIntent::Error>
                    <MessageBarBody>{e}</MessageBarBody>
                </MessageBar>
            })}

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <Show
                    when=move || !dashboards.with(Vec::is_empty)
                    fallback=|| view! { <div class="text-muted">"Дашбордов пока нет"</div> }
                >
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Название"</TableHeaderCell>
                                <TableHeaderCell>"Описание"</TableHeaderCell>
                                <TableHeaderCell>"Виджетов"</TableHeaderCell>
                                <TableHeaderCell>"Изменён"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || dashboards.get()
                                key=|d| (d.id.clone(), d.updated_at.clone())
                                children=move |d| {
                                    let open_id = d.id.clone();
                                    let name = d.name.clone();
                                    let description = d.description.clone().unwrap_or_default();
                                    let widget_count = d.widget_count;
                                    let updated = format_timestamp(&d.updated_at);
                                    let edit_item = d.clone();
                                    let remove_item = d;
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <a class="link" on:click=move |_| ctx.open_dashboard(&open_id)>
                                                    {name}
                                                </a>
                                            </TableCell>
                                            <TableCell>{description}</TableCell>
                                            <TableCell>{widget_count}</TableCell>
                                            <TableCell>{updated}</TableCell>
                                            <TableCell>
                                                <Space gap=SpaceGap::Small>
                                                    <Button
                                                        size=ButtonSize::Small
                                                        on_click=move |_| form.open_for(Some(&edit_item))
                                                    >
                                                        "Переименовать"
                                                    </Button>
                                                    <Button
                                                        size=ButtonSize::Small
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| remove(remove_item.clone())
                                                    >
                                                        "Удалить"
                                                    </Button>
                                                </Space>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </Show>
            </Show>

            <Dialog open=form.open>
                <DialogSurface>
                    <DialogBody>
                        <DialogTitle>
                            {move || if target_is_new(&form) { "Новый дашборд" } else { "Переименовать дашборд" }}
                        </DialogTitle>
                        <DialogContent>
                            <div class="form__group">
                                <label class="form__label">"Название"</label>
                                <Input value=form.name placeholder="Продажи по регионам" />
                            </div>
                            <div class="form__group">
                                <label class="form__label">"Описание"</label>
                                <Textarea value=form.description />
                            </div>
                        </DialogContent>
                        <DialogActions>
                            <Button
                                appearance=ButtonAppearance::Primary
                                disabled=Signal::derive(move || form.name.with(|n| n.trim().is_empty()))
                                on_click=submit
                            >
                                "Сохранить"
                            </Button>
                            <Button appearance=ButtonAppearance::Subtle on_click=move |_| form.open.set(false)>
                                "Отмена"
                            </Button>
                        </DialogActions>
                    </DialogBody>
                </DialogSurface>
            </Dialog>
        </div>
    }
}

fn target_is_new(form: &DashboardForm) -> bool {
    form.target.with(Option::is_none)
}
