//! Таблицы и колонки схемы данных для редакторов.
//!
//! Колонки запрашиваются заново при каждом выборе таблицы, без общего кеша.

use std::future::Future;

use contracts::shared::data_source::{ColumnInfo, SchemaTable};
use contracts::shared::widgets::Aggregation;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::request_generation::RequestGeneration;
use crate::shared::rpc;

/// Задержка поиска таблиц после последнего ввода
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Tables whose name contains `query` (case-insensitive), sorted by name
pub fn filter_tables(tables: &[SchemaTable], query: &str) -> Vec<SchemaTable> {
    let needle = query.trim().to_lowercase();
    let mut found: Vec<SchemaTable> = tables
        .iter()
        .filter(|t| needle.is_empty() || t.table_name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.table_name.cmp(&b.table_name));
    found
}

/// SUM/AVG/MIN/MAX take numeric columns only; COUNT takes any column
pub fn offers_numeric_only(aggregation: Option<Aggregation>) -> bool {
    !matches!(aggregation, Some(Aggregation::Count))
}

/// Columns offered as the value of `aggregation`
pub fn value_columns(columns: &[ColumnInfo], aggregation: Option<Aggregation>) -> Vec<ColumnInfo> {
    if offers_numeric_only(aggregation) {
        columns.iter().filter(|c| c.is_numeric()).cloned().collect()
    } else {
        columns.to_vec()
    }
}

/// Keep `current` only if it is still offered
pub fn keep_if_offered(current: Option<String>, offered: &[ColumnInfo]) -> Option<String> {
    current.filter(|name| offered.iter().any(|c| &c.column_name == name))
}

/// Ждёт паузу ввода. `false`, если за время паузы начался более новый поиск;
/// пустой запрос уходит сразу.
pub async fn settle_input(
    generation: RequestGeneration,
    ticket: u64,
    query: &str,
    pause: impl Future<Output = ()>,
) -> bool {
    if !query.is_empty() {
        pause.await;
    }
    generation.is_current(ticket)
}

/// Колонки выбранной таблицы; перезапрашиваются при смене таблицы
#[derive(Clone, Copy)]
pub struct TableColumns {
    pub columns: RwSignal<Vec<ColumnInfo>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

pub fn use_table_columns(table: Signal<Option<String>>, schema: Signal<Option<String>>) -> TableColumns {
    let state = TableColumns {
        columns: RwSignal::new(Vec::new()),
        loading: RwSignal::new(false),
        error: RwSignal::new(None),
    };
    let generation = RequestGeneration::new();

    Effect::new(move |_| {
        let table = table.get().filter(|t| !t.is_empty());
        let schema = schema.get();
        let ticket = generation.next();

        let Some(table) = table else {
            state.columns.set(Vec::new());
            state.loading.set(false);
            state.error.set(None);
            return;
        };

        state.loading.set(true);
        state.error.set(None);
        spawn_local(async move {
            let result = rpc::get_table_columns(table, schema).await;
            if !generation.is_current(ticket) {
                return;
            }
            match result {
                Ok(columns) => state.columns.set(columns),
                Err(e) => {
                    state.columns.set(Vec::new());
                    state.error.set(Some(e));
                }
            }
            state.loading.set(false);
        });
    });

    state
}

/// Выбор таблицы с поиском (debounce + счётчик поколений)
#[component]
pub fn TablePicker(
    #[prop(into)] value: Signal<Option<String>>,
    on_select: Callback<SchemaTable>,
) -> impl IntoView {
    let search = RwSignal::new(String::new());
    let tables = RwSignal::new(Vec::<SchemaTable>::new());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let generation = RequestGeneration::new();

    Effect::new(move |_| {
        let query = search.get();
        let ticket = generation.next();
        loading.set(true);

        spawn_local(async move {
            let pause = TimeoutFuture::new(SEARCH_DEBOUNCE_MS);
            if !settle_input(generation, ticket, &query, pause).await {
                return;
            }

            let result = rpc::get_schema_tables().await;
            // Ответ на устаревший ввод отбрасывается
            if !generation.is_current(ticket) {
                return;
            }
            match result {
                Ok(all) => {
                    tables.set(filter_tables(&all, &query));
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    view! {
        <div class="table-picker">
            <input
                type="search"
                class="form__input"
                placeholder="Поиск таблицы…"
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
            <ul class="table-picker__list">
                <For
                    each=move || tables.get()
                    key=|t| format!("{}.{}", t.table_schema, t.table_name)
                    children=move |t| {
                        let name = t.table_name.clone();
                        let selected = {
                            let name = name.clone();
                            move || value.get().as_deref() == Some(name.as_str())
                        };
                        view! {
                            <li
                                class="table-picker__item"
                                class:table-picker__item--selected=selected
                                on:click=move |_| on_select.run(t.clone())
                            >
                                {name}
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || loading.get()>
                <div class="table-picker__loading">"Загрузка…"</div>
            </Show>
            <Show when=move || !loading.get() && tables.with(Vec::is_empty) && error.with(Option::is_none)>
                <div class="table-picker__empty">"Таблицы не найдены"</div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn table(name: &str) -> SchemaTable {
        SchemaTable {
            table_schema: "be_exponential".into(),
            table_name: name.into(),
        }
    }

    fn column(name: &str, data_type: &str) -> ColumnInfo {
        ColumnInfo {
            column_name: name.into(),
            data_type: data_type.into(),
        }
    }

    #[test]
    fn filters_tables_case_insensitively() {
        let tables = [table("ventas"), table("clientes"), table("Ventas_2023")];
        let names: Vec<_> = filter_tables(&tables, " VENT ")
            .into_iter()
            .map(|t| t.table_name)
            .collect();
        assert_eq!(names, ["Ventas_2023", "ventas"]);
        assert_eq!(filter_tables(&tables, "").len(), 3);
    }

    #[test]
    fn numeric_columns_for_value_aggregations() {
        let columns = [column("region", "text"), column("monto", "real"), column("id", "integer")];

        let sum: Vec<_> = value_columns(&columns, Some(Aggregation::Sum))
            .into_iter()
            .map(|c| c.column_name)
            .collect();
        assert_eq!(sum, ["monto", "id"]);
        assert_eq!(value_columns(&columns, Some(Aggregation::Max)).len(), 2);
        assert_eq!(value_columns(&columns, Some(Aggregation::Count)).len(), 3);
    }

    #[test]
    fn keystroke_during_pause_drops_the_older_search() {
        let owner = Owner::new();
        owner.set();
        let generation = RequestGeneration::new();

        let older = generation.next();
        let typed_again = async {
            generation.next();
        };
        assert!(!block_on(settle_input(generation, older, "ve", typed_again)));

        let latest = generation.current();
        assert!(block_on(settle_input(generation, latest, "ven", async {})));
    }

    #[test]
    fn empty_search_skips_the_pause() {
        let owner = Owner::new();
        owner.set();
        let generation = RequestGeneration::new();

        let ticket = generation.next();
        let pause = async {
            generation.next();
        };
        assert!(block_on(settle_input(generation, ticket, "", pause)));
    }

    #[test]
    fn drops_selection_that_is_no_longer_offered() {
        let offered = [column("monto", "real")];
        assert_eq!(keep_if_offered(Some("region".into()), &offered), None);
        assert_eq!(
            keep_if_offered(Some("monto".into()), &offered).as_deref(),
            Some("monto")
        );
    }
}
