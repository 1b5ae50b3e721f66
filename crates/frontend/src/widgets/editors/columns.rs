use contracts::shared::data_source::ColumnInfo;
use contracts::shared::widgets::WidgetConfig;
use leptos::prelude::*;

use super::patch;

/// Toggle `name` in the selection, keeping table column order
pub fn toggle_column(selected: &[String], name: &str, table_order: &[ColumnInfo]) -> Vec<String> {
    let mut next: Vec<String> = selected.to_vec();
    if let Some(pos) = next.iter().position(|c| c == name) {
        next.remove(pos);
    } else {
        next.push(name.to_string());
    }
    next.sort_by_key(|c| {
        table_order
            .iter()
            .position(|t| &t.column_name == c)
            .unwrap_or(usize::MAX)
    });
    next
}

/// Мультивыбор колонок для таблицы данных
#[component]
pub fn TableColumnsEditor(
    #[prop(into)] config: Signal<WidgetConfig>,
    #[prop(into)] columns: Signal<Vec<ColumnInfo>>,
    on_change: Callback<WidgetConfig>,
) -> impl IntoView {
    let selected = move || config.with(|c| c.columns.clone().unwrap_or_default());

    let toggle = move |name: String| {
        let order = columns.get_untracked();
        patch(config, on_change, |c| {
            let current = c.columns.clone().unwrap_or_default();
            c.columns = Some(toggle_column(&current, &name, &order));
        });
    };

    let select_all = move |_| {
        let all: Vec<String> = columns
            .get_untracked()
            .into_iter()
            .map(|c| c.column_name)
            .collect();
        patch(config, on_change, |c| c.columns = Some(all));
    };

    let clear = move |_| patch(config, on_change, |c| c.columns = Some(Vec::new()));

    view! {
        <div class="form__group">
            <div class="editor-columns__header">
                <label class="form__label">"Колонки"</label>
                <button type="button" class="link-button" on:click=select_all>"Все"</button>
                <button type="button" class="link-button" on:click=clear>"Сбросить"</button>
            </div>
            <div class="editor-columns__list">
                <For
                    each=move || columns.get()
                    key=|c| c.column_name.clone()
                    children=move |c| {
                        let name = c.column_name.clone();
                        let checked = {
                            let name = name.clone();
                            move || selected().contains(&name)
                        };
                        view! {
                            <label class="editor-columns__item">
                                <input
                                    type="checkbox"
                                    prop:checked=checked
                                    on:change=move |_| toggle(name.clone())
                                />
                                {c.column_name.clone()}
                                <span class="text-muted">{format!(" {}", c.data_type)}</span>
                            </label>
                        }
                    }
                />
            </div>
            <Show when=move || selected().is_empty()>
                <div class="text-muted">"Выберите хотя бы одну колонку"</div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<ColumnInfo> {
        names
            .iter()
            .map(|n| ColumnInfo {
                column_name: n.to_string(),
                data_type: "text".into(),
            })
            .collect()
    }

    #[test]
    fn toggling_keeps_table_order() {
        let order = cols(&["id", "fecha", "region", "monto"]);
        let selected = vec!["monto".to_string()];
        let next = toggle_column(&selected, "fecha", &order);
        assert_eq!(next, ["fecha", "monto"]);
        let next = toggle_column(&next, "monto", &order);
        assert_eq!(next, ["fecha"]);
    }
}
