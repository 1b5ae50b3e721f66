use contracts::shared::widgets::{css_grid_area, Widget, WidgetLayout};
use leptos::prelude::*;

use crate::widgets::renderers::WidgetRenderer;

/// Шаг перемещения/изменения размера на сетке
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAction {
    Left,
    Right,
    Up,
    Down,
    Wider,
    Narrower,
    Taller,
    Shorter,
}

impl LayoutAction {
    pub fn apply(self, layout: WidgetLayout) -> WidgetLayout {
        match self {
            LayoutAction::Left => layout.moved_by(-1, 0),
            LayoutAction::Right => layout.moved_by(1, 0),
            LayoutAction::Up => layout.moved_by(0, -1),
            LayoutAction::Down => layout.moved_by(0, 1),
            LayoutAction::Wider => layout.resized_by(1, 0),
            LayoutAction::Narrower => layout.resized_by(-1, 0),
            LayoutAction::Taller => layout.resized_by(0, 1),
            LayoutAction::Shorter => layout.resized_by(0, -1),
        }
    }

    fn label(self) -> (&'static str, &'static str) {
        match self {
            LayoutAction::Left => ("◀", "Влево"),
            LayoutAction::Right => ("▶", "Вправо"),
            LayoutAction::Up => ("▲", "Вверх"),
            LayoutAction::Down => ("▼", "Вниз"),
            LayoutAction::Wider => ("⇔+", "Шире"),
            LayoutAction::Narrower => ("⇔−", "Уже"),
            LayoutAction::Taller => ("⇕+", "Выше"),
            LayoutAction::Shorter => ("⇕−", "Ниже"),
        }
    }
}

const ACTIONS: [LayoutAction; 8] = [
    LayoutAction::Left,
    LayoutAction::Right,
    LayoutAction::Up,
    LayoutAction::Down,
    LayoutAction::Narrower,
    LayoutAction::Wider,
    LayoutAction::Shorter,
    LayoutAction::Taller,
];

#[component]
pub fn WidgetCard(
    widget: Widget,
    #[prop(into)] refresh: Signal<u32>,
    on_edit: Callback<Widget>,
    on_layout: Callback<(String, WidgetLayout)>,
    on_export: Callback<Widget>,
    on_delete: Callback<Widget>,
) -> impl IntoView {
    let layout = widget.layout;
    let style = css_grid_area(&layout);
    let title = widget.title();
    let stored = StoredValue::new(widget.clone());

    let layout_buttons = ACTIONS
        .into_iter()
        .filter(move |action| action.apply(layout) != layout)
        .map(move |action| {
            let (symbol, hint) = action.label();
            view! {
                <button
                    class="widget-card__tool"
                    title=hint
                    on:click=move |_| {
                        let id = stored.with_value(|w| w.id.clone());
                        on_layout.run((id, action.apply(layout)));
                    }
                >
                    {symbol}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="widget-card" style=style>
            <div class="widget-card__header">
                <span class="widget-card__title">{title}</span>
                <div class="widget-card__tools">
                    {layout_buttons}
                    <button class="widget-card__tool" title="Настроить" on:click=move |_| on_edit.run(stored.get_value())>
                        "✎"
                    </button>
                    <button class="widget-card__tool" title="CSV" on:click=move |_| on_export.run(stored.get_value())>
                        "⤓"
                    </button>
                    <button class="widget-card__tool" title="Удалить" on:click=move |_| on_delete.run(stored.get_value())>
                        "✕"
                    </button>
                </div>
            </div>
            <div class="widget-card__body">
                <WidgetRenderer widget_type=widget.widget_type config=widget.config refresh=refresh />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_stay_on_grid() {
        let l = WidgetLayout::new(0, 0, 3, 2);
        assert_eq!(LayoutAction::Left.apply(l), l);
        assert_eq!(LayoutAction::Right.apply(l), WidgetLayout::new(1, 0, 3, 2));
        assert_eq!(LayoutAction::Down.apply(l).y, 1);
        assert_eq!(LayoutAction::Wider.apply(l).w, 4);
        assert_eq!(LayoutAction::Shorter.apply(l).h, 1);

        let full = WidgetLayout::new(0, 0, 12, 1);
        assert_eq!(LayoutAction::Wider.apply(full), full);
        assert_eq!(LayoutAction::Shorter.apply(full), full);
    }
}
