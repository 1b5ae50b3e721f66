use contracts::shared::data_source::QueryRows;
use contracts::shared::widgets::table_cells;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn TableView(rows: QueryRows) -> impl IntoView {
    let headers = rows
        .columns
        .clone()
        .into_iter()
        .map(|c| view! { <TableHeaderCell>{c}</TableHeaderCell> })
        .collect_view();

    let body = table_cells(&rows)
        .into_iter()
        .map(|cells| {
            let cells = cells
                .into_iter()
                .map(|text| {
                    view! {
                        <TableCell>
                            <TableCellLayout truncate=true>{text}</TableCellLayout>
                        </TableCell>
                    }
                })
                .collect_view();
            view! { <TableRow>{cells}</TableRow> }
        })
        .collect_view();

    let footer = format!(
        "{} строк{}",
        rows.rows.len(),
        if rows.truncated { " (показаны первые)" } else { "" }
    );

    view! {
        <div class="data-table">
            <Table>
                <TableHeader>
                    <TableRow>{headers}</TableRow>
                </TableHeader>
                <TableBody>{body}</TableBody>
            </Table>
            <div class="data-table__footer">{footer}</div>
        </div>
    }
}
