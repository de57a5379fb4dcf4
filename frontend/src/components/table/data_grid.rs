use quill_datagrid::{ColumnDef, RowSelection, TableRow};
use shared::SortDirection;
use yew::prelude::*;

use super::sortable_header::SortableHeader;

/// A row type the grid knows how to render, cell by column key
pub trait GridRow: TableRow {
    fn cell(&self, key: &str) -> Html;
}

#[derive(Properties, PartialEq)]
pub struct DataGridProps<T: GridRow> {
    pub rows: Vec<T>,
    pub columns: Vec<ColumnDef>,
    pub selection: RowSelection<T::Id>,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub loading: bool,
    pub on_sort: Callback<String>,
    pub on_toggle_row: Callback<T::Id>,
    pub on_toggle_page: Callback<()>,
}

#[function_component(DataGrid)]
pub fn data_grid<T>(props: &DataGridProps<T>) -> Html
where
    T: GridRow,
{
    let ids: Vec<T::Id> = props.rows.iter().map(TableRow::row_id).collect();
    let page_selected = props.selection.all_selected(&ids);
    let on_toggle_page = props.on_toggle_page.reform(|_: Event| ());

    html! {
        <div class={classes!("table-container", props.loading.then_some("loading"))}>
            <table class="data-grid">
                <thead>
                    <tr>
                        <th class="select-column">
                            <input
                                type="checkbox"
                                aria-label="Select page"
                                checked={page_selected}
                                disabled={ids.is_empty()}
                                onchange={on_toggle_page}
                            />
                        </th>
                        {for props.columns.iter().map(|column| html! {
                            <SortableHeader
                                column={column.clone()}
                                sort_field={props.sort_field.clone()}
                                sort_direction={props.sort_direction}
                                on_sort={props.on_sort.clone()}
                            />
                        })}
                    </tr>
                </thead>
                <tbody>
                    {if props.rows.is_empty() {
                        html! {
                            <tr>
                                <td class="empty" colspan={(props.columns.len() + 1).to_string()}>
                                    {if props.loading { "Loading..." } else { "No results" }}
                                </td>
                            </tr>
                        }
                    } else {
                        html! {
                            {for props.rows.iter().map(|row| {
                                let id = row.row_id();
                                let selected = props.selection.is_selected(&id);
                                let onchange = props.on_toggle_row.reform(move |_: Event| id.clone());

                                html! {
                                    <tr class={classes!(selected.then_some("selected"))}>
                                        <td class="select-column">
                                            <input type="checkbox" checked={selected} {onchange} />
                                        </td>
                                        {for props.columns.iter().map(|column| html! {
                                            <td class={column.key.clone()}>{row.cell(&column.key)}</td>
                                        })}
                                    </tr>
                                }
                            })}
                        }
                    }}
                </tbody>
            </table>
        </div>
    }
}
