use quill_datagrid::TableSnapshot;
use yew::prelude::*;

use super::data_grid::{DataGrid, GridRow};
use super::pagination_bar::PaginationBar;
use super::per_page_select::PerPageSelect;
use super::search_box::SearchBox;
use super::selection_bar::SelectionBar;
use crate::hooks::use_data_table::DataTableActions;

#[derive(Properties, PartialEq)]
pub struct TableViewProps<T: GridRow> {
    pub title: AttrValue,
    pub state: TableSnapshot<T>,
    pub actions: DataTableActions<T>,
    #[prop_or(AttrValue::from("Search..."))]
    pub search_placeholder: AttrValue,
    /// Table-specific filter controls
    #[prop_or_default]
    pub children: Html,
}

/// Toolbar, grid and pagination of one admin table
#[function_component(TableView)]
pub fn table_view<T>(props: &TableViewProps<T>) -> Html
where
    T: GridRow,
{
    let state = &props.state;
    let actions = &props.actions;

    html! {
        <section class="table-section">
            <div class="table-toolbar">
                <h2>{&props.title}</h2>
                <SearchBox
                    value={state.search_text.clone()}
                    pending={state.search_pending}
                    placeholder={props.search_placeholder.clone()}
                    on_input={actions.on_search.clone()}
                />
                <div class="table-filters">
                    {props.children.clone()}
                </div>
                <PerPageSelect
                    options={state.per_page_options.clone()}
                    value={state.filters.per_page}
                    on_change={actions.on_per_page.clone()}
                />
                <button
                    type="button"
                    class="btn btn-secondary"
                    disabled={state.loading}
                    onclick={actions.on_reload.reform(|_: MouseEvent| ())}
                >
                    {"Refresh"}
                </button>
            </div>

            <SelectionBar
                count={state.selection.len()}
                on_clear={actions.on_clear_selection.clone()}
            />

            <DataGrid<T>
                rows={state.rows.clone()}
                columns={state.active_columns.clone()}
                selection={state.selection.clone()}
                sort_field={state.filters.sort_field.clone()}
                sort_direction={state.filters.sort_direction}
                loading={state.loading}
                on_sort={actions.on_sort.clone()}
                on_toggle_row={actions.on_toggle_row.clone()}
                on_toggle_page={actions.on_toggle_page.clone()}
            />

            <PaginationBar
                links={state.links.clone()}
                pagination={state.pagination.clone()}
                on_page={actions.on_page.clone()}
            />
        </section>
    }
}
