use quill_datagrid::{ColumnDef, ColumnSets, TableConfig};
use shared::{PageFilter, PageRow};
use yew::prelude::*;

use super::cells::{status_badge, status_options, status_value};
use crate::components::table::{FilterSelect, GridRow, TableView};
use crate::hooks::use_data_table::{use_data_table, UseDataTableResult};
use crate::services::api::ApiClient;

pub const ROUTE: &str = "/admin/pages";
const ENDPOINT: &str = "/api/pages";

fn columns() -> ColumnSets {
    ColumnSets::new(vec![
        ColumnDef::new("title", "Title").sortable(),
        ColumnDef::new("slug", "Slug").sortable(),
        ColumnDef::new("status", "Status").sortable(),
        ColumnDef::new("updated_at", "Updated").sortable(),
    ])
    .with_compact(vec![
        ColumnDef::new("title", "Title").sortable(),
        ColumnDef::new("status", "Status"),
    ])
}

impl GridRow for PageRow {
    fn cell(&self, key: &str) -> Html {
        match key {
            "title" => html! { <strong>{&self.title}</strong> },
            "slug" => html! { <code>{format!("/{}", self.slug)}</code> },
            "status" => status_badge(self.status),
            "updated_at" => html! { {&self.updated_at} },
            _ => html! {},
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct PagesTableProps {
    pub api_client: ApiClient,
    pub on_error: Callback<String>,
}

#[function_component(PagesTable)]
pub fn pages_table(props: &PagesTableProps) -> Html {
    let UseDataTableResult { state, actions } = use_data_table::<PageRow>(
        TableConfig::new(ENDPOINT, columns()),
        ROUTE,
        &props.api_client,
        props.on_error.clone(),
    );

    let selected_status = actions
        .table
        .extra_filters::<PageFilter>()
        .into_iter()
        .find_map(|filter| match filter {
            PageFilter::Status(status) => status,
        });

    let on_status = {
        let table = actions.table.clone();
        Callback::from(move |value: String| table.set_extra_filter(PageFilter::Status(value.parse().ok())))
    };

    html! {
        <TableView<PageRow> title="Pages" search_placeholder="Search title or slug..." {state} {actions}>
            <FilterSelect
                label="Status"
                options={status_options()}
                value={status_value(selected_status)}
                on_change={on_status}
            />
        </TableView<PageRow>>
    }
}
