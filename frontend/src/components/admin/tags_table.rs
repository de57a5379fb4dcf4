use quill_datagrid::{ColumnDef, ColumnSets, TableConfig};
use shared::TagRow;
use yew::prelude::*;

use crate::components::table::{GridRow, TableView};
use crate::hooks::use_data_table::{use_data_table, UseDataTableResult};
use crate::services::api::ApiClient;

pub const ROUTE: &str = "/admin/tags";
const ENDPOINT: &str = "/api/tags";

fn columns() -> ColumnSets {
    ColumnSets::new(vec![
        ColumnDef::new("name", "Name").sortable(),
        ColumnDef::new("slug", "Slug").sortable(),
        ColumnDef::new("posts_count", "Posts").sortable(),
    ])
    .with_compact(vec![
        ColumnDef::new("name", "Name").sortable(),
        ColumnDef::new("posts_count", "Posts").sortable(),
    ])
}

impl GridRow for TagRow {
    fn cell(&self, key: &str) -> Html {
        match key {
            "name" => html! { <strong>{&self.name}</strong> },
            "slug" => html! { <code>{&self.slug}</code> },
            "posts_count" => html! { <span class="count">{self.posts_count}</span> },
            _ => html! {},
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct TagsTableProps {
    pub api_client: ApiClient,
    pub on_error: Callback<String>,
}

#[function_component(TagsTable)]
pub fn tags_table(props: &TagsTableProps) -> Html {
    let UseDataTableResult { state, actions } = use_data_table::<TagRow>(
        TableConfig::new(ENDPOINT, columns()),
        ROUTE,
        &props.api_client,
        props.on_error.clone(),
    );

    html! {
        <TableView<TagRow> title="Tags" search_placeholder="Search tags..." {state} {actions} />
    }
}
