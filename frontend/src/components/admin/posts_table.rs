use quill_datagrid::{ColumnDef, ColumnSets, TableConfig};
use shared::{FilterOption, PostFilter, PostRow, PublishStatus};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::cells::{id_options, id_value, optional_text, status_badge, status_options, status_value};
use crate::components::table::{FilterSelect, GridRow, TableView};
use crate::hooks::use_data_table::{use_data_table, UseDataTableResult};
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

pub const ROUTE: &str = "/admin/posts";
const ENDPOINT: &str = "/api/posts";

fn columns() -> ColumnSets {
    ColumnSets::new(vec![
        ColumnDef::new("title", "Title").sortable(),
        ColumnDef::new("author", "Author").sortable(),
        ColumnDef::new("category", "Category").sortable(),
        ColumnDef::new("status", "Status").sortable(),
        ColumnDef::new("published_at", "Published").sortable(),
    ])
    .with_compact(vec![
        ColumnDef::new("title", "Title").sortable(),
        ColumnDef::new("status", "Status"),
    ])
}

impl GridRow for PostRow {
    fn cell(&self, key: &str) -> Html {
        match key {
            "title" => html! { <strong>{&self.title}</strong> },
            "author" => html! { {&self.author} },
            "category" => optional_text(self.category.as_deref()),
            "status" => status_badge(self.status),
            "published_at" => optional_text(self.published_at.as_deref()),
            _ => html! {},
        }
    }
}

/// Current (status, category) selection
fn selected_filters(filters: Vec<PostFilter>) -> (Option<PublishStatus>, Option<i64>) {
    filters
        .into_iter()
        .fold((None, None), |(status, category), filter| match filter {
            PostFilter::Status(selected) => (selected, category),
            PostFilter::Category(selected) => (status, selected),
        })
}

#[derive(Properties, PartialEq)]
pub struct PostsTableProps {
    pub api_client: ApiClient,
    pub on_error: Callback<String>,
}

#[function_component(PostsTable)]
pub fn posts_table(props: &PostsTableProps) -> Html {
    let UseDataTableResult { state, actions } = use_data_table::<PostRow>(
        TableConfig::new(ENDPOINT, columns()),
        ROUTE,
        &props.api_client,
        props.on_error.clone(),
    );
    let categories = use_state(Vec::<FilterOption>::new);

    {
        let api_client = props.api_client.clone();
        let categories = categories.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.get_categories().await {
                    Ok(options) => categories.set(options),
                    Err(e) => Logger::error_with_component("PostsTable", &format!("Failed to load categories: {}", e)),
                }
            });
            || ()
        });
    }

    let (selected_status, selected_category) = selected_filters(actions.table.extra_filters::<PostFilter>());

    let on_status = {
        let table = actions.table.clone();
        Callback::from(move |value: String| table.set_extra_filter(PostFilter::Status(value.parse().ok())))
    };
    let on_category = {
        let table = actions.table.clone();
        Callback::from(move |value: String| table.set_extra_filter(PostFilter::Category(value.parse().ok())))
    };

    html! {
        <TableView<PostRow> title="Posts" search_placeholder="Search title or author..." {state} {actions}>
            <FilterSelect
                label="Status"
                options={status_options()}
                value={status_value(selected_status)}
                on_change={on_status}
            />
            <FilterSelect
                label="Category"
                options={id_options(&categories)}
                value={id_value(selected_category)}
                on_change={on_category}
            />
        </TableView<PostRow>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_selected_filters() {
        assert_eq!(selected_filters(Vec::new()), (None, None));
        assert_eq!(
            selected_filters(vec![
                PostFilter::Category(Some(3)),
                PostFilter::Status(Some(PublishStatus::Draft)),
            ]),
            (Some(PublishStatus::Draft), Some(3))
        );
    }
}
