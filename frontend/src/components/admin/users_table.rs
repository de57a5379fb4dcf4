use quill_datagrid::{ColumnDef, ColumnSets, TableConfig};
use shared::{FilterOption, UserFilter, UserRow};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::cells::{id_options, id_value};
use crate::components::table::{FilterSelect, GridRow, TableView};
use crate::hooks::use_data_table::{use_data_table, UseDataTableResult};
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

pub const ROUTE: &str = "/admin/users";
const ENDPOINT: &str = "/api/users";

fn columns() -> ColumnSets {
    ColumnSets::new(vec![
        ColumnDef::new("name", "Name").sortable(),
        ColumnDef::new("email", "Email").sortable(),
        ColumnDef::new("role", "Role").sortable(),
        ColumnDef::new("joined_at", "Joined").sortable(),
    ])
    .with_compact(vec![
        ColumnDef::new("name", "Name").sortable(),
        ColumnDef::new("role", "Role"),
    ])
}

impl GridRow for UserRow {
    fn cell(&self, key: &str) -> Html {
        match key {
            "name" => html! { <strong>{&self.name}</strong> },
            "email" => html! { <a href={format!("mailto:{}", self.email)}>{&self.email}</a> },
            "role" => html! { <span class="role">{&self.role}</span> },
            "joined_at" => html! { {&self.joined_at} },
            _ => html! {},
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct UsersTableProps {
    pub api_client: ApiClient,
    pub on_error: Callback<String>,
}

#[function_component(UsersTable)]
pub fn users_table(props: &UsersTableProps) -> Html {
    let UseDataTableResult { state, actions } = use_data_table::<UserRow>(
        TableConfig::new(ENDPOINT, columns()),
        ROUTE,
        &props.api_client,
        props.on_error.clone(),
    );
    let roles = use_state(Vec::<FilterOption>::new);

    {
        let api_client = props.api_client.clone();
        let roles = roles.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.get_roles().await {
                    Ok(options) => roles.set(options),
                    Err(e) => Logger::error_with_component("UsersTable", &format!("Failed to load roles: {}", e)),
                }
            });
            || ()
        });
    }

    let selected_role = actions
        .table
        .extra_filters::<UserFilter>()
        .into_iter()
        .find_map(|filter| match filter {
            UserFilter::Role(id) => id,
        });

    let on_role = {
        let table = actions.table.clone();
        Callback::from(move |value: String| table.set_extra_filter(UserFilter::Role(value.parse().ok())))
    };

    html! {
        <TableView<UserRow> title="Users" search_placeholder="Search name or email..." {state} {actions}>
            <FilterSelect
                label="Role"
                options={id_options(&roles)}
                value={id_value(selected_role)}
                on_change={on_role}
            />
        </TableView<UserRow>>
    }
}
