use quill_datagrid::ColumnDef;
use shared::SortDirection;
use yew::prelude::*;

/// Arrow shown next to the column the table is sorted by
pub fn sort_indicator(column: &str, sort_field: &str, direction: SortDirection) -> &'static str {
    if column != sort_field {
        return "";
    }
    match direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    }
}

fn aria_sort(column: &str, sort_field: &str, direction: SortDirection) -> &'static str {
    if column != sort_field {
        return "none";
    }
    match direction {
        SortDirection::Asc => "ascending",
        SortDirection::Desc => "descending",
    }
}

#[derive(Properties, PartialEq)]
pub struct SortableHeaderProps {
    pub column: ColumnDef,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub on_sort: Callback<String>,
}

#[function_component(SortableHeader)]
pub fn sortable_header(props: &SortableHeaderProps) -> Html {
    let column = &props.column;

    if !column.sortable {
        return html! { <th class={classes!("column", column.key.clone())}>{&column.label}</th> };
    }

    let onclick = {
        let key = column.key.clone();
        props.on_sort.reform(move |_: MouseEvent| key.clone())
    };
    let indicator = sort_indicator(&column.key, &props.sort_field, props.sort_direction);

    html! {
        <th
            class={classes!("column", "sortable", column.key.clone())}
            aria-sort={aria_sort(&column.key, &props.sort_field, props.sort_direction)}
        >
            <button type="button" class="sort-button" {onclick}>
                <span>{&column.label}</span>
                <span class="sort-indicator">{indicator}</span>
            </button>
        </th>
    }
}
