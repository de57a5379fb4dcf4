use quill_datagrid::PageTarget;
use shared::{PageLink, PaginationEnvelope};
use yew::prelude::*;

/// "Showing 11 to 20 of 57 results"
pub fn summary_text(pagination: &PaginationEnvelope) -> String {
    if pagination.total == 0 {
        return "No results".to_string();
    }
    format!(
        "Showing {} to {} of {} results",
        pagination.from, pagination.to, pagination.total
    )
}

#[derive(Properties, PartialEq)]
pub struct PaginationBarProps {
    /// Windowed links; may differ from `pagination.links` on narrow screens
    pub links: Vec<PageLink>,
    pub pagination: PaginationEnvelope,
    pub on_page: Callback<PageTarget>,
}

#[function_component(PaginationBar)]
pub fn pagination_bar(props: &PaginationBarProps) -> Html {
    let render_link = |link: &PageLink| {
        let class = classes!(
            "page-link",
            link.active.then_some("active"),
            link.is_previous().then_some("previous"),
            link.is_next().then_some("next"),
        );

        match &link.url {
            Some(url) if !link.active => {
                let onclick = {
                    let url = url.clone();
                    props.on_page.reform(move |_: MouseEvent| PageTarget::Url(url.clone()))
                };
                html! {
                    <li><button type="button" {class} {onclick}>{&link.label}</button></li>
                }
            }
            _ => html! {
                <li>
                    <span class={classes!(class, link.is_disabled().then_some("disabled"))}
                        aria-current={link.active.then_some("page")}>
                        {&link.label}
                    </span>
                </li>
            },
        }
    };

    html! {
        <nav class="pagination" aria-label="Pagination">
            <span class="pagination-summary">{summary_text(&props.pagination)}</span>
            {if props.pagination.last_page() > 1 {
                html! { <ul class="pagination-links">{for props.links.iter().map(render_link)}</ul> }
            } else {
                html! {}
            }}
        </nav>
    }
}
