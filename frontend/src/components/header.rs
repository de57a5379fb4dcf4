use yew::prelude::*;

use super::admin::{pages_table, posts_table, tags_table, users_table};

/// The collections the admin can browse, one table each
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Pages,
    Posts,
    Tags,
    Users,
}

impl AdminTab {
    pub const ALL: [AdminTab; 4] = [AdminTab::Pages, AdminTab::Posts, AdminTab::Tags, AdminTab::Users];

    pub fn path(&self) -> &'static str {
        match self {
            AdminTab::Pages => pages_table::ROUTE,
            AdminTab::Posts => posts_table::ROUTE,
            AdminTab::Tags => tags_table::ROUTE,
            AdminTab::Users => users_table::ROUTE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Pages => "Pages",
            AdminTab::Posts => "Posts",
            AdminTab::Tags => "Tags",
            AdminTab::Users => "Users",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|tab| tab.path() == path)
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub active: AdminTab,
    pub on_select: Callback<AdminTab>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="header">
            <div class="container">
                <h1>{"Quill Admin"}</h1>
                <nav class="tabs">
                    {for AdminTab::ALL.into_iter().map(|tab| {
                        let onclick = props.on_select.reform(move |_: MouseEvent| tab);
                        html! {
                            <button
                                type="button"
                                class={classes!("tab", (tab == props.active).then_some("active"))}
                                {onclick}
                            >
                                {tab.label()}
                            </button>
                        }
                    })}
                </nav>
            </div>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_tab_from_path() {
        assert_eq!(AdminTab::from_path("/admin/users"), Some(AdminTab::Users));
        assert_eq!(AdminTab::from_path("/admin/tags/"), Some(AdminTab::Tags));
        assert_eq!(AdminTab::from_path("/"), None);
        assert_eq!(AdminTab::from_path("/admin/comments"), None);
    }

    #[wasm_bindgen_test]
    fn test_every_tab_round_trips_its_path() {
        for tab in AdminTab::ALL {
            assert_eq!(AdminTab::from_path(tab.path()), Some(tab));
        }
    }
}
