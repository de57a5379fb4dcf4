use gloo::events::EventListener;
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::admin::{PagesTable, PostsTable, TagsTable, UsersTable};
use components::{AdminTab, Header, NoticeBanner};
use services::api::ApiClient;
use services::logging::Logger;
use services::navigation::{current_path, push_history, replace_history};

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new());
    let active_tab = use_state(|| AdminTab::from_path(&current_path()).unwrap_or_default());
    let notice = use_state(|| None::<String>);

    // Normalize the address and follow back/forward between tabs
    {
        let active_tab = active_tab.clone();
        use_effect_with((), move |_| {
            if AdminTab::from_path(&current_path()).is_none() {
                replace_history(active_tab.path());
            }
            Logger::info_with_component("App", &format!("Admin opened on {}", active_tab.label()));

            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "popstate", move |_| {
                    if let Some(tab) = AdminTab::from_path(&current_path()) {
                        active_tab.set(tab);
                    }
                })
            });

            move || drop(listener)
        });
    }

    let on_select = {
        let active_tab = active_tab.clone();
        let notice = notice.clone();
        Callback::from(move |tab: AdminTab| {
            if tab != *active_tab {
                push_history(tab.path());
                notice.set(None);
                active_tab.set(tab);
            }
        })
    };

    let on_error = {
        let notice = notice.clone();
        Callback::from(move |message: String| notice.set(Some(message)))
    };

    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_: ()| notice.set(None))
    };

    let api_client = (*api_client).clone();
    let table = match *active_tab {
        AdminTab::Pages => html! { <PagesTable key="pages" {api_client} {on_error} /> },
        AdminTab::Posts => html! { <PostsTable key="posts" {api_client} {on_error} /> },
        AdminTab::Tags => html! { <TagsTable key="tags" {api_client} {on_error} /> },
        AdminTab::Users => html! { <UsersTable key="users" {api_client} {on_error} /> },
    };

    html! {
        <>
            <Header active={*active_tab} {on_select} />
            <main class="container">
                <NoticeBanner message={(*notice).clone()} {on_dismiss} />
                {table}
            </main>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
