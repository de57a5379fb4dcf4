//! Browser bindings of the table engine: gloo timers for the search debounce
//! and HTTP fetches plus `window.history` for navigation.

use std::marker::PhantomData;
use std::time::Duration;

use gloo::timers::callback::Timeout;
use quill_datagrid::{NavigationRequest, Navigator, Responder, Scheduler, TableRow, TimerHandle};
use serde::de::DeserializeOwned;
use shared::FilterModel;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

/// [`Scheduler`] backed by `setTimeout`
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, task);

        TimerHandle::new(move || {
            // The handle may be dropped from inside its own callback; the JS
            // closure must outlive that call.
            let callback = timeout.cancel();
            spawn_local(async move { drop(callback) });
        })
    }
}

/// [`Navigator`] that fetches table payloads over HTTP and keeps the address
/// bar in step with the confirmed filters
pub struct HttpNavigator<T> {
    api: ApiClient,
    /// Browser path of the table, e.g. `/admin/users`
    route: &'static str,
    on_error: Callback<String>,
    _row: PhantomData<T>,
}

impl<T> HttpNavigator<T> {
    pub fn new(api: ApiClient, route: &'static str, on_error: Callback<String>) -> Self {
        Self {
            api,
            route,
            on_error,
            _row: PhantomData,
        }
    }
}

impl<T: TableRow + DeserializeOwned> Navigator<T> for HttpNavigator<T> {
    fn navigate(&self, request: NavigationRequest, responder: Responder<T>) {
        if !request.options.preserve_scroll {
            scroll_to_top();
        }

        let api = self.api.clone();
        let route = self.route;
        let on_error = self.on_error.clone();
        let record_history = request.options.record_history;
        let href = request.href();

        spawn_local(async move {
            match api.fetch_collection::<T>(&href).await {
                Ok(payload) => {
                    let confirmed = payload.filters.clone();
                    let adopted = responder.succeed(payload);
                    if let Some(url) = history_entry(route, record_history, adopted, &confirmed) {
                        push_history(&url);
                    }
                    if !adopted {
                        Logger::debug_with_component(route, &format!("Ignored superseded response for {}", href));
                    }
                }
                Err(error) => {
                    Logger::warn_with_component(route, &format!("Request {} failed: {}", href, error));
                    if responder.is_live() {
                        on_error.emit(format!("Could not load the table: {}", error));
                    }
                    responder.fail(&error);
                }
            }
        });
    }
}

/// Address to record once a response is in. Only adopted responses move
/// the address bar, and it shows the filters the server confirmed.
pub fn history_entry(route: &str, record_history: bool, adopted: bool, confirmed: &FilterModel) -> Option<String> {
    (record_history && adopted).then(|| address(route, &confirmed.to_query_string()))
}

/// Browser address of `route` with `query`
pub fn address(route: &str, query: &str) -> String {
    if query.is_empty() {
        route.to_string()
    } else {
        format!("{}?{}", route, query)
    }
}

/// Path part of the current address
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_default()
}

/// Filters encoded in the current address bar
pub fn filters_from_location() -> FilterModel {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    FilterModel::from_query(&search)
}

pub fn push_history(url: &str) {
    let pushed = web_sys::window()
        .and_then(|window| window.history().ok())
        .map(|history| history.push_state_with_url(&JsValue::NULL, "", Some(url)));

    if let Some(Err(e)) = pushed {
        gloo::console::error!("Failed to update browser history:", e);
    }
}

/// Rewrite the current address without adding a history entry
pub fn replace_history(url: &str) {
    let replaced = web_sys::window()
        .and_then(|window| window.history().ok())
        .map(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(url)));

    if let Some(Err(e)) = replaced {
        gloo::console::error!("Failed to update browser history:", e);
    }
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_address() {
        assert_eq!(address("/admin/users", ""), "/admin/users");
        assert_eq!(address("/admin/users", "page=2&per_page=25"), "/admin/users?page=2&per_page=25");
    }

    #[wasm_bindgen_test]
    fn test_history_follows_only_adopted_responses() {
        let confirmed = FilterModel {
            page: 3,
            ..FilterModel::default()
        };

        assert_eq!(
            history_entry("/admin/users", true, true, &confirmed),
            Some(format!("/admin/users?{}", confirmed.to_query_string()))
        );
        assert_eq!(history_entry("/admin/users", true, false, &confirmed), None);
        assert_eq!(history_entry("/admin/users", false, true, &confirmed), None);
    }
}
