use gloo::events::EventListener;
use quill_datagrid::{DataTable, PageTarget, TableConfig, TableRow, TableSnapshot};
use serde::de::DeserializeOwned;
use yew::prelude::*;

use crate::hooks::use_viewport::{use_viewport_is_narrow, NARROW_BREAKPOINT_PX};
use crate::services::api::ApiClient;
use crate::services::navigation::{current_path, filters_from_location, GlooScheduler, HttpNavigator};

pub struct UseDataTableResult<T: TableRow> {
    pub state: TableSnapshot<T>,
    pub actions: DataTableActions<T>,
}

#[derive(Clone, PartialEq)]
pub struct DataTableActions<T: TableRow> {
    /// Engine handle, for the per-table extra filters
    pub table: DataTable<T>,
    pub on_search: Callback<String>,
    pub on_sort: Callback<String>,
    pub on_page: Callback<PageTarget>,
    pub on_per_page: Callback<u32>,
    pub on_toggle_row: Callback<T::Id>,
    pub on_toggle_page: Callback<()>,
    pub on_clear_selection: Callback<()>,
    /// Fetch the current filters again (retry after a failure)
    pub on_reload: Callback<()>,
}

/// Binds a [`DataTable`] to the component lifecycle.
///
/// The table starts from the filters in the address bar, loads its first
/// page on mount and follows back/forward navigation while `route` is the
/// current path. Every engine change re-renders the caller.
#[hook]
pub fn use_data_table<T>(
    config: TableConfig,
    route: &'static str,
    api_client: &ApiClient,
    on_error: Callback<String>,
) -> UseDataTableResult<T>
where
    T: TableRow + DeserializeOwned,
{
    let table = {
        let api_client = api_client.clone();
        use_memo((), move |_| {
            DataTable::new(
                config,
                filters_from_location(),
                HttpNavigator::<T>::new(api_client, route, on_error),
                GlooScheduler,
            )
        })
    };
    let force_update = use_force_update();
    let narrow = use_viewport_is_narrow(NARROW_BREAKPOINT_PX);

    // Mount: subscribe, load, follow history
    {
        let table = (*table).clone();
        use_effect_with((), move |_| {
            table.set_on_change(move || force_update.force_update());
            table.load();

            let popstate = web_sys::window().map(|window| {
                let table = table.clone();
                EventListener::new(&window, "popstate", move |_| {
                    if current_path() == route {
                        table.restore(filters_from_location());
                    }
                })
            });

            move || {
                drop(popstate);
                table.clear_on_change();
            }
        });
    }

    {
        let table = (*table).clone();
        use_effect_with(narrow, move |narrow| {
            table.set_viewport_narrow(*narrow);
        });
    }

    let actions = {
        let table = (*table).clone();
        DataTableActions {
            on_search: {
                let table = table.clone();
                Callback::from(move |text: String| table.set_search(&text))
            },
            on_sort: {
                let table = table.clone();
                Callback::from(move |field: String| table.toggle_sort(&field))
            },
            on_page: {
                let table = table.clone();
                Callback::from(move |target: PageTarget| table.set_page(target))
            },
            on_per_page: {
                let table = table.clone();
                Callback::from(move |per_page: u32| table.set_per_page(per_page))
            },
            on_toggle_row: {
                let table = table.clone();
                Callback::from(move |id: T::Id| table.toggle_row(id))
            },
            on_toggle_page: {
                let table = table.clone();
                Callback::from(move |_| table.toggle_page_selection())
            },
            on_clear_selection: {
                let table = table.clone();
                Callback::from(move |_| table.clear_selection())
            },
            on_reload: {
                let table = table.clone();
                Callback::from(move |_| table.reload())
            },
            table,
        }
    };

    UseDataTableResult {
        state: table.snapshot(),
        actions,
    }
}
