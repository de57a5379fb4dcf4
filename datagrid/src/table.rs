//! # Table State Container
//!
//! [`DataTable`] owns everything one mounted table knows: the confirmed
//! filters, the rows and paging metadata of the last live response, the row
//! selection, the column sets and the search debouncer. UI fragments read a
//! [`TableSnapshot`] and call the mutators; every mutation that needs new rows
//! goes through the [`NavigationGateway`].
//!
//! ## Re-entrancy
//!
//! The state sits in a `RefCell`. No borrow is held while the navigator, the
//! scheduler's tasks or the change listener run, so each of them may call
//! straight back into the table.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use shared::{ExtraFilter, FilterModel, PageLink, PaginationEnvelope, SortDirection, TablePayload};

use crate::columns::{ColumnDef, ColumnSets};
use crate::config::TableConfig;
use crate::debounce::{Scheduler, SearchDebouncer};
use crate::error::NavigationError;
use crate::gateway::{FilterPatch, NavigationGateway, NavigationRequest, Navigator, VisitOptions};
use crate::pagination::visible_links;
use crate::selection::RowSelection;

/// A row the table can select
pub trait TableRow: Clone + PartialEq + 'static {
    type Id: Clone + Eq + Hash + fmt::Debug + 'static;

    fn row_id(&self) -> Self::Id;
}

/// Where a pagination control points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    /// A server-generated link, followed as is
    Url(String),
    Number(u32),
}

/// Read-only view of a table for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot<T: TableRow> {
    /// Filters confirmed by the last live response
    pub filters: FilterModel,
    pub rows: Vec<T>,
    pub pagination: PaginationEnvelope,
    /// The windowed pagination controls
    pub links: Vec<PageLink>,
    pub selection: RowSelection<T::Id>,
    pub active_columns: Vec<ColumnDef>,
    pub search_text: String,
    pub search_pending: bool,
    /// A request is in flight
    pub loading: bool,
    pub per_page_options: Vec<u32>,
}

struct TableState<T: TableRow> {
    filters: FilterModel,
    /// Filters of the in-flight request; mutations merge on top of these
    requested: Option<FilterModel>,
    rows: Vec<T>,
    pagination: PaginationEnvelope,
    links: Vec<PageLink>,
    selection: RowSelection<T::Id>,
    columns: ColumnSets,
    viewport_narrow: bool,
    per_page_options: Vec<u32>,
    search: SearchDebouncer,
    gateway: NavigationGateway,
    on_change: Option<Rc<dyn Fn()>>,
}

impl<T: TableRow> TableState<T> {
    fn latest_filters(&self) -> FilterModel {
        self.requested.clone().unwrap_or_else(|| self.filters.clone())
    }
}

struct TableShared<T: TableRow> {
    state: RefCell<TableState<T>>,
    navigator: Box<dyn Navigator<T>>,
    scheduler: Box<dyn Scheduler>,
}

/// Handle to one table's state. Clones share the same table.
pub struct DataTable<T: TableRow>(Rc<TableShared<T>>);

impl<T: TableRow> Clone for DataTable<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: TableRow> PartialEq for DataTable<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: TableRow> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.state.borrow();
        f.debug_struct("DataTable")
            .field("base_url", &state.gateway.base_url())
            .field("filters", &state.filters)
            .field("rows", &state.rows.len())
            .finish()
    }
}

impl<T: TableRow> DataTable<T> {
    pub fn new(
        config: TableConfig,
        initial_filters: FilterModel,
        navigator: impl Navigator<T> + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> Self {
        let filters = initial_filters.sanitized();
        let pagination = PaginationEnvelope {
            per_page: filters.per_page,
            current_page: filters.page,
            ..PaginationEnvelope::default()
        };

        let state = TableState {
            search: SearchDebouncer::new(config.debounce, filters.search.clone()),
            gateway: NavigationGateway::new(config.base_url),
            filters,
            requested: None,
            rows: Vec::new(),
            pagination,
            links: Vec::new(),
            selection: RowSelection::new(),
            columns: config.columns,
            viewport_narrow: false,
            per_page_options: config.per_page_options,
            on_change: None,
        };

        Self(Rc::new(TableShared {
            state: RefCell::new(state),
            navigator: Box::new(navigator),
            scheduler: Box::new(scheduler),
        }))
    }

    /// Called after every state change that affects rendering
    pub fn set_on_change(&self, listener: impl Fn() + 'static) {
        self.0.state.borrow_mut().on_change = Some(Rc::new(listener));
    }

    pub fn clear_on_change(&self) {
        self.0.state.borrow_mut().on_change = None;
    }

    pub fn snapshot(&self) -> TableSnapshot<T> {
        let state = self.0.state.borrow();
        TableSnapshot {
            filters: state.filters.clone(),
            rows: state.rows.clone(),
            pagination: state.pagination.clone(),
            links: state.links.clone(),
            selection: state.selection.clone(),
            active_columns: state.columns.resolve(state.viewport_narrow).to_vec(),
            search_text: state.search.displayed().to_string(),
            search_pending: state.search.is_pending(),
            loading: state.requested.is_some(),
            per_page_options: state.per_page_options.clone(),
        }
    }

    pub fn filters(&self) -> FilterModel {
        self.0.state.borrow().filters.clone()
    }

    pub fn selection(&self) -> RowSelection<T::Id> {
        self.0.state.borrow().selection.clone()
    }

    pub fn active_columns(&self) -> Vec<ColumnDef> {
        let state = self.0.state.borrow();
        state.columns.resolve(state.viewport_narrow).to_vec()
    }

    /// The typed extra filters currently requested
    pub fn extra_filters<F: ExtraFilter>(&self) -> Vec<F> {
        F::collect(&self.0.state.borrow().latest_filters())
    }

    /// Use a payload that came with the page instead of fetching it
    pub fn hydrate(&self, payload: TablePayload<T>) {
        {
            let mut state = self.0.state.borrow_mut();
            state.adopt(payload, true);
        }
        self.notify();
    }

    /// First fetch with the mount filters
    pub fn load(&self) {
        let request = {
            let mut state = self.0.state.borrow_mut();
            let filters = state.filters.clone();
            state.gateway.visit(filters, VisitOptions::initial_load())
        };
        self.dispatch(request);
    }

    /// Fetch the latest filters again, e.g. after a failed request
    pub fn reload(&self) {
        let request = {
            let mut state = self.0.state.borrow_mut();
            let filters = state.latest_filters();
            state.gateway.visit(filters, VisitOptions::initial_load())
        };
        self.dispatch(request);
    }

    /// Back/forward navigation to `filters`. Drops any queued search.
    pub fn restore(&self, filters: FilterModel) {
        let request = {
            let mut state = self.0.state.borrow_mut();
            state.search.reset(&filters.search);
            state.gateway.visit(filters, VisitOptions::history_restore())
        };
        self.dispatch(request);
    }

    pub fn set_sort(&self, field: &str, direction: SortDirection) {
        self.change(FilterPatch::sort(field, direction));
    }

    /// Header click: the sorted column flips, any other column starts ascending
    pub fn toggle_sort(&self, field: &str) {
        let direction = {
            let state = self.0.state.borrow();
            let current = state.latest_filters();
            if current.sort_field == field {
                current.sort_direction.toggled()
            } else {
                SortDirection::Asc
            }
        };
        self.set_sort(field, direction);
    }

    /// Keystroke in the search box. The request follows once typing pauses.
    pub fn set_search(&self, text: &str) {
        let commit = {
            let table = Rc::downgrade(&self.0);
            Box::new(move |text: String| {
                if let Some(shared) = table.upgrade() {
                    DataTable(shared).commit_search(text);
                }
            })
        };
        let settle = {
            let table = Rc::downgrade(&self.0);
            Box::new(move || {
                if let Some(shared) = table.upgrade() {
                    DataTable(shared).settle_search();
                }
            })
        };

        self.0
            .state
            .borrow_mut()
            .search
            .on_input(text.to_string(), self.0.scheduler.as_ref(), commit, settle);
        self.notify();
    }

    pub fn set_page(&self, target: PageTarget) {
        match target {
            PageTarget::Url(url) => {
                let request = {
                    let mut state = self.0.state.borrow_mut();
                    let current = state.latest_filters();
                    state.gateway.follow(&url, &current)
                };
                if let Some(request) = request {
                    self.dispatch(request);
                }
            }
            PageTarget::Number(page) => {
                self.change(FilterPatch::page(page));
            }
        }
    }

    /// Changing the page size lands on page 1 and clears the selection
    pub fn set_per_page(&self, per_page: u32) {
        if self.change(FilterPatch::per_page(per_page)) {
            self.clear_selection();
        }
    }

    pub fn set_extra_filter(&self, filter: impl ExtraFilter) {
        self.change(FilterPatch::extra(&filter));
    }

    pub fn set_selection(&self, selection: RowSelection<T::Id>) {
        self.0.state.borrow_mut().selection = selection;
        self.notify();
    }

    pub fn clear_selection(&self) {
        self.0.state.borrow_mut().selection.clear();
        self.notify();
    }

    pub fn toggle_row(&self, id: T::Id) {
        self.0.state.borrow_mut().selection.toggle(id);
        self.notify();
    }

    /// Header checkbox: select or unselect every row on the current page
    pub fn toggle_page_selection(&self) {
        {
            let mut state = self.0.state.borrow_mut();
            let ids: Vec<T::Id> = state.rows.iter().map(TableRow::row_id).collect();
            state.selection.toggle_all(&ids);
        }
        self.notify();
    }

    pub fn set_viewport_narrow(&self, narrow: bool) {
        let changed = {
            let mut state = self.0.state.borrow_mut();
            let changed = state.viewport_narrow != narrow;
            state.viewport_narrow = narrow;
            changed
        };
        if changed {
            self.notify();
        }
    }

    fn commit_search(&self, text: String) {
        self.0.state.borrow_mut().search.mark_committed();
        self.change(FilterPatch::search(text));
    }

    fn settle_search(&self) {
        {
            let mut state = self.0.state.borrow_mut();
            state.search.settle();
            if state.requested.is_none() {
                let search = state.filters.search.clone();
                state.search.sync(&search);
            }
        }
        self.notify();
    }

    /// Returns whether a request was dispatched
    fn change(&self, patch: FilterPatch) -> bool {
        let request = {
            let mut state = self.0.state.borrow_mut();
            let current = state.latest_filters();
            state.gateway.prepare(&current, &patch)
        };

        match request {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    fn dispatch(&self, request: NavigationRequest) {
        self.0.state.borrow_mut().requested = Some(request.filters.clone());

        let responder = Responder {
            table: Rc::downgrade(&self.0),
            seq: request.seq,
            options: request.options,
        };
        self.notify();
        self.0.navigator.navigate(request, responder);
    }

    fn complete(&self, seq: u64, options: VisitOptions, outcome: Result<TablePayload<T>, &NavigationError>) -> bool {
        let applied = {
            let mut state = self.0.state.borrow_mut();
            if !state.gateway.is_latest(seq) {
                tracing::debug!(seq, latest = state.gateway.latest_seq(), "Discarding superseded response");
                return false;
            }

            state.requested = None;
            match outcome {
                Ok(payload) => {
                    state.adopt(payload, options.preserve_state);
                    true
                }
                Err(error) => {
                    tracing::warn!(seq, url = %state.gateway.base_url(), "Table request failed: {}", error);
                    false
                }
            }
        };

        self.notify();
        applied
    }

    fn notify(&self) {
        let listener = self.0.state.borrow().on_change.clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

impl<T: TableRow> TableState<T> {
    fn adopt(&mut self, payload: TablePayload<T>, preserve_state: bool) {
        self.filters = payload.filters.sanitized();
        self.links = visible_links(&payload.pagination.links);
        self.pagination = payload.pagination;
        self.rows = payload.rows;
        if !preserve_state {
            self.selection.clear();
        }
        let search = self.filters.search.clone();
        self.search.sync(&search);
    }
}

/// Completion handle for one request.
///
/// Holds the table weakly; answering after the table is gone, or answering a
/// request that has since been superseded, does nothing.
pub struct Responder<T: TableRow> {
    table: Weak<TableShared<T>>,
    seq: u64,
    options: VisitOptions,
}

impl<T: TableRow> Responder<T> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Whether the answer would still be used
    pub fn is_live(&self) -> bool {
        self.table
            .upgrade()
            .is_some_and(|shared| shared.state.borrow().gateway.is_latest(self.seq))
    }

    /// Deliver the rows. Returns whether the table adopted them.
    pub fn succeed(self, payload: TablePayload<T>) -> bool {
        match self.table.upgrade() {
            Some(shared) => DataTable(shared).complete(self.seq, self.options, Ok(payload)),
            None => false,
        }
    }

    /// Report that the request produced no rows
    pub fn fail(self, error: &NavigationError) {
        if let Some(shared) = self.table.upgrade() {
            DataTable(shared).complete(self.seq, self.options, Err(error));
        }
    }
}

impl<T: TableRow> fmt::Debug for Responder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder")
            .field("seq", &self.seq)
            .field("options", &self.options)
            .finish()
    }
}
