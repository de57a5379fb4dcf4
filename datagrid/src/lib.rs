//! # Quill Data Grid
//!
//! The state/controller layer behind every paginated, sortable, searchable
//! table of the admin area. The server owns the rows; this crate owns the
//! view parameters and keeps them in step with it.
//!
//! ## Module Organization
//!
//! - **pagination**: sliding window over the server's page links
//! - **debounce**: keystroke debouncing for the search box
//! - **gateway**: the single path from a filter mutation to a request
//! - **selection**: sparse row selection
//! - **columns**: full/compact column set selection
//! - **rows**: row identity for the admin collections
//! - **table**: [`DataTable`], the container every UI fragment talks to
//!
//! Timers and networking are platform concerns, injected through the
//! [`Scheduler`] and [`Navigator`] traits. Everything is single-threaded.

pub mod columns;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod pagination;
pub mod rows;
pub mod selection;
pub mod table;

#[cfg(test)]
pub(crate) mod test_utils;

pub use columns::{resolve_columns, ColumnDef, ColumnSets};
pub use config::{TableConfig, DEFAULT_PER_PAGE_OPTIONS};
pub use debounce::{DebounceConfig, Scheduler, SearchDebouncer, TimerHandle};
pub use error::NavigationError;
pub use gateway::{FilterPatch, NavigationGateway, NavigationRequest, Navigator, VisitOptions};
pub use pagination::{visible_links, WINDOW_SIZE};
pub use selection::RowSelection;
pub use table::{DataTable, PageTarget, Responder, TableRow, TableSnapshot};
