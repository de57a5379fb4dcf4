pub mod data_grid;
pub mod filter_select;
pub mod pagination_bar;
pub mod per_page_select;
pub mod search_box;
pub mod selection_bar;
pub mod sortable_header;
pub mod table_view;

pub use data_grid::GridRow;
pub use filter_select::{FilterSelect, SelectOption};
pub use table_view::TableView;
