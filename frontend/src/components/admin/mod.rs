pub mod cells;
pub mod pages_table;
pub mod posts_table;
pub mod tags_table;
pub mod users_table;

pub use pages_table::PagesTable;
pub use posts_table::PostsTable;
pub use tags_table::TagsTable;
pub use users_table::UsersTable;
