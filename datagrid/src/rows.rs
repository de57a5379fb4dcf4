//! [`TableRow`] for the admin row types

use shared::{PageRow, PostRow, TagRow, UserRow};

use crate::table::TableRow;

impl TableRow for PageRow {
    type Id = i64;

    fn row_id(&self) -> i64 {
        self.id
    }
}

impl TableRow for PostRow {
    type Id = i64;

    fn row_id(&self) -> i64 {
        self.id
    }
}

impl TableRow for TagRow {
    type Id = i64;

    fn row_id(&self) -> i64 {
        self.id
    }
}

impl TableRow for UserRow {
    type Id = i64;

    fn row_id(&self) -> i64 {
        self.id
    }
}
