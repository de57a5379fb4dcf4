pub mod admin;
pub mod header;
pub mod notice;
pub mod table;

pub use header::{AdminTab, Header};
pub use notice::NoticeBanner;
