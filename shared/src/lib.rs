use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod filters;

pub use filters::*;

/// Label of the "previous page" control in a link list
pub const PREVIOUS_LABEL: &str = "« Previous";
/// Label of the "next page" control in a link list
pub const NEXT_LABEL: &str = "Next »";
/// Label of a gap between numbered links
pub const ELLIPSIS_LABEL: &str = "...";

/// One control of a pagination bar, as produced by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Target of the control; `None` renders it disabled
    pub url: Option<String>,
    /// Page number, ellipsis, or one of the previous/next sentinels
    pub label: String,
    pub active: bool,
}

impl PageLink {
    pub fn page(number: u32, url: Option<String>, active: bool) -> Self {
        Self {
            url,
            label: number.to_string(),
            active,
        }
    }

    pub fn previous(url: Option<String>) -> Self {
        Self {
            url,
            label: PREVIOUS_LABEL.to_string(),
            active: false,
        }
    }

    pub fn next(url: Option<String>) -> Self {
        Self {
            url,
            label: NEXT_LABEL.to_string(),
            active: false,
        }
    }

    pub fn ellipsis() -> Self {
        Self {
            url: None,
            label: ELLIPSIS_LABEL.to_string(),
            active: false,
        }
    }

    pub fn is_previous(&self) -> bool {
        self.label == PREVIOUS_LABEL
    }

    pub fn is_next(&self) -> bool {
        self.label == NEXT_LABEL
    }

    pub fn is_disabled(&self) -> bool {
        self.url.is_none()
    }
}

/// Paging metadata sent alongside a row collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationEnvelope {
    pub links: Vec<PageLink>,
    pub per_page: u32,
    pub total: u64,
    /// 1-based index of the first row on this page (0 when empty)
    pub from: u64,
    /// 1-based index of the last row on this page (0 when empty)
    pub to: u64,
    pub current_page: u32,
}

impl Default for PaginationEnvelope {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            total: 0,
            from: 0,
            to: 0,
            current_page: FIRST_PAGE,
        }
    }
}

impl PaginationEnvelope {
    /// Number of the last page; an empty collection still has page 1
    pub fn last_page(&self) -> u32 {
        last_page(self.total, self.per_page)
    }
}

/// Number of pages needed for `total` rows, never less than one
pub fn last_page(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Response of a collection endpoint: the rows plus the effective filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePayload<T> {
    pub rows: Vec<T>,
    pub pagination: PaginationEnvelope,
    /// Filters as applied by the server (page and per_page may be clamped)
    pub filters: FilterModel,
}

/// Publication state shared by pages and posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Published,
    Archived,
}

impl PublishStatus {
    pub const ALL: [PublishStatus; 3] = [
        PublishStatus::Draft,
        PublishStatus::Published,
        PublishStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Published => "published",
            PublishStatus::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PublishStatus::Draft => "Draft",
            PublishStatus::Published => "Published",
            PublishStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublishStatus {
    type Err = PublishStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PublishStatus::Draft),
            "published" => Ok(PublishStatus::Published),
            "archived" => Ok(PublishStatus::Archived),
            other => Err(PublishStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishStatusError(pub String);

impl fmt::Display for PublishStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown publish status: {}", self.0)
    }
}

impl std::error::Error for PublishStatusError {}

/// Row of the pages table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: PublishStatus,
    /// Last modification, formatted for display (e.g. "Mar 4, 2025")
    pub updated_at: String,
}

/// Row of the posts table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: PublishStatus,
    pub category: Option<String>,
    pub author: String,
    /// Formatted publication date; `None` while unpublished
    pub published_at: Option<String>,
}

/// Row of the tags table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub posts_count: i64,
}

/// Row of the users table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Formatted registration date
    pub joined_at: String,
}

/// Choice offered by a typed filter select (roles, categories)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: i64,
    pub name: String,
}

/// Log line forwarded by the frontend to the server log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_link_sentinels() {
        assert!(PageLink::previous(None).is_previous());
        assert!(PageLink::previous(None).is_disabled());
        assert!(PageLink::next(Some("/api/tags?page=2".into())).is_next());
        assert!(!PageLink::page(3, None, true).is_next());
        assert_eq!(PageLink::page(3, None, true).label, "3");
        assert_eq!(PageLink::ellipsis().label, "...");
    }

    #[test]
    fn test_last_page() {
        assert_eq!(last_page(0, 10), 1);
        assert_eq!(last_page(10, 10), 1);
        assert_eq!(last_page(11, 10), 2);
        assert_eq!(last_page(120, 10), 12);
        assert_eq!(last_page(5, 0), 5);
    }

    #[test]
    fn test_publish_status_round_trip_through_text() {
        for status in PublishStatus::ALL {
            assert_eq!(status.as_str().parse::<PublishStatus>().unwrap(), status);
        }
        assert_eq!(" Published ".parse::<PublishStatus>().unwrap(), PublishStatus::Published);
        assert!("deleted".parse::<PublishStatus>().is_err());
    }

    #[test]
    fn test_table_payload_tolerates_malformed_filter_echo() {
        let raw = r#"{
            "rows": [{"id": 1, "name": "rust", "slug": "rust", "posts_count": 4}],
            "pagination": {
                "links": [{"url": null, "label": "« Previous", "active": false}],
                "per_page": 10, "total": 1, "from": 1, "to": 1, "current_page": 1
            },
            "filters": {"per_page": "abc", "sort_direction": "up"}
        }"#;

        let payload: TablePayload<TagRow> = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.rows.len(), 1);
        assert_eq!(payload.filters, FilterModel::default());
        assert!(payload.pagination.links[0].is_previous());
    }
}
