//! # Collection queries
//!
//! Every admin table reads through [`CollectionService::list`]. A [`Resource`]
//! describes one collection: where its rows live, which columns can be
//! searched and sorted, and how its typed extra filters narrow the query.
//! The service turns a [`FilterModel`] into one count query and one page
//! query, clamps the filters to what the data allows and echoes the
//! effective filters back with the rows.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    ExtraFilter, FilterModel, FilterOption, PageFilter, PageLink, PageRow, PaginationEnvelope, PostFilter,
    PostRow, PublishStatus, TablePayload, TagRow, UserFilter, UserRow,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::info;

use crate::db::DbConnection;

/// Largest page size the server hands out
pub const MAX_PER_PAGE: u32 = 100;

/// Numbered links on each side of the current page before the bar collapses
const ON_EACH_SIDE: u32 = 3;

/// One admin collection
pub trait Resource: Send + Sync + 'static {
    type Row: Serialize + Send;

    /// Public path of the collection, used in page links
    const PATH: &'static str;
    const SELECT: &'static str;
    /// `FROM` target including joins
    const FROM: &'static str;
    const ID_COLUMN: &'static str;
    const SEARCH_COLUMNS: &'static [&'static str];
    /// Sortable fields and the SQL expression each one orders by
    const SORT_COLUMNS: &'static [(&'static str, &'static str)];
    const DEFAULT_SORT: &'static str;

    /// Narrow the query by the collection's typed extra filters
    fn push_extra_filters(_query: &mut QueryBuilder<'_, Sqlite>, _filters: &FilterModel) {}

    fn map_row(row: &SqliteRow) -> Result<Self::Row>;

    /// Column for `field`, or `None` when the field is not sortable
    fn sort_column(field: &str) -> Option<&'static str> {
        Self::SORT_COLUMNS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }
}

pub struct Pages;
pub struct Posts;
pub struct Tags;
pub struct Users;

impl Resource for Pages {
    type Row = PageRow;

    const PATH: &'static str = "/api/pages";
    const SELECT: &'static str = "p.id, p.title, p.slug, p.status, p.updated_at";
    const FROM: &'static str = "pages p";
    const ID_COLUMN: &'static str = "p.id";
    const SEARCH_COLUMNS: &'static [&'static str] = &["p.title", "p.slug"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("title", "p.title"),
        ("slug", "p.slug"),
        ("status", "p.status"),
        ("updated_at", "p.updated_at"),
    ];
    const DEFAULT_SORT: &'static str = "title";

    fn push_extra_filters(query: &mut QueryBuilder<'_, Sqlite>, filters: &FilterModel) {
        for filter in PageFilter::collect(filters) {
            match filter {
                PageFilter::Status(Some(status)) => {
                    query.push(" AND p.status = ").push_bind(status.as_str());
                }
                PageFilter::Status(None) => {}
            }
        }
    }

    fn map_row(row: &SqliteRow) -> Result<PageRow> {
        Ok(PageRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            status: parse_status(row.try_get("status")?)?,
            updated_at: display_date(row.try_get("updated_at")?),
        })
    }
}

impl Resource for Posts {
    type Row = PostRow;

    const PATH: &'static str = "/api/posts";
    const SELECT: &'static str = "p.id, p.title, p.slug, p.status, c.name AS category, u.name AS author, p.published_at";
    const FROM: &'static str =
        "posts p JOIN users u ON u.id = p.author_id LEFT JOIN categories c ON c.id = p.category_id";
    const ID_COLUMN: &'static str = "p.id";
    const SEARCH_COLUMNS: &'static [&'static str] = &["p.title", "u.name"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("title", "p.title"),
        ("status", "p.status"),
        ("category", "c.name"),
        ("author", "u.name"),
        ("published_at", "p.published_at"),
    ];
    const DEFAULT_SORT: &'static str = "title";

    fn push_extra_filters(query: &mut QueryBuilder<'_, Sqlite>, filters: &FilterModel) {
        for filter in PostFilter::collect(filters) {
            match filter {
                PostFilter::Status(Some(status)) => {
                    query.push(" AND p.status = ").push_bind(status.as_str());
                }
                PostFilter::Category(Some(category_id)) => {
                    query.push(" AND p.category_id = ").push_bind(category_id);
                }
                PostFilter::Status(None) | PostFilter::Category(None) => {}
            }
        }
    }

    fn map_row(row: &SqliteRow) -> Result<PostRow> {
        let published_at: Option<String> = row.try_get("published_at")?;
        Ok(PostRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            status: parse_status(row.try_get("status")?)?,
            category: row.try_get("category")?,
            author: row.try_get("author")?,
            published_at: published_at.map(display_date),
        })
    }
}

impl Resource for Tags {
    type Row = TagRow;

    const PATH: &'static str = "/api/tags";
    const SELECT: &'static str =
        "t.id, t.name, t.slug, (SELECT COUNT(*) FROM post_tag pt WHERE pt.tag_id = t.id) AS posts_count";
    const FROM: &'static str = "tags t";
    const ID_COLUMN: &'static str = "t.id";
    const SEARCH_COLUMNS: &'static [&'static str] = &["t.name", "t.slug"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "t.name"),
        ("slug", "t.slug"),
        ("posts_count", "posts_count"),
    ];
    const DEFAULT_SORT: &'static str = "name";

    fn map_row(row: &SqliteRow) -> Result<TagRow> {
        Ok(TagRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            posts_count: row.try_get("posts_count")?,
        })
    }
}

impl Resource for Users {
    type Row = UserRow;

    const PATH: &'static str = "/api/users";
    const SELECT: &'static str = "u.id, u.name, u.email, r.name AS role, u.created_at";
    const FROM: &'static str = "users u JOIN roles r ON r.id = u.role_id";
    const ID_COLUMN: &'static str = "u.id";
    const SEARCH_COLUMNS: &'static [&'static str] = &["u.name", "u.email"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "u.name"),
        ("email", "u.email"),
        ("role", "r.name"),
        ("joined_at", "u.created_at"),
    ];
    const DEFAULT_SORT: &'static str = "name";

    fn push_extra_filters(query: &mut QueryBuilder<'_, Sqlite>, filters: &FilterModel) {
        for filter in UserFilter::collect(filters) {
            match filter {
                UserFilter::Role(Some(role_id)) => {
                    query.push(" AND u.role_id = ").push_bind(role_id);
                }
                UserFilter::Role(None) => {}
            }
        }
    }

    fn map_row(row: &SqliteRow) -> Result<UserRow> {
        Ok(UserRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: row.try_get("role")?,
            joined_at: display_date(row.try_get("created_at")?),
        })
    }
}

/// Reads the admin collections
#[derive(Clone)]
pub struct CollectionService {
    db: DbConnection,
}

impl CollectionService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// One page of `R` for `filters`, with the filters as actually applied
    pub async fn list<R: Resource>(&self, filters: FilterModel) -> Result<TablePayload<R::Row>> {
        let mut effective = filters.sanitized();
        effective.per_page = effective.per_page.clamp(1, MAX_PER_PAGE);
        let sort_column = match R::sort_column(&effective.sort_field) {
            Some(column) => column,
            None => {
                effective.sort_field = R::DEFAULT_SORT.to_string();
                R::sort_column(R::DEFAULT_SORT)
                    .with_context(|| format!("Default sort {} is not sortable", R::DEFAULT_SORT))?
            }
        };

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM ");
        count_query.push(R::FROM);
        push_conditions::<R>(&mut count_query, &effective);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await
            .with_context(|| format!("Failed to count {}", R::PATH))?;
        let total = u64::try_from(total).unwrap_or_default();

        let last_page = shared::last_page(total, effective.per_page);
        effective.page = effective.page.clamp(1, last_page);
        let offset = u64::from(effective.page - 1) * u64::from(effective.per_page);

        let mut page_query = QueryBuilder::<Sqlite>::new("SELECT ");
        page_query.push(R::SELECT).push(" FROM ").push(R::FROM);
        push_conditions::<R>(&mut page_query, &effective);
        let direction = effective.sort_direction.as_str().to_uppercase();
        page_query
            .push(format!(" ORDER BY {} {}, {} ASC", sort_column, direction, R::ID_COLUMN))
            .push(" LIMIT ")
            .push_bind(i64::from(effective.per_page))
            .push(" OFFSET ")
            .push_bind(offset as i64);

        let rows = page_query
            .build()
            .fetch_all(self.db.pool())
            .await
            .with_context(|| format!("Failed to load {}", R::PATH))?
            .iter()
            .map(R::map_row)
            .collect::<Result<Vec<_>>>()?;

        let (from, to) = if rows.is_empty() {
            (0, 0)
        } else {
            (offset + 1, offset + rows.len() as u64)
        };

        info!(
            path = R::PATH,
            total,
            page = effective.page,
            rows = rows.len(),
            "Listed collection"
        );

        Ok(TablePayload {
            rows,
            pagination: PaginationEnvelope {
                links: build_links(R::PATH, &effective, last_page),
                per_page: effective.per_page,
                total,
                from,
                to,
                current_page: effective.page,
            },
            filters: effective,
        })
    }

    pub async fn roles(&self) -> Result<Vec<FilterOption>> {
        self.options("SELECT id, name FROM roles ORDER BY id").await
    }

    pub async fn categories(&self) -> Result<Vec<FilterOption>> {
        self.options("SELECT id, name FROM categories ORDER BY name").await
    }

    async fn options(&self, sql: &str) -> Result<Vec<FilterOption>> {
        sqlx::query(sql)
            .fetch_all(self.db.pool())
            .await?
            .iter()
            .map(|row| {
                Ok(FilterOption {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }
}

fn push_conditions<R: Resource>(query: &mut QueryBuilder<'_, Sqlite>, filters: &FilterModel) {
    query.push(" WHERE 1 = 1");

    let search = filters.search.trim();
    if !search.is_empty() && !R::SEARCH_COLUMNS.is_empty() {
        let pattern = format!("%{}%", escape_like(search));
        query.push(" AND (");
        for (index, column) in R::SEARCH_COLUMNS.iter().enumerate() {
            if index > 0 {
                query.push(" OR ");
            }
            query
                .push(*column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        query.push(")");
    }

    R::push_extra_filters(query, filters);
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn parse_status(raw: String) -> Result<PublishStatus> {
    raw.parse().map_err(anyhow::Error::from)
}

/// `2024-03-04` as `Mar 4, 2024`; anything unparsable is shown as stored
fn display_date(raw: String) -> String {
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or(raw)
}

/// Address of `page` with every other filter kept
pub fn page_url(path: &str, filters: &FilterModel, page: u32) -> String {
    let mut target = filters.clone();
    target.page = page;
    format!("{}?{}", path, target.to_query_string())
}

/// The full link list of a length-aware paginator.
///
/// Short collections list every page. Longer ones keep the first and last two
/// pages and a slider around the current page, with gaps shown as `...`.
pub fn build_links(path: &str, filters: &FilterModel, last_page: u32) -> Vec<PageLink> {
    let current = filters.page.clamp(1, last_page.max(1));
    let window = ON_EACH_SIDE * 2;
    let link = |page: u32| PageLink::page(page, Some(page_url(path, filters, page)), page == current);

    let mut links = vec![PageLink::previous(
        (current > 1).then(|| page_url(path, filters, current - 1)),
    )];

    if last_page < window + 8 {
        links.extend((1..=last_page).map(link));
    } else if current <= window {
        links.extend((1..=window + ON_EACH_SIDE).map(link));
        links.push(PageLink::ellipsis());
        links.extend((last_page - 1..=last_page).map(link));
    } else if current > last_page - window {
        links.extend((1..=2).map(link));
        links.push(PageLink::ellipsis());
        links.extend((last_page - (window + ON_EACH_SIDE - 1)..=last_page).map(link));
    } else {
        links.extend((1..=2).map(link));
        links.push(PageLink::ellipsis());
        links.extend((current - ON_EACH_SIDE..=current + ON_EACH_SIDE).map(link));
        links.push(PageLink::ellipsis());
        links.extend((last_page - 1..=last_page).map(link));
    }

    links.push(PageLink::next(
        (current < last_page).then(|| page_url(path, filters, current + 1)),
    ));
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DEMO_POSTS, DEMO_USERS, PAGE_TITLES, TAGS};
    use shared::SortDirection;

    async fn create_test_service() -> CollectionService {
        let db = DbConnection::init_test_seeded().await.expect("Failed to init test DB");
        CollectionService::new(db)
    }

    fn filters(per_page: u32, page: u32) -> FilterModel {
        FilterModel {
            per_page,
            page,
            ..FilterModel::default()
        }
    }

    fn labels(links: &[PageLink]) -> Vec<String> {
        links.iter().map(|link| link.label.clone()).collect()
    }

    #[tokio::test]
    async fn test_list_users_first_page() {
        let service = create_test_service().await;
        let payload = service.list::<Users>(FilterModel::default()).await.unwrap();

        assert_eq!(payload.rows.len(), 10);
        assert_eq!(payload.pagination.total, DEMO_USERS as u64);
        assert_eq!(payload.pagination.from, 1);
        assert_eq!(payload.pagination.to, 10);
        assert_eq!(payload.pagination.current_page, 1);

        let names: Vec<_> = payload.rows.iter().map(|row| row.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_falls_back_to_default() {
        let service = create_test_service().await;
        let payload = service.list::<Pages>(FilterModel::default()).await.unwrap();
        assert_eq!(payload.filters.sort_field, "title");

        let hostile = FilterModel {
            sort_field: "title; DROP TABLE pages".into(),
            ..FilterModel::default()
        };
        let payload = service.list::<Pages>(hostile).await.unwrap();
        assert_eq!(payload.filters.sort_field, "title");
        assert_eq!(payload.pagination.total, PAGE_TITLES.len() as u64);
    }

    #[tokio::test]
    async fn test_sort_descending() {
        let service = create_test_service().await;
        let request = FilterModel {
            sort_field: "posts_count".into(),
            sort_direction: SortDirection::Desc,
            per_page: 100,
            ..FilterModel::default()
        };
        let payload = service.list::<Tags>(request).await.unwrap();

        assert_eq!(payload.rows.len(), TAGS.len());
        let counts: Vec<i64> = payload.rows.iter().map(|row| row.posts_count).collect();
        assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[tokio::test]
    async fn test_page_and_per_page_are_clamped() {
        let service = create_test_service().await;

        let payload = service.list::<Posts>(filters(1_000, 1)).await.unwrap();
        assert_eq!(payload.filters.per_page, MAX_PER_PAGE);
        assert_eq!(payload.rows.len(), 100);

        let payload = service.list::<Posts>(filters(25, 99)).await.unwrap();
        let last = shared::last_page(DEMO_POSTS as u64, 25);
        assert_eq!(payload.filters.page, last);
        assert_eq!(payload.pagination.current_page, last);
        assert_eq!(payload.pagination.to, DEMO_POSTS as u64);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let service = create_test_service().await;
        let request = FilterModel {
            search: "PRIVACY".into(),
            ..FilterModel::default()
        };
        let payload = service.list::<Pages>(request).await.unwrap();
        assert_eq!(payload.rows.len(), 1);
        assert_eq!(payload.rows[0].title, "Privacy Policy");
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal() {
        let service = create_test_service().await;
        let request = FilterModel {
            search: "%".into(),
            ..FilterModel::default()
        };
        let payload = service.list::<Tags>(request).await.unwrap();
        assert_eq!(payload.pagination.total, 0);
        assert_eq!(payload.pagination.from, 0);
        assert_eq!(payload.pagination.to, 0);
        assert_eq!(payload.filters.page, 1);
    }

    #[tokio::test]
    async fn test_typed_extra_filters() {
        let service = create_test_service().await;

        let mut request = FilterModel::default();
        request.set_extra("role", UserFilter::Role(Some(2)).value());
        let payload = service.list::<Users>(request).await.unwrap();
        assert_eq!(payload.pagination.total, 4);
        assert!(payload.rows.iter().all(|row| row.role == "Editor"));

        let mut request = filters(100, 1);
        request.set_extra("status", PostFilter::Status(Some(PublishStatus::Draft)).value());
        request.set_extra("category", "2".into());
        let payload = service.list::<Posts>(request).await.unwrap();
        assert!(!payload.rows.is_empty());
        assert!(payload
            .rows
            .iter()
            .all(|row| row.status == PublishStatus::Draft && row.category.as_deref() == Some("Tutorials")));
        assert!(payload.rows.iter().all(|row| row.published_at.is_none()));
    }

    #[tokio::test]
    async fn test_filter_options() {
        let service = create_test_service().await;
        let roles = service.roles().await.unwrap();
        assert_eq!(roles.first().map(|r| r.name.as_str()), Some("Administrator"));
        assert_eq!(service.categories().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_page_links_carry_filters() {
        let service = create_test_service().await;
        let request = FilterModel {
            search: "a".into(),
            per_page: 5,
            ..FilterModel::default()
        };
        let payload = service.list::<Users>(request).await.unwrap();
        let second = payload
            .pagination
            .links
            .iter()
            .find(|link| link.label == "2")
            .and_then(|link| link.url.clone())
            .unwrap();

        assert!(second.starts_with("/api/users?"));
        let parsed = FilterModel::from_query(second.split_once('?').unwrap().1);
        assert_eq!(parsed.search, "a");
        assert_eq!(parsed.per_page, 5);
        assert_eq!(parsed.page, 2);
    }

    #[test]
    fn test_links_for_short_collection_list_every_page() {
        let links = build_links("/api/tags", &filters(10, 1), 3);
        assert_eq!(labels(&links), vec!["« Previous", "1", "2", "3", "Next »"]);
        assert!(links[0].is_disabled());
        assert!(links[1].active);
        assert_eq!(links[4].url.as_deref().map(|u| u.ends_with("page=2")), Some(true));
    }

    #[test]
    fn test_links_collapse_near_start() {
        let links = build_links("/api/posts", &filters(10, 2), 20);
        assert_eq!(
            labels(&links)[1..links.len() - 1],
            ["1", "2", "3", "4", "5", "6", "7", "8", "9", "...", "19", "20"]
        );
    }

    #[test]
    fn test_links_collapse_in_middle() {
        let links = build_links("/api/posts", &filters(10, 10), 20);
        assert_eq!(
            labels(&links)[1..links.len() - 1],
            ["1", "2", "...", "7", "8", "9", "10", "11", "12", "13", "...", "19", "20"]
        );
        assert!(links.iter().any(|link| link.active && link.label == "10"));
    }

    #[test]
    fn test_links_collapse_near_end() {
        let links = build_links("/api/posts", &filters(10, 20), 20);
        assert_eq!(
            labels(&links)[1..links.len() - 1],
            ["1", "2", "...", "12", "13", "14", "15", "16", "17", "18", "19", "20"]
        );
        assert!(links.last().unwrap().is_disabled());
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-03-04".into()), "Mar 4, 2024");
        assert_eq!(display_date("yesterday".into()), "yesterday");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
