use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use shared::PublishStatus;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// DbConnection owns the SQLite pool behind the admin collections
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Connect, creating the database file and schema when missing
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("Failed to create database {}", url))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Test database with the demo content loaded
    #[cfg(test)]
    pub async fn init_test_seeded() -> Result<Self> {
        let db = Self::init_test().await?;
        db.seed_demo().await?;
        Ok(db)
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role_id INTEGER NOT NULL REFERENCES roles(id),
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL,
                category_id INTEGER REFERENCES categories(id),
                author_id INTEGER NOT NULL REFERENCES users(id),
                published_at TEXT
            );

            CREATE TABLE IF NOT EXISTS post_tag (
                post_id INTEGER NOT NULL REFERENCES posts(id),
                tag_id INTEGER NOT NULL REFERENCES tags(id),
                PRIMARY KEY (post_id, tag_id)
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to set up schema")?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// True when no user has been created yet
    pub async fn is_empty(&self) -> Result<bool> {
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(users == 0)
    }

    /// Fill the database with a deterministic demo data set
    pub async fn seed_demo(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let base = NaiveDate::from_ymd_opt(2024, 1, 8).context("Invalid seed base date")?;
        let date = |offset: i64| (base + Duration::days(offset)).format("%Y-%m-%d").to_string();

        for (index, name) in ROLES.iter().enumerate() {
            sqlx::query("INSERT INTO roles (id, name) VALUES (?, ?)")
                .bind(index as i64 + 1)
                .bind(*name)
                .execute(&mut *tx)
                .await?;
        }

        for (index, name) in CATEGORIES.iter().enumerate() {
            sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
                .bind(index as i64 + 1)
                .bind(*name)
                .execute(&mut *tx)
                .await?;
        }

        for index in 0..DEMO_USERS {
            let first = FIRST_NAMES[index % FIRST_NAMES.len()];
            let last = LAST_NAMES[(index / FIRST_NAMES.len() + index) % LAST_NAMES.len()];
            // Mostly subscribers, a few staff accounts at the top
            let role_id = match index {
                0 => 1,
                1..=4 => 2,
                5..=14 => 3,
                _ => 4,
            };
            sqlx::query("INSERT INTO users (id, name, email, role_id, created_at) VALUES (?, ?, ?, ?, ?)")
                .bind(index as i64 + 1)
                .bind(format!("{} {}", first, last))
                .bind(format!(
                    "{}.{}{}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    index + 1
                ))
                .bind(role_id)
                .bind(date(index as i64 * 3))
                .execute(&mut *tx)
                .await?;
        }

        for (index, name) in TAGS.iter().enumerate() {
            sqlx::query("INSERT INTO tags (id, name, slug) VALUES (?, ?, ?)")
                .bind(index as i64 + 1)
                .bind(*name)
                .bind(slugify(name))
                .execute(&mut *tx)
                .await?;
        }

        for (index, title) in PAGE_TITLES.iter().enumerate() {
            sqlx::query("INSERT INTO pages (id, title, slug, status, updated_at) VALUES (?, ?, ?, ?, ?)")
                .bind(index as i64 + 1)
                .bind(*title)
                .bind(slugify(title))
                .bind(status_for(index).as_str())
                .bind(date(index as i64 * 5 + 2))
                .execute(&mut *tx)
                .await?;
        }

        for index in 0..DEMO_POSTS {
            let topic = POST_TOPICS[index % POST_TOPICS.len()];
            let subject = POST_SUBJECTS[(index / POST_TOPICS.len()) % POST_SUBJECTS.len()];
            let title = format!("{} {}", topic, subject);
            let status = status_for(index);
            let category_id = (index % 5 != 4).then(|| (index % CATEGORIES.len()) as i64 + 1);
            let author_id = (index % 15) as i64 + 1;
            let published_at = (status != PublishStatus::Draft).then(|| date(index as i64 * 2));
            let post_id = index as i64 + 1;

            sqlx::query(
                "INSERT INTO posts (id, title, slug, status, category_id, author_id, published_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(post_id)
            .bind(&title)
            .bind(format!("{}-{}", slugify(&title), post_id))
            .bind(status.as_str())
            .bind(category_id)
            .bind(author_id)
            .bind(published_at)
            .execute(&mut *tx)
            .await?;

            for step in 0..(index % 3 + 1) {
                let tag_id = ((index * 7 + step * 5) % TAGS.len()) as i64 + 1;
                sqlx::query("INSERT OR IGNORE INTO post_tag (post_id, tag_id) VALUES (?, ?)")
                    .bind(post_id)
                    .bind(tag_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        info!(
            users = DEMO_USERS,
            pages = PAGE_TITLES.len(),
            posts = DEMO_POSTS,
            tags = TAGS.len(),
            "Seeded demo content"
        );
        Ok(())
    }
}

pub const DEMO_USERS: usize = 57;
pub const DEMO_POSTS: usize = 128;

const ROLES: &[&str] = &["Administrator", "Editor", "Author", "Subscriber"];

const CATEGORIES: &[&str] = &["News", "Tutorials", "Releases", "Opinion"];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chiara", "Dmitri", "Elena", "Farah", "Gustav", "Hana", "Ivo", "Jonas", "Keiko", "Luca",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Berg", "Costa", "Dubois", "Eriksen", "Fontaine", "Garcia", "Horvat", "Ibarra",
];

pub const TAGS: &[&str] = &[
    "Rust", "WebAssembly", "Databases", "Performance", "Security", "Design", "Accessibility", "Testing",
    "Deployment", "Community", "Tooling", "Async", "Networking", "Caching", "Search", "Editors",
    "Releases", "Tutorials", "Interviews", "Roadmap", "Migrations", "Observability", "Localization",
];

pub const PAGE_TITLES: &[&str] = &[
    "Home", "About Us", "Contact", "Team", "Careers", "Press", "Privacy Policy", "Terms of Service",
    "Cookie Policy", "Imprint", "Pricing", "Features", "Integrations", "Customers", "Partners",
    "Documentation", "Getting Started", "Installation", "Configuration", "Upgrading", "FAQ", "Support",
    "Status", "Security", "Accessibility Statement", "Sitemap", "Newsletter", "Events", "Webinars",
    "Case Studies", "Brand Assets", "Changelog", "Roadmap", "Community Guidelines",
];

const POST_TOPICS: &[&str] = &[
    "Getting started with",
    "Ten tips for",
    "A deep dive into",
    "What is new in",
    "Lessons learned from",
    "Scaling",
    "Testing",
    "Debugging",
];

const POST_SUBJECTS: &[&str] = &[
    "content modelling",
    "the media library",
    "scheduled publishing",
    "editorial workflows",
    "page templates",
    "search indexing",
    "image optimisation",
    "multilingual sites",
    "user permissions",
    "the admin API",
    "custom fields",
    "static exports",
    "caching layers",
    "webhooks",
    "revisions",
    "SEO metadata",
];

fn status_for(index: usize) -> PublishStatus {
    match index % 6 {
        0 | 3 => PublishStatus::Draft,
        5 => PublishStatus::Archived,
        _ => PublishStatus::Published,
    }
}

fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    async fn count(db: &DbConnection, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(db.pool())
            .await
            .expect("Failed to count rows")
    }

    #[tokio::test]
    async fn test_new_database_is_empty() {
        let db = setup_test().await;
        assert!(db.is_empty().await.unwrap());
        assert_eq!(count(&db, "posts").await, 0);
    }

    #[tokio::test]
    async fn test_seed_demo_fills_every_table() {
        let db = setup_test().await;
        db.seed_demo().await.expect("Failed to seed");

        assert!(!db.is_empty().await.unwrap());
        assert_eq!(count(&db, "roles").await, ROLES.len() as i64);
        assert_eq!(count(&db, "categories").await, CATEGORIES.len() as i64);
        assert_eq!(count(&db, "users").await, DEMO_USERS as i64);
        assert_eq!(count(&db, "tags").await, TAGS.len() as i64);
        assert_eq!(count(&db, "pages").await, PAGE_TITLES.len() as i64);
        assert_eq!(count(&db, "posts").await, DEMO_POSTS as i64);
        assert!(count(&db, "post_tag").await >= DEMO_POSTS as i64);
    }

    #[tokio::test]
    async fn test_drafts_have_no_publication_date() {
        let db = DbConnection::init_test_seeded().await.unwrap();
        let dated_drafts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE status = 'draft' AND published_at IS NOT NULL")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(dated_drafts, 0);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Terms of Service"), "terms-of-service");
        assert_eq!(slugify("  What is new in SEO metadata?"), "what-is-new-in-seo-metadata");
    }
}
