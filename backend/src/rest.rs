use std::path::PathBuf;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{FilterModel, LogEntry, LogResponse};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::domain::{CollectionService, Pages, Posts, Resource, Tags, Users};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub collections: CollectionService,
}

impl AppState {
    pub fn new(collections: CollectionService) -> Self {
        Self { collections }
    }
}

/// Build the router: the `/api` routes plus, when given, the frontend bundle
pub fn create_router(state: AppState, allowed_origin: HeaderValue, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/pages", get(list_collection::<Pages>))
        .route("/posts", get(list_collection::<Posts>))
        .route("/tags", get(list_collection::<Tags>))
        .route("/users", get(list_collection::<Users>))
        .route("/roles", get(list_roles))
        .route("/categories", get(list_categories))
        .route("/logs", post(log_message));

    let router = Router::new().nest("/api", api_routes);
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(cors).with_state(state)
}

/// Axum handler for GET /api/{pages,posts,tags,users}
pub async fn list_collection<R: Resource>(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    info!("GET {} - query: {:?}", R::PATH, query);

    let filters = FilterModel::from_query(query.as_deref().unwrap_or_default());
    match state.collections.list::<R>(filters).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(e) => {
            error!("Error listing {}: {:?}", R::PATH, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing collection").into_response()
        }
    }
}

/// Axum handler for GET /api/roles
pub async fn list_roles(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/roles");

    match state.collections.roles().await {
        Ok(roles) => (StatusCode::OK, Json(roles)).into_response(),
        Err(e) => {
            error!("Error listing roles: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing roles").into_response()
        }
    }
}

/// Axum handler for GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    match state.collections.categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => {
            error!("Error listing categories: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing categories").into_response()
        }
    }
}

/// Axum handler for POST /api/logs: re-emits frontend log lines
pub async fn log_message(Json(entry): Json<LogEntry>) -> Json<LogResponse> {
    let component = entry.component.as_deref().unwrap_or("frontend");

    match entry.level.to_lowercase().as_str() {
        "debug" => debug!(target: "frontend", "[{}] {}", component, entry.message),
        "warn" => warn!(target: "frontend", "[{}] {}", component, entry.message),
        "error" => error!(target: "frontend", "[{}] {}", component, entry.message),
        _ => info!(target: "frontend", "[{}] {}", component, entry.message),
    }

    Json(LogResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbConnection, DEMO_USERS};
    use axum::body::Body;
    use axum::http::Request;
    use shared::{FilterOption, SortDirection, TablePayload, UserRow};
    use tower::util::ServiceExt; // for `oneshot`

    async fn setup_test_app() -> Router {
        let db = DbConnection::init_test_seeded()
            .await
            .expect("Failed to create test database");
        let state = AppState::new(CollectionService::new(db));
        create_router(state, HeaderValue::from_static("http://localhost:8080"), None)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(app: Router, uri: &str) -> (StatusCode, Option<T>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).ok())
    }

    #[tokio::test]
    async fn test_list_users_with_defaults() {
        let app = setup_test_app().await;
        let (status, payload) = get_json::<TablePayload<UserRow>>(app, "/api/users").await;

        assert_eq!(status, StatusCode::OK);
        let payload = payload.unwrap();
        assert_eq!(payload.filters, FilterModel::default());
        assert_eq!(payload.pagination.total, DEMO_USERS as u64);
        assert_eq!(payload.rows.len(), 10);
    }

    #[tokio::test]
    async fn test_malformed_query_is_normalized() {
        let app = setup_test_app().await;
        let (status, payload) = get_json::<TablePayload<UserRow>>(
            app,
            "/api/users?per_page=abc&page=-2&sort_direction=sideways&sort_field=email",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let filters = payload.unwrap().filters;
        assert_eq!(filters.per_page, 10);
        assert_eq!(filters.page, 1);
        assert_eq!(filters.sort_direction, SortDirection::Asc);
        assert_eq!(filters.sort_field, "email");
    }

    #[tokio::test]
    async fn test_role_filter_round_trip() {
        let app = setup_test_app().await;
        let (_, payload) = get_json::<TablePayload<UserRow>>(app, "/api/users?role=1&per_page=25").await;

        let payload = payload.unwrap();
        assert_eq!(payload.pagination.total, 1);
        assert_eq!(payload.rows[0].role, "Administrator");
        assert_eq!(payload.filters.per_page, 25);
        assert!(payload.pagination.links.iter().all(|link| link
            .url
            .as_deref()
            .map_or(true, |url| url.contains("role=1"))));
    }

    #[tokio::test]
    async fn test_list_roles() {
        let app = setup_test_app().await;
        let (status, roles) = get_json::<Vec<FilterOption>>(app, "/api/roles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(roles.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_log_message() {
        let app = setup_test_app().await;
        let entry = LogEntry {
            level: "warn".into(),
            message: "Failed to load users".into(),
            component: Some("users_table".into()),
        };
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/logs")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&entry).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let response: LogResponse = serde_json::from_slice(&body).unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_unknown_route_without_static_dir() {
        let app = setup_test_app().await;
        let request = Request::builder().uri("/api/widgets").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
