use gloo::net::http::{Request, Response};
use quill_datagrid::NavigationError;
use serde::de::DeserializeOwned;
use shared::{FilterOption, TablePayload};

/// Backend used when `QUILL_API_URL` is not set at build time
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// API client for communicating with the backend server
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Create a new API client with the build-time base URL
    pub fn new() -> Self {
        Self::with_base_url(option_env!("QUILL_API_URL").unwrap_or(DEFAULT_API_URL).to_string())
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server path or a server-generated link
    pub fn resolve(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }

    /// Fetch one page of a collection
    pub async fn fetch_collection<T: DeserializeOwned>(&self, href: &str) -> Result<TablePayload<T>, NavigationError> {
        let response = Request::get(&self.resolve(href))
            .send()
            .await
            .map_err(|e| NavigationError::Network(e.to_string()))?;

        let response = ensure_ok(response).await?;
        response
            .json::<TablePayload<T>>()
            .await
            .map_err(|e| NavigationError::Decode(e.to_string()))
    }

    /// Options for the role filter of the users table
    pub async fn get_roles(&self) -> Result<Vec<FilterOption>, NavigationError> {
        self.get_options("/api/roles").await
    }

    /// Options for the category filter of the posts table
    pub async fn get_categories(&self) -> Result<Vec<FilterOption>, NavigationError> {
        self.get_options("/api/categories").await
    }

    async fn get_options(&self, path: &str) -> Result<Vec<FilterOption>, NavigationError> {
        let response = Request::get(&self.resolve(path))
            .send()
            .await
            .map_err(|e| NavigationError::Network(e.to_string()))?;

        ensure_ok(response)
            .await?
            .json::<Vec<FilterOption>>()
            .await
            .map_err(|e| NavigationError::Decode(e.to_string()))
    }
}

async fn ensure_ok(response: Response) -> Result<Response, NavigationError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = response.text().await.unwrap_or_else(|_| response.status_text());
    Err(NavigationError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_resolve_relative_links() {
        let api = ApiClient::with_base_url("http://localhost:3000/".to_string());
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.resolve("/api/users?page=2"), "http://localhost:3000/api/users?page=2");
        assert_eq!(api.resolve("api/tags"), "http://localhost:3000/api/tags");
        assert_eq!(api.resolve("https://cdn.example.com/api/pages"), "https://cdn.example.com/api/pages");
    }
}
