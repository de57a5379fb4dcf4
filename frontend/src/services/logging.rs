use gloo::net::http::Request;
use shared::LogEntry;
use wasm_bindgen_futures::spawn_local;

use crate::services::api::ApiClient;

/// Forwards log lines to the server log (`POST /api/logs`)
pub struct Logger;

impl Logger {
    pub fn debug_with_component(component: &str, message: &str) {
        Self::log("debug", message, Some(component.to_string()));
    }

    pub fn info_with_component(component: &str, message: &str) {
        Self::log("info", message, Some(component.to_string()));
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log("warn", message, Some(component.to_string()));
    }

    pub fn error_with_component(component: &str, message: &str) {
        Self::log("error", message, Some(component.to_string()));
    }

    fn log(level: &str, message: &str, component: Option<String>) {
        let entry = LogEntry {
            level: level.to_string(),
            message: message.to_string(),
            component,
        };
        let url = ApiClient::new().resolve("/api/logs");

        // Send log asynchronously without blocking
        spawn_local(async move {
            match Request::post(&url).json(&entry) {
                Ok(request) => {
                    let _ = request.send().await;
                }
                Err(e) => gloo::console::error!("Failed to encode log entry:", e.to_string()),
            }
        });
    }
}
