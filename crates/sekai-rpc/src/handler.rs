//! JSON-RPC request handlers.

use crate::server::AppState;
use crate::wrapper::wrap_response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sekai_core::{
    reload_repositories, RepositoryDescriptor, RepositoryEntry, SekaiError, TextSettings,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}({:?})", method, params);

    if method == "health_check" {
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::success(id, json!({"status": "ok"}))),
        );
    }

    match dispatch_method(&state, method, &params).await {
        Ok(value) => {
            let wrapped = wrap_response(method, value);
            (StatusCode::OK, Json(JsonRpcResponse::success(id, wrapped)))
        }
        Err(e) => {
            error!("RPC error for {}: {}", method, e);
            let code = e.to_rpc_error_code();
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(id, code, e.to_string())),
            )
        }
    }
}

// ============================================================================
// Helper macros for extracting parameters
// ============================================================================

/// Extract an optional string parameter, supporting both snake_case and camelCase.
macro_rules! get_str_param {
    ($params:expr, $snake:literal, $camel:literal) => {
        $params
            .get($snake)
            .or_else(|| $params.get($camel))
            .and_then(|v| v.as_str())
    };
}

/// Extract a required, non-blank string parameter or return an error.
macro_rules! require_str_param {
    ($params:expr, $snake:literal, $camel:literal) => {
        match get_str_param!($params, $snake, $camel) {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => {
                return Err(SekaiError::InvalidParams {
                    message: format!("Missing required parameter: {}", $snake),
                });
            }
        }
    };
}

/// Reject anything that is not an absolute http(s) URL.
fn require_http_url(value: &str, param: &str) -> sekai_core::Result<()> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(SekaiError::InvalidParams {
            message: format!("{} must use http or https, got {}", param, parsed.scheme()),
        }),
        Err(e) => Err(SekaiError::InvalidParams {
            message: format!("{} is not a valid URL: {}", param, e),
        }),
    }
}

// ============================================================================
// Method dispatcher
// ============================================================================

/// Dispatch a method call to the repository manager.
async fn dispatch_method(
    state: &AppState,
    method: &str,
    params: &Value,
) -> sekai_core::Result<Value> {
    let manager = &state.manager;

    match method {
        // ====================================================================
        // Loading
        // ====================================================================
        "load_repository" => {
            let name = require_str_param!(params, "name", "name");
            let url = require_str_param!(params, "url", "url");
            require_http_url(&url, "url")?;

            let loaded = manager
                .load_repository(&RepositoryDescriptor::new(name, url))
                .await;
            Ok(json!({
                "success": loaded.is_some(),
                "repository": loaded.as_deref()
            }))
        }

        "reload_repositories" => {
            if let Some(list) = params.get("repositories") {
                let entries: Vec<RepositoryEntry> = serde_json::from_value(list.clone())
                    .map_err(|e| SekaiError::InvalidParams {
                        message: format!("repositories: {}", e),
                    })?;
                let mut settings = state.settings.write().await;
                settings.repositories = entries;
                if let Some(path) = &state.settings_path {
                    settings.save(path)?;
                    info!(
                        "Saved {} repository entries to {}",
                        settings.repositories.len(),
                        path.display()
                    );
                }
            }

            let settings = state.settings.read().await.clone();
            let report = reload_repositories(manager, &settings).await;
            Ok(serde_json::to_value(report)?)
        }

        "clear_cache" => {
            manager.clear_cache();
            Ok(json!({"success": true}))
        }

        "probe_repository" => {
            let meta_url = require_str_param!(params, "meta_url", "metaUrl");
            require_http_url(&meta_url, "meta_url")?;

            let name = manager.probe_repository(&meta_url).await;
            Ok(json!({
                "success": name.is_some(),
                "name": name
            }))
        }

        // ====================================================================
        // Queries
        // ====================================================================
        "list_repositories" => {
            let repositories = manager.all_repositories();
            let repositories: Vec<_> = repositories.iter().map(|r| r.as_ref()).collect();
            Ok(serde_json::to_value(repositories)?)
        }

        "get_repository" => {
            let url = require_str_param!(params, "url", "url");
            let data = manager
                .repository(&url)
                .ok_or(SekaiError::RepositoryNotFound { url })?;
            Ok(json!({
                "success": true,
                "repository": data.as_ref()
            }))
        }

        "get_character" => {
            let unique_id = require_str_param!(params, "unique_id", "uniqueId");
            let character = manager
                .character_by_unique_id(&unique_id)
                .ok_or(SekaiError::CharacterNotFound { unique_id })?;
            Ok(json!({
                "success": true,
                "character": character
            }))
        }

        "search_characters" => {
            let query = get_str_param!(params, "query", "query").unwrap_or("");
            Ok(serde_json::to_value(manager.search_characters(query))?)
        }

        "get_settings" => {
            let settings = state.settings.read().await;
            Ok(serde_json::to_value(&*settings)?)
        }

        "get_notifications" => Ok(serde_json::to_value(state.notifications.drain())?),

        // ====================================================================
        // Sticker helpers
        // ====================================================================
        "get_sticker_defaults" => Ok(serde_json::to_value(TextSettings::default())?),

        "get_sticker_draft" => {
            let unique_id = require_str_param!(params, "unique_id", "uniqueId");
            let mut draft = manager
                .sticker_draft(&unique_id)
                .ok_or(SekaiError::CharacterNotFound { unique_id })?;
            if let Some(text) = get_str_param!(params, "text", "text") {
                draft = draft.with_text(text);
            }
            Ok(json!({
                "success": true,
                "draft": draft
            }))
        }

        _ => {
            warn!("Method not found: {}", method);
            Err(SekaiError::MethodNotFound {
                method: method.to_string(),
            })
        }
    }
}
