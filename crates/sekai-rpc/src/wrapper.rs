//! Response wrapping for frontend compatibility.
//!
//! The picker UI expects list results as `{success: true, <field>: [...]}`.
//! Handlers return bare values for those methods and this module adds the
//! envelope.

use serde_json::{json, Value};

/// Wrap raw method results in the envelope the frontend expects.
pub fn wrap_response(method: &str, result: Value) -> Value {
    match method {
        // List wrappers
        "list_repositories" => list("repositories", result),
        "search_characters" => list("characters", result),
        "get_notifications" => list("notifications", result),

        // Dict wrappers
        "get_sticker_defaults" => {
            json!({
                "success": true,
                "defaults": if result.is_null() { json!({}) } else { result }
            })
        }

        // Everything else already carries its own shape
        _ => result,
    }
}

fn list(field: &str, result: Value) -> Value {
    let items = if result.is_null() { json!([]) } else { result };
    let mut wrapped = serde_json::Map::new();
    wrapped.insert("success".to_string(), Value::Bool(true));
    wrapped.insert(field.to_string(), items);
    Value::Object(wrapped)
}
