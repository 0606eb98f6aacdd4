//! Effective run configuration

use serde_json::{Map, Value};

/// Build the configuration for one run.
///
/// Every top-level key of the stored assistant config is kept. The nested
/// `configurable` map is extended with the caller's identifiers, which
/// replace any stored values under the same keys.
pub fn merge_run_config(
    stored: &Value,
    user_id: &str,
    thread_id: &str,
    assistant_id: &str,
) -> Value {
    let mut config = stored.as_object().cloned().unwrap_or_default();

    let mut configurable = config
        .get("configurable")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    configurable.insert("user_id".to_string(), Value::from(user_id));
    configurable.insert("thread_id".to_string(), Value::from(thread_id));
    configurable.insert("assistant_id".to_string(), Value::from(assistant_id));

    config.insert("configurable".to_string(), Value::Object(configurable));
    Value::Object(config)
}
