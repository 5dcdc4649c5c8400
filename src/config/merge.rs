//! Deep merge of settings tiers.
//!
//! Objects are merged field by field, higher tiers win. Arrays are replaced
//! entirely, not concatenated: a repository that sets `includes.dirs` gets
//! exactly the directories it lists.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use monobuild::config::deep_merge;
///
/// let base = json!({
///     "discover": { "dirs": ["."], "search_depth": 10 },
///     "includes": { "dirs": ["includes"] }
/// });
/// let overlay = json!({
///     "discover": { "search_depth": 3 },
///     "includes": { "dirs": ["ci/includes"] }
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["discover"]["dirs"], json!(["."]));
/// assert_eq!(result["discover"]["search_depth"], json!(3));
/// assert_eq!(result["includes"]["dirs"], json!(["ci/includes"]));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}
