use serde_json::Value;

/// Return true if any string reachable from `node` contains `needle`.
///
/// Mapping values and sequence elements are visited recursively; mapping keys
/// are not. Numbers, booleans and null never match. The comparison is an exact,
/// case-sensitive substring test.
pub fn contains_variable(node: &Value, needle: &str) -> bool {
    match node {
        Value::String(text) => text.contains(needle),
        Value::Array(items) => items.iter().any(|item| contains_variable(item, needle)),
        Value::Object(map) => map.values().any(|value| contains_variable(value, needle)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Return true if `node` contains at least one of `needles`.
pub fn contains_any_variable(node: &Value, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|needle| contains_variable(node, needle))
}
