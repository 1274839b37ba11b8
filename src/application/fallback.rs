// Fallback resolution for loosely shaped API payloads
//
// Only absent keys and JSON null count as missing. A reading of 0 or false is real data.
use crate::domain::risk::normalize_label;
use serde_json::Value;

/// First candidate that is present, else `fallback`.
pub fn resolve<T>(candidates: impl IntoIterator<Item = Option<T>>, fallback: T) -> T {
    candidates.into_iter().flatten().next().unwrap_or(fallback)
}

/// First non-null value stored under any of `aliases`, in alias order.
pub fn field<'a>(data: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| data.get(*key))
        .find(|value| !value.is_null())
}

/// Numeric field with aliases. Numbers are taken as-is and numeric strings are parsed.
/// A boolean, object or non-numeric string is present but has no numeric reading, so that
/// alias is skipped and the next one (or `fallback`) is used.
pub fn resolve_number(data: &Value, aliases: &[&str], fallback: f64) -> f64 {
    let found = aliases
        .iter()
        .find_map(|key| data.get(*key).and_then(as_number));
    if found.is_none() {
        tracing::debug!("No value under {:?}, using fallback {}", aliases, fallback);
    }
    resolve([found], fallback)
}

/// Risk label with aliases, normalized. Absent everywhere means `fallback`.
pub fn resolve_risk(data: &Value, aliases: &[&str], fallback: &str) -> String {
    match field(data, aliases) {
        Some(value) => normalize_risk(value),
        None => {
            tracing::debug!("No risk under {:?}, using fallback {}", aliases, fallback);
            normalize_label(fallback)
        }
    }
}

/// Reduce a risk payload to a lowercase label.
///
/// Objects are unwrapped through their `risk` field once. If what remains is still
/// structured, the whole payload's JSON text is used so it can at least be displayed.
pub fn normalize_risk(value: &Value) -> String {
    let inner = match value {
        Value::Object(map) => map.get("risk").filter(|v| !v.is_null()).unwrap_or(value),
        _ => value,
    };

    let text = match inner {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => other.to_string(),
    };
    normalize_label(&text)
}

/// Optional free-text field. Empty strings are treated as absent.
pub fn resolve_text(data: &Value, aliases: &[&str]) -> Option<String> {
    let text = match field(data, aliases)? {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
