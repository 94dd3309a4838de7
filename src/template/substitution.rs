//! Variable substitution engine for message content

use super::types::TriggerPayload;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Resolve a dotted path (`user.name`, `items.0`) inside the payload
pub fn lookup_path<'a>(payload: &'a TriggerPayload, path: &str) -> Option<&'a serde_json::Value> {
    let mut segments = path.split('.');
    let mut current = payload.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            serde_json::Value::Object(map) => map.get(segment)?,
            serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Render `{{variable}}` placeholders in a string against the payload.
///
/// Missing and null values render as empty strings. An unterminated
/// `{{` is kept as literal text.
pub fn render(template: &str, payload: &TriggerPayload) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            result.push_str(&rest[start..]);
            return result;
        };

        let key = after_open[..end].trim();
        if let Some(value) = lookup_path(payload, key) {
            result.push_str(&value_to_string(value));
        }

        rest = &after_open[end + CLOSE.len()..];
    }

    result.push_str(rest);
    result
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        // For arrays and objects, use JSON representation
        _ => value.to_string(),
    }
}
