//! Request templating and JSON path lookup shared by profiles and decoders.

use serde_json::Value;

/// Values substituted into URL, body and path templates.
///
/// Supported placeholders: `{base}`, `{quote}`, `{base_lower}`,
/// `{quote_lower}`, `{id}`, `{depth}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    /// Exchange-native base ticker
    pub base: String,
    /// Exchange-native quote ticker
    pub quote: String,
    /// Exchange market id
    pub id: String,
    pub depth: usize,
}

impl Placeholders {
    pub fn render(&self, template: &str) -> String {
        if !template.contains('{') {
            return template.to_string();
        }
        template
            .replace("{base_lower}", &self.base.to_ascii_lowercase())
            .replace("{quote_lower}", &self.quote.to_ascii_lowercase())
            .replace("{base}", &self.base)
            .replace("{quote}", &self.quote)
            .replace("{id}", &self.id)
            .replace("{depth}", &self.depth.to_string())
    }

    /// Render every string leaf of a JSON template.
    pub fn render_json(&self, template: &Value) -> Value {
        match template {
            Value::String(s) => Value::String(self.render(s)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.render_json(v)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.render_json(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Follow `path` from `value`. Object segments are keys, numeric segments
/// index arrays, and placeholders inside segments are rendered first.
pub fn lookup<'a>(value: &'a Value, path: &[String], placeholders: &Placeholders) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        let segment = placeholders.render(segment);
        current = match current {
            Value::Object(map) => map.get(segment.as_str())?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Human-readable form of a path for error messages.
pub fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join("/")
    }
}

/// Owned path from string slices.
pub fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}
