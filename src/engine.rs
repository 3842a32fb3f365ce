use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static PADDED_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{query\}\s*").unwrap());

/// One entry of `search.json`: `{ id, name, url, enabledByDefault? }`.
/// The raw entry is kept as is; fields are read on demand.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SearchEngine(pub Value);

impl SearchEngine {
    #[cfg(test)]
    pub fn new(id: &str, name: &str, url: &str) -> Self {
        SearchEngine(serde_json::json!({ "id": id, "name": name, "url": url }))
    }

    #[cfg(test)]
    pub fn with(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.to_string(), value);
        }
        self
    }

    fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            _ => String::new()
        }
    }

    pub fn id(&self) -> String {
        self.text("id")
    }

    pub fn name(&self) -> String {
        self.text("name")
    }

    /// Result page template containing [`QUERY_PLACEHOLDER`].
    pub fn url(&self) -> String {
        self.text("url")
    }

    pub fn is_default(&self) -> bool {
        is_truthy(self.0.get("enabledByDefault"))
    }

    pub fn icon(&self) -> EngineIcon {
        EngineIcon::for_engine(&self.id())
    }
}

/// JavaScript truthiness for a JSON value.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true
    }
}

/// Reads the `engines` array of `search.json` as is. Anything else yields
/// no engines at all.
pub fn extract_engines(doc: &Value) -> Vec<SearchEngine> {
    match doc.get("engines") {
        Some(Value::Array(entries)) => entries.iter().cloned().map(SearchEngine).collect(),
        _ => Vec::new()
    }
}

/// Trims whitespace and byte order marks from both ends.
pub fn trim_input(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Trims the template and collapses whitespace around the first placeholder.
pub fn clean_template(template: &str) -> String {
    PADDED_PLACEHOLDER
        .replace(trim_input(template), NoExpand(QUERY_PLACEHOLDER))
        .into_owned()
}

pub fn encode_query(query: &str) -> String {
    utf8_percent_encode(query, URI_COMPONENT).to_string()
}

/// Result page URL for `query`. Templates without a placeholder come back
/// unchanged.
pub fn dispatch_url(template: &str, query: &str) -> String {
    clean_template(template).replacen(QUERY_PLACEHOLDER, &encode_query(trim_input(query)), 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineIcon {
    GraduationCap,
    Globe,
    ShieldCheck,
    Chrome,
    Github,
    Search
}

impl EngineIcon {
    pub fn for_engine(id: &str) -> Self {
        match id {
            "googlescholar" => EngineIcon::GraduationCap,
            "google" => EngineIcon::Globe,
            "bing" => EngineIcon::ShieldCheck,
            "baidu" => EngineIcon::Chrome,
            "github" => EngineIcon::Github,
            // duckduckgo and unknown ids share the magnifier
            _ => EngineIcon::Search
        }
    }

    /// Icon name, used as a css class suffix.
    pub fn name(self) -> &'static str {
        match self {
            EngineIcon::GraduationCap => "graduation-cap",
            EngineIcon::Globe => "globe",
            EngineIcon::ShieldCheck => "shield-check",
            EngineIcon::Chrome => "chrome",
            EngineIcon::Github => "github",
            EngineIcon::Search => "search"
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            EngineIcon::GraduationCap => "🎓",
            EngineIcon::Globe => "🌐",
            EngineIcon::ShieldCheck => "🛡",
            EngineIcon::Chrome => "◎",
            EngineIcon::Github => "🐙",
            EngineIcon::Search => "🔍"
        }
    }
}
