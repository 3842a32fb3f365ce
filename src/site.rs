use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_blank")]
    Blank,
    #[serde(rename = "_self")]
    SameTab
}

/// Sanitized `site.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SiteConfig {
    pub basic: BasicInfo,
    pub appearance: Appearance,
    pub navigation: NavigationSettings,
    /// Remaining top level fields, minus `search`.
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BasicInfo {
    pub title: String,
    pub description: String,
    pub keywords: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Appearance {
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSettings {
    pub link_target: LinkTarget
}

pub fn normalize_theme(value: Option<&Value>) -> Theme {
    match value.and_then(Value::as_str) {
        Some("light") => Theme::Light,
        Some("dark") => Theme::Dark,
        _ => Theme::System
    }
}

pub fn normalize_link_target(value: Option<&Value>) -> LinkTarget {
    match value.and_then(Value::as_str) {
        Some("_self") => LinkTarget::SameTab,
        _ => LinkTarget::Blank
    }
}

fn object(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new()
    }
}

/// Keyword lists written as arrays are joined with commas.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        Value::Array(parts) => Some(
            parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(",")
        ),
        _ => None
    }
}

/// Copies the raw `site.json` document, coercing `theme` and `linkTarget`
/// into their allowed values and dropping `search`.
pub fn normalize_site(raw: &Value) -> SiteConfig {
    let mut extra = object(Some(raw));
    extra.remove("search");

    let mut basic = object(extra.remove("basic").as_ref());
    let mut appearance = object(extra.remove("appearance").as_ref());
    let navigation = object(extra.remove("navigation").as_ref());

    let theme = normalize_theme(appearance.remove("theme").as_ref());
    let favicon = take_string(&mut appearance, "favicon").filter(|f| !f.is_empty());

    SiteConfig {
        basic: BasicInfo {
            title: take_string(&mut basic, "title").unwrap_or_default(),
            description: take_string(&mut basic, "description").unwrap_or_default(),
            keywords: take_string(&mut basic, "keywords").unwrap_or_default(),
            extra: basic
        },
        appearance: Appearance {
            theme,
            favicon,
            extra: appearance
        },
        navigation: NavigationSettings {
            link_target: normalize_link_target(navigation.get("linkTarget"))
        },
        extra
    }
}
