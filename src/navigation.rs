use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The `navigation.json` document. Categories keep their raw JSON so that
/// unexpected shapes pass through instead of failing the build.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub navigation_items: Vec<Category>
}

/// Top level group of links: `{ enabled?, items?, subCategories?, ... }`.
/// Subcategories and items stay as JSON nodes inside it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Category(pub Value);

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>
{
    match Value::deserialize(deserializer)? {
        Value::Array(nodes) => Ok(nodes.into_iter().map(Category).collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            warn!("navigationItems is not a list, ignoring: {}", other);
            Ok(Vec::new())
        }
    }
}

impl Category {
    pub fn items(&self) -> Option<&Vec<Value>> {
        self.0.get("items").and_then(Value::as_array)
    }

    pub fn sub_categories(&self) -> Option<&Vec<Value>> {
        self.0.get("subCategories").and_then(Value::as_array)
    }
}

/// Only an explicit boolean `false` disables a node.
pub fn is_enabled(flag: Option<&Value>) -> bool {
    !matches!(flag, Some(Value::Bool(false)))
}

fn node_enabled(node: &Value) -> bool {
    is_enabled(node.get("enabled"))
}

/// Builds a copy of `data` without disabled categories, subcategories or
/// items. Containers left empty are kept.
pub fn filter_navigation(data: &NavigationData) -> NavigationData {
    NavigationData {
        navigation_items: data
            .navigation_items
            .iter()
            .filter(|c| node_enabled(&c.0))
            .map(|c| Category(filter_container(&c.0)))
            .collect()
    }
}

fn filter_container(node: &Value) -> Value {
    let mut node = node.clone();
    if let Value::Object(map) = &mut node {
        filter_children(map, "items", Value::clone);
        filter_children(map, "subCategories", filter_container);
    }
    node
}

/// Keeps the enabled entries of `map[key]`. A child list that is not an
/// array is dropped, the same as a null one.
fn filter_children(map: &mut Map<String, Value>, key: &str, child: fn(&Value) -> Value) {
    let kept = match map.get(key) {
        None => return,
        Some(Value::Array(nodes)) => Some(
            nodes
                .iter()
                .filter(|n| node_enabled(n))
                .map(child)
                .collect()
        ),
        Some(Value::Null) => None,
        Some(other) => {
            warn!("Dropping {} that is not a list: {}", key, other);
            None
        }
    };
    match kept {
        Some(kept) => {
            map.insert(key.to_string(), Value::Array(kept));
        }
        None => {
            map.remove(key);
        }
    }
}

impl NavigationData {
    /// Number of links across all categories and subcategories.
    pub fn link_count(&self) -> usize {
        self.navigation_items
            .iter()
            .map(|c| {
                let nested: usize = c
                    .sub_categories()
                    .into_iter()
                    .flatten()
                    .map(|s| s.get("items").and_then(Value::as_array).map_or(0, Vec::len))
                    .sum();
                c.items().map_or(0, Vec::len) + nested
            })
            .sum()
    }
}
