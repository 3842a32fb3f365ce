use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::navigation::NavigationData;

pub const MANIFEST_FILE: &str = "homenav.toml";
pub const SITE_FILE: &str = "site.json";
pub const NAVIGATION_FILE: &str = "navigation.json";
pub const SEARCH_FILE: &str = "search.json";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("missing document {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    },
    #[error("invalid manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error
    }
}

/// Optional `homenav.toml` at the site root.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Manifest {
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
    pub template: String,
    pub minify: bool
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            template: String::from("index.html"),
            minify: false
        }
    }
}

impl Manifest {
    pub fn load(dir: &Path) -> Result<Self, DocumentError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            debug!("No {} found, using defaults", MANIFEST_FILE);
            return Ok(Self::default());
        }
        let text = read(&path)?;
        toml::from_str(&text).map_err(|source| DocumentError::Manifest { path, source })
    }
}

/// The three content documents, parsed but not yet sanitized.
#[derive(Debug, Clone)]
pub struct Documents {
    pub site: Value,
    pub navigation: NavigationData,
    pub search: Value
}

impl Documents {
    /// `search.json` may be absent or broken; the other two are required.
    pub fn load(content_dir: &Path) -> Result<Self, DocumentError> {
        info!("Reading content from {}", content_dir.display());
        let site = parse(&content_dir.join(SITE_FILE))?;
        let navigation = parse(&content_dir.join(NAVIGATION_FILE))?;
        let search = match parse(&content_dir.join(SEARCH_FILE)) {
            Ok(search) => search,
            Err(DocumentError::Missing(_)) => {
                debug!("No {} found, search disabled", SEARCH_FILE);
                Value::Null
            }
            Err(e) => {
                warn!("Ignoring search engines: {}", e);
                Value::Null
            }
        };
        Ok(Self {
            site,
            navigation,
            search
        })
    }
}

fn read(path: &Path) -> Result<String, DocumentError> {
    fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source
    })
}

fn parse<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::Missing(path.to_path_buf()));
    }
    serde_json::from_str(&read(path)?).map_err(|source| DocumentError::Json {
        path: path.to_path_buf(),
        source
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn manifest_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Manifest::load(dir.path()).unwrap(), Manifest::default());
    }

    #[test]
    fn manifest_overrides_fields() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), MANIFEST_FILE, "output_dir = \"public\"\nminify = true\n");
        let manifest = Manifest::load(dir.path()).unwrap();
        assert_eq!(manifest.output_dir, PathBuf::from("public"));
        assert!(manifest.minify);
        assert_eq!(manifest.content_dir, PathBuf::from("content"));
    }

    #[test]
    fn bad_manifest_is_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), MANIFEST_FILE, "minify = \"yes\"");
        assert!(matches!(
            Manifest::load(dir.path()),
            Err(DocumentError::Manifest { .. })
        ));
    }

    #[test]
    fn loads_documents_without_search() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), SITE_FILE, r#"{ "basic": { "title": "Home" } }"#);
        write(dir.path(), NAVIGATION_FILE, r#"{ "navigationItems": [] }"#);
        let docs = Documents::load(dir.path()).unwrap();
        assert_eq!(docs.site["basic"]["title"], json!("Home"));
        assert!(docs.navigation.navigation_items.is_empty());
        assert_eq!(docs.search, Value::Null);
    }

    #[test]
    fn broken_search_document_is_ignored() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), SITE_FILE, "{}");
        write(dir.path(), NAVIGATION_FILE, "{}");
        write(dir.path(), SEARCH_FILE, "{ \"engines\": [");
        assert_eq!(Documents::load(dir.path()).unwrap().search, Value::Null);
    }

    #[test]
    fn odd_navigation_nodes_still_load() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), SITE_FILE, "{}");
        write(
            dir.path(),
            NAVIGATION_FILE,
            r#"{ "navigationItems": [
                { "title": "Old", "enabled": false, "items": "legacy" },
                { "title": "Live", "items": ["raw"] }
            ] }"#
        );
        let docs = Documents::load(dir.path()).unwrap();
        assert_eq!(docs.navigation.navigation_items.len(), 2);
    }

    #[test]
    fn missing_site_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), NAVIGATION_FILE, r#"{ "navigationItems": [] }"#);
        assert!(matches!(
            Documents::load(dir.path()),
            Err(DocumentError::Missing(p)) if p.ends_with(SITE_FILE)
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), SITE_FILE, "{}");
        write(dir.path(), NAVIGATION_FILE, "{ nope");
        let err = Documents::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains(NAVIGATION_FILE), "{err}");
    }
}
