use serde::Serialize;

use crate::config::Documents;
use crate::engine::{SearchEngine, extract_engines};
use crate::navigation::{NavigationData, filter_navigation};
use crate::site::{SiteConfig, normalize_site};

/// Everything the page needs, derived fresh from the content documents.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedData {
    pub site: SiteConfig,
    pub navigation: NavigationData,
    pub engines: Vec<SearchEngine>
}

/// Head metadata taken from the site config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub favicon: Option<String>
}

pub fn prepare(documents: &Documents) -> PreparedData {
    PreparedData {
        site: normalize_site(&documents.site),
        navigation: filter_navigation(&documents.navigation),
        engines: extract_engines(&documents.search)
    }
}

impl PageMeta {
    pub fn from_site(site: &SiteConfig) -> Self {
        Self {
            title: site.basic.title.clone(),
            description: site.basic.description.clone(),
            keywords: site.basic.keywords.clone(),
            favicon: site.appearance.favicon.clone()
        }
    }
}
