use std::error::Error;
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::{Documents, Manifest};
use crate::engine::{SearchEngine, clean_template, dispatch_url, trim_input};
use crate::prepare::prepare;

/// Receives the result page URLs produced by a submission.
pub trait Navigator {
    fn open(&mut self, url: &str);
}

/// Opens each URL in the system browser. A fresh browser tab has no opener
/// handle back to this process.
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn open(&mut self, url: &str) {
        info!("Opening {}", url);
        if let Err(e) = webbrowser::open(url) {
            warn!("Could not open {}: {}", url, e);
        }
    }
}

/// Writes each URL to stdout.
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn open(&mut self, url: &str) {
        println!("{url}");
    }
}

impl Navigator for Vec<String> {
    fn open(&mut self, url: &str) {
        self.push(url.to_string());
    }
}

/// State of the search box: the engines it was given, the query text and
/// the ids currently toggled on.
#[derive(Debug, Default, Clone)]
pub struct SearchBar {
    engines: Vec<SearchEngine>,
    query: String,
    selected_engines: Vec<String>
}

/// Render view of one engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineChip {
    pub id: String,
    pub name: String,
    pub icon: &'static str,
    pub glyph: &'static str,
    pub template: String,
    pub selected: bool
}

/// Engines flagged `enabledByDefault`, or the first engine when none is.
pub fn initial_selection(engines: &[SearchEngine]) -> Vec<String> {
    let defaults: Vec<String> = engines
        .iter()
        .filter(|e| e.is_default())
        .map(SearchEngine::id)
        .collect();
    if defaults.is_empty() {
        engines.iter().take(1).map(SearchEngine::id).collect()
    } else {
        defaults
    }
}

impl SearchBar {
    pub fn new(engines: Vec<SearchEngine>) -> Self {
        let mut bar = Self::default();
        bar.set_engines(engines);
        bar
    }

    /// Supplies a new engine list. The selection is reinitialized when the
    /// list differs from the current one and is not empty.
    pub fn set_engines(&mut self, engines: Vec<SearchEngine>) {
        if engines == self.engines {
            return;
        }
        self.engines = engines;
        if !self.engines.is_empty() {
            self.selected_engines = initial_selection(&self.engines);
            debug!("Initial engine selection: {:?}", self.selected_engines);
        }
    }

    pub fn engines(&self) -> &[SearchEngine] {
        &self.engines
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selected_engines(&self) -> &[String] {
        &self.selected_engines
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_engines.iter().any(|s| s == id)
    }

    pub fn toggle_engine(&mut self, id: &str) {
        if self.is_selected(id) {
            self.selected_engines.retain(|s| s != id);
        } else {
            self.selected_engines.push(id.to_string());
        }
    }

    /// Submits the current query.
    pub fn submit(&self, navigator: &mut impl Navigator) -> Vec<String> {
        self.handle_submit(&self.query, navigator)
    }

    /// Opens one result page per selected engine, in engine list order.
    /// Blank queries and an empty engine list do nothing.
    pub fn handle_submit(&self, query: &str, navigator: &mut impl Navigator) -> Vec<String> {
        let query = trim_input(query);
        if query.is_empty() || self.engines.is_empty() {
            return Vec::new();
        }
        self.engines
            .iter()
            .filter(|e| self.is_selected(&e.id()))
            .map(|e| {
                let url = dispatch_url(&e.url(), query);
                navigator.open(&url);
                url
            })
            .collect()
    }

    /// Nothing is rendered without engines.
    pub fn is_visible(&self) -> bool {
        !self.engines.is_empty()
    }

    pub fn chips(&self) -> Vec<EngineChip> {
        self.engines
            .iter()
            .map(|e| {
                let id = e.id();
                let icon = e.icon();
                EngineChip {
                    selected: self.is_selected(&id),
                    id,
                    name: e.name(),
                    icon: icon.name(),
                    glyph: icon.glyph(),
                    template: clean_template(&e.url())
                }
            })
            .collect()
    }
}

fn load_search_bar(dir: &Path) -> Result<SearchBar, Box<dyn Error>> {
    let manifest = Manifest::load(dir)?;
    let documents = Documents::load(&dir.join(&manifest.content_dir))?;
    Ok(SearchBar::new(prepare(&documents).engines))
}

pub fn list_engines(dir: &Path) -> Result<(), Box<dyn Error>> {
    let bar = load_search_bar(dir)?;
    if !bar.is_visible() {
        info!("No search engines configured");
        return Ok(());
    }
    for chip in bar.chips() {
        let marker = if chip.selected { "*" } else { " " };
        println!("{} {} {:<16} {}", marker, chip.glyph, chip.id, chip.name);
    }
    Ok(())
}

/// Toggles `toggles` on top of the initial selection, then submits `query`.
pub fn run_search(
    dir: &Path,
    toggles: &[String],
    query: &str,
    print: bool
) -> Result<(), Box<dyn Error>> {
    let mut bar = load_search_bar(dir)?;
    if !bar.is_visible() {
        warn!("No search engines configured, nothing to do");
        return Ok(());
    }
    for id in toggles {
        if !bar.engines().iter().any(|e| &e.id() == id) {
            warn!("Unknown search engine: {}", id);
        }
        bar.toggle_engine(id);
    }
    bar.set_query(query);
    debug!("Selected engines: {:?}", bar.selected_engines());

    if trim_input(bar.query()).is_empty() {
        warn!("Empty query, nothing to search");
        return Ok(());
    }
    let selected = bar.engines().iter().filter(|e| bar.is_selected(&e.id())).count();
    if selected > 1 && !print {
        info!("Opening {} tabs, a popup blocker may hold some back", selected);
    }

    let urls = if print {
        bar.submit(&mut PrintNavigator)
    } else {
        bar.submit(&mut BrowserNavigator)
    };
    debug!("Dispatched {:?}", urls);
    if urls.is_empty() {
        warn!("No search engine selected");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::json;

    use super::*;

    fn engine(id: &str) -> SearchEngine {
        SearchEngine::new(id, &id.to_uppercase(), &format!("https://{id}.test/?q={{query}}"))
    }

    fn default_engine(id: &str) -> SearchEngine {
        engine(id).with("enabledByDefault", json!(true))
    }

    fn scenario() -> SearchBar {
        SearchBar::new(vec![
            SearchEngine::new("google", "Google", "https://google.com/search?q={query}"),
            SearchEngine::new("github", "GitHub", "https://github.com/search?q={query}")
                .with("enabledByDefault", json!(true))
        ])
    }

    #[test]
    fn selects_flagged_defaults() {
        let bar = SearchBar::new(vec![engine("a"), default_engine("b"), default_engine("c")]);
        assert_eq!(bar.selected_engines(), ["b", "c"]);
    }

    #[test]
    fn falls_back_to_first_engine() {
        let bar = SearchBar::new(vec![engine("a"), engine("b")]);
        assert_eq!(bar.selected_engines(), ["a"]);
    }

    #[test]
    fn falsy_default_flag_does_not_select() {
        let bar = SearchBar::new(vec![
            engine("a"),
            engine("b").with("enabledByDefault", json!(false))
        ]);
        assert_eq!(bar.selected_engines(), ["a"]);
    }

    #[test]
    fn empty_engine_list_selects_nothing() {
        let bar = SearchBar::new(Vec::new());
        assert!(bar.selected_engines().is_empty());
        assert!(!bar.is_visible());
        assert!(bar.chips().is_empty());
    }

    #[test]
    fn reinitializes_only_for_a_new_list() {
        let mut bar = SearchBar::new(vec![engine("a"), engine("b")]);
        bar.toggle_engine("b");
        bar.set_engines(vec![engine("a"), engine("b")]);
        assert_eq!(bar.selected_engines(), ["a", "b"]);

        bar.set_engines(Vec::new());
        assert_eq!(bar.selected_engines(), ["a", "b"]);

        bar.set_engines(vec![engine("c"), default_engine("d")]);
        assert_eq!(bar.selected_engines(), ["d"]);
    }

    #[test]
    fn toggle_appends_and_removes() {
        let mut bar = SearchBar::new(vec![engine("a"), engine("b"), engine("c")]);
        bar.toggle_engine("c");
        bar.toggle_engine("b");
        assert_eq!(bar.selected_engines(), ["a", "c", "b"]);
        bar.toggle_engine("a");
        assert_eq!(bar.selected_engines(), ["c", "b"]);
    }

    #[test]
    fn toggling_twice_restores_membership() {
        let mut bar = SearchBar::new(vec![engine("a"), default_engine("b"), engine("c")]);
        for id in ["a", "b", "c", "unknown"] {
            let before: BTreeSet<_> = bar.selected_engines().iter().cloned().collect();
            bar.toggle_engine(id);
            bar.toggle_engine(id);
            let after: BTreeSet<_> = bar.selected_engines().iter().cloned().collect();
            assert_eq!(before, after, "{id}");
        }
    }

    #[test]
    fn can_deselect_everything() {
        let mut bar = SearchBar::new(vec![engine("a")]);
        bar.toggle_engine("a");
        assert!(bar.selected_engines().is_empty());
        let mut opened: Vec<String> = Vec::new();
        assert!(bar.handle_submit("rust", &mut opened).is_empty());
        assert!(opened.is_empty());
    }

    #[test]
    fn blank_query_opens_nothing() {
        let bar = scenario();
        let mut opened: Vec<String> = Vec::new();
        for query in ["", "   ", "\t\n", "\u{feff}", " \u{feff} "] {
            bar.handle_submit(query, &mut opened);
        }
        assert!(opened.is_empty());
    }

    #[test]
    fn no_engines_opens_nothing() {
        let bar = SearchBar::new(Vec::new());
        let mut opened: Vec<String> = Vec::new();
        bar.handle_submit("rust", &mut opened);
        assert!(opened.is_empty());
    }

    #[test]
    fn opens_selected_engine() {
        let mut bar = scenario();
        assert_eq!(bar.selected_engines(), ["github"]);
        bar.set_query("rust");
        let mut opened: Vec<String> = Vec::new();
        bar.submit(&mut opened);
        assert_eq!(opened, ["https://github.com/search?q=rust"]);
    }

    #[test]
    fn dispatches_in_engine_order() {
        let mut bar = SearchBar::new(vec![engine("a"), engine("b"), engine("c")]);
        bar.toggle_engine("c");
        bar.toggle_engine("b");
        let mut opened: Vec<String> = Vec::new();
        let urls = bar.handle_submit(" two words ", &mut opened);
        assert_eq!(
            opened,
            [
                "https://a.test/?q=two%20words",
                "https://b.test/?q=two%20words",
                "https://c.test/?q=two%20words"
            ]
        );
        assert_eq!(urls, opened);
    }

    #[test]
    fn chips_mirror_selection() {
        let mut bar = scenario();
        let selected = |bar: &SearchBar| bar.chips().iter().map(|c| c.selected).collect::<Vec<_>>();
        assert_eq!(selected(&bar), [false, true]);
        bar.toggle_engine("google");
        assert_eq!(selected(&bar), [true, true]);

        let chips = bar.chips();
        assert_eq!(chips[0].icon, "globe");
        assert_eq!(chips[1].icon, "github");
        assert_eq!(chips[0].template, "https://google.com/search?q={query}");
    }
}
