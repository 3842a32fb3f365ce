use std::fmt;
use std::path::{Path, PathBuf};

/// Root of a homepage project, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDir(pub PathBuf);

impl SiteDir {
    pub fn templates_glob(&self) -> PathBuf {
        self.0.join("templates/**/*.html")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.0.join("templates")
    }

    pub fn scss_path(&self) -> PathBuf {
        self.0.join("templates/main.scss")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.0.join("static")
    }
}

impl fmt::Display for SiteDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl std::ops::Deref for SiteDir {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<PathBuf> for SiteDir {
    fn from(path: PathBuf) -> Self {
        SiteDir(path)
    }
}

impl From<&str> for SiteDir {
    fn from(s: &str) -> Self {
        SiteDir(PathBuf::from(s))
    }
}

impl From<String> for SiteDir {
    fn from(s: String) -> Self {
        SiteDir(PathBuf::from(s))
    }
}
