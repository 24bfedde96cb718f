//! Search request and listing URL construction

use std::fmt;
use std::str::FromStr;

/// How the user wants the catalog searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// Browse a genre listing (`/search/title/?genres=`)
    ByCategory,
    /// Free text lookup (`/find/?q=`)
    ByKeyword,
}

impl SearchMode {
    /// Word shown to the user when asking for the search term
    pub const fn label(self) -> &'static str {
        match self {
            Self::ByCategory => "genres",
            Self::ByKeyword => "keyword",
        }
    }

    /// Maps the interactive menu choice ("1" or "2") to a mode
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::ByCategory),
            "2" => Some(Self::ByKeyword),
            _ => None,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genres" | "genre" | "category" => Ok(Self::ByCategory),
            "keyword" | "keywords" => Ok(Self::ByKeyword),
            other => Err(format!("unknown search mode '{other}'")),
        }
    }
}

/// A single search, fixed for the lifetime of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    term: String,
    mode: SearchMode,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            term: term.into(),
            mode,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub const fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Builds the absolute listing URL for this request.
    ///
    /// The term is inserted as-is; encoding is left to the HTTP layer.
    pub fn listing_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self.mode {
            SearchMode::ByCategory => format!("{base}/search/title/?genres={}", self.term),
            SearchMode::ByKeyword => format!("{base}/find/?q={}", self.term),
        }
    }
}
