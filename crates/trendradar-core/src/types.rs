use serde::Serialize;

/// A candidate search term: trimmed, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Keyword(String);

impl Keyword {
    /// Trims `raw` and wraps it. Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of one (keyword, source) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceResult {
    Success { text: String, url: Option<String> },
    Unavailable,
}

impl SourceResult {
    /// Raw text of a successful lookup.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            SourceResult::Success { text, .. } => Some(text),
            SourceResult::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, SourceResult::Success { .. })
    }
}

/// The marketplace client's answer for one keyword.
///
/// `search_url` is kept even when the lookup failed so callers can still
/// link out to the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceListing {
    pub result: SourceResult,
    pub search_url: Option<String>,
}

impl MarketplaceListing {
    #[must_use]
    pub fn unavailable(search_url: Option<String>) -> Self {
        Self {
            result: SourceResult::Unavailable,
            search_url,
        }
    }
}

/// A forum post matching a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumPost {
    pub title: String,
    pub url: String,
}

/// Enrichment result for one keyword. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub keyword: Keyword,
    pub marketplace: SourceResult,
    pub mention_count: u32,
    pub score: i64,
    pub suggestion: String,
    pub marketplace_url: Option<String>,
    /// Index of the keyword in the list handed to the pipeline.
    pub position: usize,
}
