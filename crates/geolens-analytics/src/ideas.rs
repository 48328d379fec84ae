//! Sources of candidate queries that have never been analyzed.

use std::collections::HashSet;

use crate::error::IdeaSourceError;

/// Keyword templates used when no idea source can help.
const TEMPLATES: [&str; 5] = [
    "best {kw}",
    "top {kw} tools",
    "{kw} alternatives",
    "{kw} recommendations",
    "how to choose {kw}",
];

/// What the suggestion engine asks an idea source for.
#[derive(Debug, Clone, Copy)]
pub struct IdeaRequest<'a> {
    pub brand: &'a str,
    pub competitors: &'a [String],
    pub keywords: &'a [String],
    /// Queries the caller already has; sources should avoid repeating them.
    pub exclude: &'a [String],
    pub count: usize,
}

/// External generator of query ideas, typically an LLM.
///
/// Implementations may return fewer or more ideas than requested and may
/// ignore `exclude`; the engine filters and caps the result itself.
pub trait QueryIdeaSource {
    /// # Errors
    ///
    /// Returns [`IdeaSourceError`] when the generator is unavailable or fails.
    fn ideas(&self, request: &IdeaRequest<'_>) -> Result<Vec<String>, IdeaSourceError>;
}

/// Idea source for deployments without a generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdeaSource;

impl QueryIdeaSource for NoIdeaSource {
    fn ideas(&self, _request: &IdeaRequest<'_>) -> Result<Vec<String>, IdeaSourceError> {
        Err(IdeaSourceError::Unavailable)
    }
}

/// Ideas produced ahead of time, handed out in order.
#[derive(Debug, Clone, Default)]
pub struct StaticIdeaSource {
    ideas: Vec<String>,
}

impl StaticIdeaSource {
    #[must_use]
    pub fn new(ideas: Vec<String>) -> Self {
        Self { ideas }
    }
}

impl QueryIdeaSource for StaticIdeaSource {
    fn ideas(&self, request: &IdeaRequest<'_>) -> Result<Vec<String>, IdeaSourceError> {
        Ok(self.ideas.iter().take(request.count).cloned().collect())
    }
}

/// Fill the keyword templates, template `i` taking keyword `i mod k`.
///
/// Keywords default to the brand name. Blank keywords are ignored. Templates
/// that match a tracked query (case-insensitive) or repeat an earlier one
/// are skipped, and at most `limit` are returned.
#[must_use]
pub fn template_queries(
    keywords: &[String],
    brand: &str,
    tracked: &[String],
    limit: usize,
) -> Vec<String> {
    let mut keywords: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        keywords.push(brand.trim());
    }

    let mut seen: HashSet<String> = tracked.iter().map(|q| q.trim().to_lowercase()).collect();
    TEMPLATES
        .iter()
        .enumerate()
        .map(|(i, template)| template.replace("{kw}", keywords[i % keywords.len()]))
        .filter(|query| seen.insert(query.to_lowercase()))
        .take(limit)
        .collect()
}
