use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tone of a mention as judged by the answering model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Map a free-form label onto one of the three sentiments.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything unrecognized is `Neutral`.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case- and whitespace-insensitive key used to compare brand names.
#[must_use]
pub fn brand_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A mention as reported by the LLM collaborator, before sanitization.
///
/// Every field except `query` and `brand` may be missing or malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMention {
    pub query: String,
    pub brand: String,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// A sanitized mention: known brand, 1-based position, normalized sentiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub query: String,
    pub brand: String,
    pub position: u32,
    pub sentiment: Sentiment,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// One execution of a project's query set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRun {
    pub id: Uuid,
    pub project_id: Uuid,
    pub run_at: DateTime<Utc>,
    pub queries_generated: u32,
}

/// A single stored row of a run.
///
/// `brand == None` marks a query that was executed but mentioned nobody; such
/// rows count toward the runs touching a query but never as a mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub run_id: Uuid,
    pub query_text: String,
    pub brand: Option<String>,
    pub position: Option<u32>,
    pub sentiment: Option<Sentiment>,
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub used_web_search: bool,
}

impl QueryResult {
    /// Row recording that `query` ran in `run_id` without any mention.
    #[must_use]
    pub fn marker(run_id: Uuid, query: impl Into<String>) -> Self {
        Self {
            run_id,
            query_text: query.into(),
            brand: None,
            position: None,
            sentiment: None,
            context: None,
            citations: Vec::new(),
            used_web_search: false,
        }
    }

    #[must_use]
    pub fn from_mention(run_id: Uuid, mention: Mention) -> Self {
        Self {
            run_id,
            query_text: mention.query,
            brand: Some(mention.brand),
            position: Some(mention.position),
            sentiment: Some(mention.sentiment),
            context: Some(mention.context),
            citations: Vec::new(),
            used_web_search: false,
        }
    }

    #[must_use]
    pub fn is_marker(&self) -> bool {
        self.brand.is_none()
    }

    /// True when this row mentions `name` (compared with [`brand_key`]).
    #[must_use]
    pub fn mentions(&self, name: &str) -> bool {
        self.brand
            .as_deref()
            .is_some_and(|b| brand_key(b) == brand_key(name))
    }

    /// Convert a brand row back into a [`Mention`]. Marker rows and rows
    /// without a usable position yield `None`.
    #[must_use]
    pub fn to_mention(&self) -> Option<Mention> {
        let brand = self.brand.clone()?;
        let position = self.position.filter(|p| *p >= 1)?;
        Some(Mention {
            query: self.query_text.clone(),
            brand,
            position,
            sentiment: self.sentiment.unwrap_or_default(),
            context: self.context.clone().unwrap_or_default(),
        })
    }
}

/// Aggregate counts captured when a run completes. Exactly one per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub project_id: Uuid,
    pub run_id: Uuid,
    pub snapshot_date: NaiveDate,
    pub total_queries: u32,
    pub queries_with_mentions: u32,
    /// Distinct queries the brand appeared in during this run.
    pub brand_mentions: u32,
    pub brand_share_pct: u32,
    #[serde(default)]
    pub competitor_shares: BTreeMap<String, u32>,
    #[serde(default)]
    pub analyzed_queries: Vec<String>,
}

/// Per-query output of the LLM query / web-search collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome {
    pub query: String,
    #[serde(default)]
    pub response_text: String,
    #[serde(default)]
    pub mentions: Vec<RawMention>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub used_web_search: bool,
}
