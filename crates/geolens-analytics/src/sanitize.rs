//! Filtering of LLM-reported mentions against the project's known brands.

use std::collections::HashMap;

use geolens_core::{brand_key, Mention, RawMention, Sentiment};

/// Case-insensitive set of the brand plus its competitors.
///
/// Lookups resolve to the configured spelling so downstream comparisons see
/// one canonical name per brand.
#[derive(Debug, Clone, Default)]
pub struct BrandAllowList {
    canonical: HashMap<String, String>,
}

impl BrandAllowList {
    pub fn new<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut canonical = HashMap::new();
        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }
            canonical
                .entry(brand_key(trimmed))
                .or_insert_with(|| trimmed.to_string());
        }
        Self { canonical }
    }

    /// Allow-list for `brand` and `competitors`.
    #[must_use]
    pub fn for_brand(brand: &str, competitors: &[String]) -> Self {
        Self::new(std::iter::once(brand).chain(competitors.iter().map(String::as_str)))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.canonical.contains_key(&brand_key(name))
    }

    /// Configured spelling of `name`, if it is allowed.
    #[must_use]
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.canonical.get(&brand_key(name)).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

/// Drop mentions of unknown brands and normalize the rest.
///
/// Kept mentions carry the allow-list spelling of the brand, a sentiment of
/// exactly positive, neutral or negative, and a 1-based position. Mentions
/// without a usable position are dropped as well. Input order is preserved.
#[must_use]
pub fn sanitize_mentions(raw: Vec<RawMention>, allow: &BrandAllowList) -> Vec<Mention> {
    let total = raw.len();
    let mentions: Vec<Mention> = raw
        .into_iter()
        .filter_map(|m| sanitize_one(m, allow))
        .collect();

    if mentions.len() < total {
        tracing::debug!(
            kept = mentions.len(),
            dropped = total - mentions.len(),
            "dropped mentions outside the brand allow-list"
        );
    }
    mentions
}

fn sanitize_one(raw: RawMention, allow: &BrandAllowList) -> Option<Mention> {
    let Some(brand) = allow.canonical(&raw.brand) else {
        tracing::debug!(brand = %raw.brand, query = %raw.query, "unknown brand");
        return None;
    };
    let position = raw
        .position
        .and_then(|p| u32::try_from(p).ok())
        .filter(|p| *p >= 1)?;

    Some(Mention {
        brand: brand.to_string(),
        position,
        sentiment: raw
            .sentiment
            .as_deref()
            .map_or(Sentiment::Neutral, Sentiment::normalize),
        context: raw.context.unwrap_or_default(),
        query: raw.query,
    })
}
