//! Small numeric helpers shared by the aggregators.

use geolens_core::Sentiment;
use serde::Serialize;

/// Positive / neutral / negative tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }
}

impl FromIterator<Sentiment> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        let mut counts = Self::default();
        for sentiment in iter {
            counts.record(sentiment);
        }
        counts
    }
}

/// Mean maintained one observation at a time.
///
/// Each `push` applies `mean = (mean * (n - 1) + x) / n` with `n` the new count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OnlineMean {
    count: u32,
    mean: f64,
}

impl OnlineMean {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let n = f64::from(self.count);
        self.mean = (self.mean * (n - 1.0) + value) / n;
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Current mean, `0.0` before the first observation.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

/// `part / whole` as a fraction, `0.0` when `whole` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// `part / whole * 100` rounded to the nearest integer, `0` when `whole` is zero.
#[must_use]
pub fn percent(part: usize, whole: usize) -> u32 {
    round_non_negative(ratio(part, whole) * 100.0)
}

/// Round a non-negative value to the nearest integer, halves rounding up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_non_negative(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round() as u32
    }
}

#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average, best and worst of a list of 1-based positions.
///
/// All three are `0` for an empty list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionSummary {
    /// Rounded to one decimal.
    pub avg: f64,
    pub best: u32,
    pub worst: u32,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_positions(positions: &[u32]) -> PositionSummary {
    if positions.is_empty() {
        return PositionSummary::default();
    }
    let sum: f64 = positions.iter().copied().map(f64::from).sum();
    let avg = sum / positions.len() as f64;
    PositionSummary {
        avg: round_to_tenth(avg),
        best: positions.iter().copied().min().unwrap_or(0),
        worst: positions.iter().copied().max().unwrap_or(0),
    }
}
