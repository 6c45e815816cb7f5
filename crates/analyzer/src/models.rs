use std::collections::BTreeMap;
use std::fmt;

use hacker_news::{Story, StoryBatch};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
    #[default]
    Unknown,
}

impl From<Option<String>> for Sentiment {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim).map(str::to_lowercase).as_deref() {
            Some("positive") => Sentiment::Positive,
            Some("negative") => Sentiment::Negative,
            Some("neutral") => Sentiment::Neutral,
            Some("mixed") => Sentiment::Mixed,
            _ => Sentiment::Unknown,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Mixed => "mixed",
            Sentiment::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Confidence {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl From<Option<String>> for Confidence {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim).map(str::to_lowercase).as_deref() {
            Some("low") => Confidence::Low,
            Some("medium") => Confidence::Medium,
            Some("high") => Confidence::High,
            _ => Confidence::Unknown,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Mood of the batch as judged by the model. The default value doubles as
/// the fallback when the model's answer cannot be decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    #[serde(rename = "overall_sentiment", alias = "overall", default)]
    pub overall: Sentiment,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(rename = "key_observations", alias = "observations", default)]
    pub observations: Vec<String>,
    #[serde(rename = "trending_themes", alias = "themes", default)]
    pub themes: Vec<String>,
}

/// Category label to story ids, ids in batch order. Labels are whatever the
/// model produced; no closed set is enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryAssignment(BTreeMap<String, Vec<u64>>);

impl CategoryAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a story to a category. Adding the same id twice is a no-op.
    pub fn assign(&mut self, label: impl Into<String>, story_id: u64) {
        let ids = self.0.entry(label.into()).or_default();
        if !ids.contains(&story_id) {
            ids.push(story_id);
        }
    }

    pub fn get(&self, label: &str) -> Option<&[u64]> {
        self.0.get(label).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.0.iter().map(|(label, ids)| (label.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_story(&self, story_id: u64) -> bool {
        self.0.values().any(|ids| ids.contains(&story_id))
    }

    /// Stories of `batch` that no category claims, in batch order.
    pub fn uncategorized<'a>(&self, batch: &'a StoryBatch) -> Vec<&'a Story> {
        batch
            .iter()
            .filter(|story| !self.contains_story(story.id))
            .collect()
    }
}

impl<const N: usize> From<[(&str, Vec<u64>); N]> for CategoryAssignment {
    fn from(entries: [(&str, Vec<u64>); N]) -> Self {
        let mut assignment = CategoryAssignment::new();
        for (label, ids) in entries {
            for id in ids {
                assignment.assign(label, id);
            }
        }
        assignment
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub story_count: usize,
    pub categories: CategoryAssignment,
    pub sentiment: SentimentResult,
    pub summary: String,
}
