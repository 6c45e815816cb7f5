use std::collections::BTreeMap;

use common::{PipelineError, PipelineResult};
use hacker_news::StoryBatch;
use tracing::debug;

use crate::models::{CategoryAssignment, SentimentResult};

/// Narrows a model reply down to the JSON object inside it: trims, drops a
/// surrounding Markdown code fence and, failing that, takes the span from the
/// first `{` to the last `}`.
pub fn extract_json(response: &str) -> &str {
    let mut cleaned = response.trim();

    if let Some(rest) = cleaned.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        cleaned = match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        }
        .trim();
    }

    if !cleaned.starts_with('{') {
        if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
            if end > start {
                cleaned = &cleaned[start..=end];
            }
        }
    }

    cleaned
}

/// Ordinals may come back as numbers or numeric strings.
fn ordinal_of(value: &serde_json::Value) -> Option<usize> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decodes a categorize reply (`{"label": [ordinal, ...]}`) and maps each
/// 1-based ordinal back to the id of the story at that position in `batch`.
/// Ordinals outside `1..=batch.len()` are dropped; so are labels left empty.
pub fn parse_categories(response: &str, batch: &StoryBatch) -> PipelineResult<CategoryAssignment> {
    let raw: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(extract_json(response))
        .map_err(|e| PipelineError::Parse(format!("categorization: {}", e)))?;

    let mut categories = CategoryAssignment::new();
    for (label, ordinals) in raw {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        for value in &ordinals {
            match ordinal_of(value).and_then(|o| batch.by_ordinal(o)) {
                Some(story) => categories.assign(label, story.id),
                None => debug!("Dropping out-of-range ordinal in category '{}'", label),
            }
        }
    }
    Ok(categories)
}

pub fn parse_sentiment(response: &str) -> PipelineResult<SentimentResult> {
    serde_json::from_str(extract_json(response))
        .map_err(|e| PipelineError::Parse(format!("sentiment: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Sentiment};
    use hacker_news::Story;
    use time::OffsetDateTime;

    fn batch(ids: &[u64]) -> StoryBatch {
        StoryBatch::new(
            ids.iter()
                .map(|&id| Story {
                    id,
                    title: format!("Story {}", id),
                    url: None,
                    score: 1,
                    comments: 0,
                    author: None,
                    posted_at: None,
                    kind: None,
                    text: None,
                    fetched_at: OffsetDateTime::UNIX_EPOCH,
                })
                .collect(),
        )
    }

    #[test]
    fn test_extract_json_strips_code_fences() {
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_takes_braced_span_from_chatter() {
        assert_eq!(
            extract_json("Sure! Here it is: {\"a\": {\"b\": 2}} Hope that helps."),
            "{\"a\": {\"b\": 2}}"
        );
        assert_eq!(extract_json("no json here"), "no json here");
    }

    #[test]
    fn test_ordinals_map_to_story_ids() {
        let categories =
            parse_categories(r#"{"AI/ML": [1, 3], "Startups": [2]}"#, &batch(&[101, 202, 303])).unwrap();
        assert_eq!(categories.get("AI/ML"), Some(&[101, 303][..]));
        assert_eq!(categories.get("Startups"), Some(&[202][..]));
    }

    #[test]
    fn test_out_of_range_ordinals_are_dropped() {
        let categories =
            parse_categories(r#"{"Programming": [0, 1, 4, -2], "Other": [9]}"#, &batch(&[11, 22, 33])).unwrap();
        assert_eq!(categories.get("Programming"), Some(&[11][..]));
        assert!(categories.get("Other").is_none());
        assert_eq!(categories.len(), 1);
    }

    #[test]
    fn test_numeric_strings_are_accepted_and_junk_ignored() {
        let categories =
            parse_categories(r#"{"Security": ["2", "two", null, 1.5]}"#, &batch(&[5, 6])).unwrap();
        assert_eq!(categories.get("Security"), Some(&[6][..]));
    }

    #[test]
    fn test_labels_outside_the_suggested_set_are_kept() {
        let categories = parse_categories(r#"{"Space": [1]}"#, &batch(&[42])).unwrap();
        assert_eq!(categories.get("Space"), Some(&[42][..]));
    }

    #[test]
    fn test_malformed_categories_fail() {
        assert!(parse_categories("I could not decide.", &batch(&[1])).is_err());
        assert!(parse_categories(r#"{"AI/ML": 1}"#, &batch(&[1])).is_err());
        assert!(parse_categories("[1, 2]", &batch(&[1, 2])).is_err());
    }

    #[test]
    fn test_sentiment_decodes_from_fenced_reply() {
        let sentiment = parse_sentiment(
            "```json\n{\"overall_sentiment\": \"neutral\", \"confidence\": \"medium\", \"key_observations\": [\"x\"], \"trending_themes\": [\"y\"]}\n```",
        )
        .unwrap();
        assert_eq!(sentiment.overall, Sentiment::Neutral);
        assert_eq!(sentiment.confidence, Confidence::Medium);
        assert_eq!(sentiment.themes, vec!["y".to_string()]);
    }

    #[test]
    fn test_malformed_sentiment_fails() {
        assert!(parse_sentiment("The mood is upbeat.").is_err());
        assert!(parse_sentiment(r#"{"key_observations": "only one"}"#).is_err());
    }
}
