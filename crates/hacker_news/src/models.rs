use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use common::{PipelineError, PipelineResult};

/// An item record as returned by `/item/<id>.json`. Everything is optional on
/// the wire; [`Story::from_hn_item`] decides what a usable story needs.
#[derive(Debug, Deserialize)]
pub struct HNItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub score: Option<u64>,
    pub descendants: Option<u64>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub by: Option<String>,
    pub time: Option<i64>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub url: Option<String>,
    pub score: u64,
    pub comments: u64,
    pub author: Option<String>,
    /// Unix seconds, as published upstream.
    pub posted_at: Option<i64>,
    pub kind: Option<String>,
    pub text: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
}

impl Story {
    pub fn from_hn_item(item: HNItem, fetched_at: OffsetDateTime) -> PipelineResult<Self> {
        if item.deleted || item.dead {
            return Err(PipelineError::Parse(format!("item {} is deleted or dead", item.id)));
        }
        let missing = |field: &str| PipelineError::Parse(format!("item {} has no {}", item.id, field));

        let title = item
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| missing("title"))?;
        let score = item.score.ok_or_else(|| missing("score"))?;
        let comments = item.descendants.ok_or_else(|| missing("descendants"))?;

        Ok(Self {
            id: item.id,
            title,
            url: item.url.filter(|u| !u.is_empty()),
            score,
            comments,
            author: item.by,
            posted_at: item.time,
            kind: item.kind,
            text: item.text.filter(|t| !t.is_empty()),
            fetched_at,
        })
    }

    /// Plain-text excerpt of a self post, at most `max_chars` characters.
    pub fn text_excerpt(&self, max_chars: usize) -> Option<String> {
        let text = clean_html(self.text.as_deref()?);
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(truncate_chars(text, max_chars))
    }
}

/// Stories of one run, in upstream ranking order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryBatch(Vec<Story>);

impl StoryBatch {
    pub fn new(stories: Vec<Story>) -> Self {
        Self(stories)
    }

    pub fn stories(&self) -> &[Story] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Story> {
        self.0.iter()
    }

    /// Looks a story up by its 1-based position in the batch.
    pub fn by_ordinal(&self, ordinal: usize) -> Option<&Story> {
        ordinal.checked_sub(1).and_then(|index| self.0.get(index))
    }

    pub fn retain<F>(self, keep: F) -> Self
    where
        F: FnMut(&Story) -> bool,
    {
        let mut stories = self.0;
        stories.retain(keep);
        Self(stories)
    }
}

impl From<Vec<Story>> for StoryBatch {
    fn from(stories: Vec<Story>) -> Self {
        Self(stories)
    }
}

impl<'a> IntoIterator for &'a StoryBatch {
    type Item = &'a Story;
    type IntoIter = std::slice::Iter<'a, Story>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub fn clean_html(html: &str) -> String {
    scraper::Html::parse_fragment(html)
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: serde_json::Value) -> HNItem {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_story_from_complete_item() {
        let story = Story::from_hn_item(
            item(serde_json::json!({
                "id": 8863, "type": "story", "by": "dhouston", "time": 1175714200,
                "title": "My YC app: Dropbox", "score": 111, "descendants": 71,
                "url": "http://www.getdropbox.com/u/2/screencast.html"
            })),
            OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap();

        assert_eq!(story.id, 8863);
        assert_eq!(story.comments, 71);
        assert_eq!(story.author.as_deref(), Some("dhouston"));
        assert_eq!(story.url.as_deref(), Some("http://www.getdropbox.com/u/2/screencast.html"));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let no_title = item(serde_json::json!({"id": 1, "score": 3, "descendants": 0}));
        assert!(Story::from_hn_item(no_title, OffsetDateTime::UNIX_EPOCH).is_err());

        let no_descendants = item(serde_json::json!({"id": 2, "title": "x", "score": 3}));
        assert!(Story::from_hn_item(no_descendants, OffsetDateTime::UNIX_EPOCH).is_err());
    }

    #[test]
    fn test_dead_items_are_rejected() {
        let dead = item(serde_json::json!({
            "id": 3, "title": "x", "score": 3, "descendants": 0, "dead": true
        }));
        assert!(Story::from_hn_item(dead, OffsetDateTime::UNIX_EPOCH).is_err());
    }

    #[test]
    fn test_text_excerpt_strips_html_and_truncates() {
        let story = Story::from_hn_item(
            item(serde_json::json!({
                "id": 4, "title": "Ask HN: x", "score": 3, "descendants": 0,
                "text": "<p>Hello <i>there</i>, this is long</p>"
            })),
            OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap();

        assert_eq!(story.text_excerpt(5).as_deref(), Some("Hello..."));
        assert!(story.text_excerpt(100).unwrap().contains("there"));
    }

    #[test]
    fn test_by_ordinal_is_one_based() {
        let batch = StoryBatch::new(vec![
            Story::from_hn_item(
                item(serde_json::json!({"id": 10, "title": "a", "score": 1, "descendants": 0})),
                OffsetDateTime::UNIX_EPOCH,
            )
            .unwrap(),
        ]);
        assert_eq!(batch.by_ordinal(1).map(|s| s.id), Some(10));
        assert!(batch.by_ordinal(0).is_none());
        assert!(batch.by_ordinal(2).is_none());
    }
}
