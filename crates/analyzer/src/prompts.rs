use std::fmt::Write;

use hacker_news::models::truncate_chars;
use hacker_news::StoryBatch;

use crate::models::{CategoryAssignment, Sentiment, SentimentResult};

pub const CATEGORY_LABELS: &[&str] = &[
    "AI/ML",
    "Startups",
    "Programming",
    "Hardware",
    "Security",
    "Web",
    "DevOps",
    "Other",
];

pub fn categorize_system() -> String {
    format!(
        "You are a tech categorizer. Categorize stories into these topics: {}.\n\n\
         Output ONLY this JSON format (no extra text):\n\
         {{\"AI/ML\": [1, 3], \"Startups\": [2], \"Programming\": [4, 5]}}\n\n\
         Use story numbers from the list. Include only categories that have stories.",
        CATEGORY_LABELS.join(", ")
    )
}

pub const SENTIMENT_SYSTEM: &str = "You are a sentiment analyst. Analyze these headlines and respond with ONLY this JSON format (no extra text):

{\"overall_sentiment\": \"positive\", \"confidence\": \"high\", \"key_observations\": [\"obs1\", \"obs2\"], \"trending_themes\": [\"theme1\", \"theme2\"]}

Valid values:
- overall_sentiment: positive, negative, neutral, or mixed
- confidence: high, medium, or low
- key_observations: array of 2-3 short observations
- trending_themes: array of 1-2 themes";

pub const SUMMARY_SYSTEM: &str = "You are a tech journalist writing a daily brief for busy engineers.
Create a concise, engaging summary of today's HackerNews trends.
Be specific, mention story titles, and highlight what's important.
Keep it under 200 words.";

/// `1. title` lines for the first `take` stories, titles cut at `max_title_chars`.
pub fn numbered_titles(batch: &StoryBatch, take: usize, max_title_chars: usize) -> String {
    batch
        .iter()
        .take(take)
        .enumerate()
        .map(|(i, story)| format!("{}. {}", i + 1, truncate_chars(&story.title, max_title_chars)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn categorize_user(batch: &StoryBatch, max_title_chars: usize) -> String {
    format!(
        "Categorize these stories. Output ONLY the JSON object:\n\n{}",
        numbered_titles(batch, batch.len(), max_title_chars)
    )
}

pub fn sentiment_user(batch: &StoryBatch, context_stories: usize, max_title_chars: usize) -> String {
    format!(
        "Analyze these HackerNews headlines. Output ONLY the JSON object with no additional text:\n\n{}",
        numbered_titles(batch, context_stories, max_title_chars)
    )
}

pub struct SummaryContext<'a> {
    pub batch: &'a StoryBatch,
    pub categories: &'a CategoryAssignment,
    pub sentiment: &'a SentimentResult,
    pub context_stories: usize,
    pub max_title_chars: usize,
    pub max_description_chars: usize,
}

pub fn summary_user(ctx: &SummaryContext<'_>) -> String {
    let mut prompt = String::from("Write a brief summary of today's HackerNews trends:\n\nTOP STORIES:\n");

    for story in ctx.batch.iter().take(ctx.context_stories) {
        let _ = writeln!(
            prompt,
            "- {} ({} points, {} comments)",
            truncate_chars(&story.title, ctx.max_title_chars),
            story.score,
            story.comments
        );
        if let Some(excerpt) = story.text_excerpt(ctx.max_description_chars) {
            let _ = writeln!(prompt, "  {}", excerpt);
        }
    }

    prompt.push_str("\nCATEGORIES:\n");
    if ctx.categories.is_empty() {
        prompt.push_str("(not available)\n");
    }
    for (label, ids) in ctx.categories.iter() {
        let _ = writeln!(prompt, "- {}: {} stories", label, ids.len());
    }

    prompt.push_str("\nSENTIMENT:\n");
    if ctx.sentiment.overall == Sentiment::Unknown {
        prompt.push_str("(not available)\n");
    } else {
        let _ = writeln!(
            prompt,
            "{} ({} confidence)",
            ctx.sentiment.overall, ctx.sentiment.confidence
        );
    }
    if !ctx.sentiment.themes.is_empty() {
        let _ = writeln!(prompt, "Themes: {}", ctx.sentiment.themes.join(", "));
    }

    prompt.push_str("\nWrite a concise, engaging summary for engineers.");
    prompt
}
