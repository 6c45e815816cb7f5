use std::fmt::Write;

use analyzer::AnalysisResult;
use common::RunStamp;
use hacker_news::StoryBatch;

pub const TOP_STORIES_LIMIT: usize = 10;

const RULE_WIDTH: usize = 60;

fn section(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{}\n{}\n{}", rule, title, rule);
}

fn bullets(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

/// Renders the terminal/text report. Depends only on its two arguments, so
/// the same inputs always give the same bytes.
pub fn render_report(batch: &StoryBatch, analysis: &AnalysisResult) -> String {
    let mut out = String::new();

    section(&mut out, "HACKERNEWS TREND ANALYSIS REPORT");
    let _ = writeln!(out, "Generated: {}", RunStamp::from_datetime(analysis.timestamp));
    let _ = writeln!(out, "Stories Analyzed: {}\n", analysis.story_count);

    section(&mut out, "CATEGORIES");
    if analysis.categories.is_empty() {
        out.push_str("No categories available.\n");
    }
    for (label, ids) in analysis.categories.iter() {
        let _ = writeln!(out, "{}: {} stories", label, ids.len());
    }
    let uncategorized = analysis.categories.uncategorized(batch);
    if !uncategorized.is_empty() {
        let _ = writeln!(out, "\nUncategorized ({}):", uncategorized.len());
        for story in uncategorized {
            let _ = writeln!(out, "  - {}", story.title);
        }
    }
    out.push('\n');

    section(&mut out, "SENTIMENT ANALYSIS");
    let _ = writeln!(out, "Overall Sentiment: {}", analysis.sentiment.overall);
    let _ = writeln!(out, "Confidence: {}\n", analysis.sentiment.confidence);
    out.push_str("Key Observations:\n");
    bullets(&mut out, &analysis.sentiment.observations);
    out.push_str("\nTrending Themes:\n");
    bullets(&mut out, &analysis.sentiment.themes);
    out.push('\n');

    section(&mut out, "AI-GENERATED SUMMARY");
    let _ = writeln!(out, "{}\n", analysis.summary);

    section(&mut out, "TOP STORIES");
    if batch.is_empty() {
        out.push_str("No stories fetched.\n");
    }
    for (i, story) in batch.iter().take(TOP_STORIES_LIMIT).enumerate() {
        let _ = writeln!(
            out,
            "\n{}. {}\n   Score: {} | Comments: {}\n   URL: {}",
            i + 1,
            story.title,
            story.score,
            story.comments,
            story.url.as_deref().unwrap_or("(none)")
        );
    }

    let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
    out
}
