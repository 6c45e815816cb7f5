pub mod client;
pub mod models;
pub mod parse;
pub mod prompts;

use common::config::LlmConfig;
use common::{PipelineResult, RunStamp};
use hacker_news::StoryBatch;
use tracing::{info, warn};

pub use client::{ChatCompletionClient, CompletionClient, CompletionRequest};
pub use models::{AnalysisResult, CategoryAssignment, Confidence, Sentiment, SentimentResult};

pub const SUMMARY_FAILED: &str = "Summary generation failed.";
pub const NO_STORIES_SUMMARY: &str = "No stories were available to summarize.";

/// Runs the categorize, sentiment and summarize requests for a batch. None of
/// them can fail the run: a transport error or an undecodable reply turns into
/// that request's fallback value.
pub struct StoryAnalyzer<C: CompletionClient> {
    client: C,
    max_title_chars: usize,
    max_description_chars: usize,
    context_stories: usize,
}

impl StoryAnalyzer<ChatCompletionClient> {
    pub fn from_config(config: &LlmConfig) -> PipelineResult<Self> {
        let client = ChatCompletionClient::new(config)?;
        info!("LLM analyzer initialized: {} at {}", client.model(), config.base_url);
        Ok(Self::new(client, config))
    }
}

impl<C: CompletionClient> StoryAnalyzer<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self {
            client,
            max_title_chars: config.max_title_chars,
            max_description_chars: config.max_description_chars,
            context_stories: config.context_stories,
        }
    }

    pub async fn analyze(&self, batch: &StoryBatch, stamp: RunStamp) -> AnalysisResult {
        if batch.is_empty() {
            warn!("No stories to analyze; using empty results");
            return AnalysisResult {
                timestamp: stamp.datetime(),
                story_count: 0,
                categories: CategoryAssignment::default(),
                sentiment: SentimentResult::default(),
                summary: NO_STORIES_SUMMARY.to_string(),
            };
        }

        let categories = self.categorize(batch).await;
        let sentiment = self.analyze_sentiment(batch).await;
        let summary = self.summarize(batch, &categories, &sentiment).await;

        AnalysisResult {
            timestamp: stamp.datetime(),
            story_count: batch.len(),
            categories,
            sentiment,
            summary,
        }
    }

    pub async fn categorize(&self, batch: &StoryBatch) -> CategoryAssignment {
        info!("Categorizing {} stories", batch.len());
        let request = CompletionRequest {
            system: prompts::categorize_system(),
            user: prompts::categorize_user(batch, self.max_title_chars),
            json_mode: true,
        };

        match self
            .client
            .complete(&request)
            .await
            .and_then(|text| parse::parse_categories(&text, batch))
        {
            Ok(categories) => categories,
            Err(e) => {
                warn!("Categorization fell back to no categories: {}", e);
                CategoryAssignment::default()
            }
        }
    }

    pub async fn analyze_sentiment(&self, batch: &StoryBatch) -> SentimentResult {
        info!("Analyzing sentiment");
        let request = CompletionRequest {
            system: prompts::SENTIMENT_SYSTEM.to_string(),
            user: prompts::sentiment_user(batch, self.context_stories, self.max_title_chars),
            json_mode: true,
        };

        match self
            .client
            .complete(&request)
            .await
            .and_then(|text| parse::parse_sentiment(&text))
        {
            Ok(sentiment) => sentiment,
            Err(e) => {
                warn!("Sentiment analysis fell back to unknown: {}", e);
                SentimentResult::default()
            }
        }
    }

    pub async fn summarize(
        &self,
        batch: &StoryBatch,
        categories: &CategoryAssignment,
        sentiment: &SentimentResult,
    ) -> String {
        info!("Generating summary");
        let request = CompletionRequest {
            system: prompts::SUMMARY_SYSTEM.to_string(),
            user: prompts::summary_user(&prompts::SummaryContext {
                batch,
                categories,
                sentiment,
                context_stories: self.context_stories,
                max_title_chars: self.max_title_chars,
                max_description_chars: self.max_description_chars,
            }),
            json_mode: false,
        };

        match self.client.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Summary came back empty");
                SUMMARY_FAILED.to_string()
            }
            Err(e) => {
                warn!("Summary generation failed: {}", e);
                SUMMARY_FAILED.to_string()
            }
        }
    }
}
