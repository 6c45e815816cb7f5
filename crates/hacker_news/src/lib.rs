pub mod api;
pub mod models;
pub mod topics;

use std::time::Duration;

use api::HackerNewsAPI;
use common::config::HackerNewsConfig;
use common::PipelineResult;
use time::OffsetDateTime;
use tracing::{info, warn};

pub use models::{Story, StoryBatch};
pub use topics::Topic;

/// Builds a [`StoryBatch`] from the top-stories listing, one detail request
/// at a time with a fixed pause before each.
pub struct StoryFetcher {
    api: HackerNewsAPI,
    limit: usize,
    delay: Duration,
}

impl StoryFetcher {
    pub fn new(config: &HackerNewsConfig) -> PipelineResult<Self> {
        Ok(Self {
            api: HackerNewsAPI::new(config)?,
            limit: config.story_limit,
            delay: config.request_delay,
        })
    }

    /// A listing failure is fatal. A failed detail fetch only drops that story.
    pub async fn fetch_batch(&self) -> PipelineResult<StoryBatch> {
        info!("Fetching top {} stories from Hacker News", self.limit);
        let story_ids = self.api.get_top_stories(self.limit).await?;
        info!("Fetched {} top story IDs", story_ids.len());

        let total = story_ids.len();
        let mut stories = Vec::with_capacity(total);

        for (index, story_id) in story_ids.into_iter().enumerate() {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            info!("Fetching story {}/{}: ID {}", index + 1, total, story_id);

            match self.fetch_story(story_id).await {
                Ok(story) => stories.push(story),
                Err(e) => warn!("Skipping story {}: {}", story_id, e),
            }
        }

        info!("Successfully fetched {} of {} stories", stories.len(), total);
        Ok(StoryBatch::new(stories))
    }

    async fn fetch_story(&self, story_id: u64) -> PipelineResult<Story> {
        let item = self.api.get_story(story_id).await?;
        Story::from_hn_item(item, OffsetDateTime::now_utc())
    }
}
