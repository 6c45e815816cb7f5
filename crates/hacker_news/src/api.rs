use crate::models::HNItem;
use common::config::HackerNewsConfig;
use common::{PipelineError, PipelineResult};
use reqwest::Client;

#[derive(Clone)]
pub struct HackerNewsAPI {
    client: Client,
    base_url: String,
}

impl HackerNewsAPI {
    pub fn new(config: &HackerNewsConfig) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_top_stories(&self, limit: usize) -> PipelineResult<Vec<u64>> {
        let url = format!("{}/topstories.json", self.base_url);
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        let ids: Vec<u64> = resp.json().await?;
        Ok(ids.into_iter().take(limit).collect())
    }

    /// Fetches one item. Upstream answers `null` for ids that do not exist.
    pub async fn get_story(&self, story_id: u64) -> PipelineResult<HNItem> {
        let url = format!("{}/item/{}.json", self.base_url, story_id);
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        let item: Option<HNItem> = resp.json().await?;
        item.ok_or_else(|| PipelineError::Api(format!("item {} not found", story_id)))
    }
}
