use std::path::PathBuf;

use analyzer::AnalysisResult;
use common::{LocalStorage, PipelineResult, RunStamp};
use hacker_news::StoryBatch;
use serde::Serialize;
use tracing::info;

use crate::render::TOP_STORIES_LIMIT;

pub const RAW_DIR: &str = "raw";
pub const PROCESSED_DIR: &str = "processed";

/// Where one run's files ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedArtifact {
    pub raw_path: PathBuf,
    pub analysis_path: PathBuf,
    pub report_path: PathBuf,
}

#[derive(Serialize)]
struct TopStory<'a> {
    title: &'a str,
    score: u64,
    comments: u64,
    url: Option<&'a str>,
}

#[derive(Serialize)]
struct ProcessedSnapshot<'a> {
    #[serde(flatten)]
    analysis: &'a AnalysisResult,
    top_stories: Vec<TopStory<'a>>,
}

pub struct ReportWriter {
    storage: LocalStorage,
}

impl ReportWriter {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn raw_file_name(stamp: &RunStamp) -> PipelineResult<String> {
        Ok(format!("{}/stories_{}.json", RAW_DIR, stamp.file_stamp()?))
    }

    pub fn analysis_file_name(stamp: &RunStamp) -> PipelineResult<String> {
        Ok(format!("{}/analysis_{}.json", PROCESSED_DIR, stamp.file_stamp()?))
    }

    pub fn report_file_name(stamp: &RunStamp) -> PipelineResult<String> {
        Ok(format!("{}/report_{}.txt", PROCESSED_DIR, stamp.file_stamp()?))
    }

    pub async fn write_raw(&self, stamp: &RunStamp, batch: &StoryBatch) -> PipelineResult<PathBuf> {
        let content = serde_json::to_string_pretty(batch)?;
        let path = self.storage.write_file(&Self::raw_file_name(stamp)?, &content).await?;
        info!("Saved raw data to: {}", path.display());
        Ok(path)
    }

    /// Writes the analysis snapshot and the rendered report. Returns
    /// `(analysis_path, report_path)`.
    pub async fn write_processed(
        &self,
        stamp: &RunStamp,
        batch: &StoryBatch,
        analysis: &AnalysisResult,
        report: &str,
    ) -> PipelineResult<(PathBuf, PathBuf)> {
        let snapshot = ProcessedSnapshot {
            analysis,
            top_stories: batch
                .iter()
                .take(TOP_STORIES_LIMIT)
                .map(|s| TopStory {
                    title: &s.title,
                    score: s.score,
                    comments: s.comments,
                    url: s.url.as_deref(),
                })
                .collect(),
        };
        let content = serde_json::to_string_pretty(&snapshot)?;
        let analysis_path = self
            .storage
            .write_file(&Self::analysis_file_name(stamp)?, &content)
            .await?;
        info!("Saved analysis to: {}", analysis_path.display());

        let report_path = self
            .storage
            .write_file(&Self::report_file_name(stamp)?, report)
            .await?;
        info!("Report saved to: {}", report_path.display());

        Ok((analysis_path, report_path))
    }

    pub async fn persist(
        &self,
        stamp: &RunStamp,
        batch: &StoryBatch,
        analysis: &AnalysisResult,
        report: &str,
    ) -> PipelineResult<PersistedArtifact> {
        let raw_path = self.write_raw(stamp, batch).await?;
        let (analysis_path, report_path) = self.write_processed(stamp, batch, analysis, report).await?;
        Ok(PersistedArtifact {
            raw_path,
            analysis_path,
            report_path,
        })
    }
}
