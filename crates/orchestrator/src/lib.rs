use analyzer::{AnalysisResult, StoryAnalyzer};
use common::{Config, LocalStorage, PipelineResult, RunStamp};
use hacker_news::{StoryBatch, StoryFetcher, Topic};
use report::{render_report, PersistedArtifact, ReportWriter};
use tracing::info;

/// Everything one run produced.
pub struct RunOutcome {
    pub batch: StoryBatch,
    pub analysis: AnalysisResult,
    pub report: String,
    pub artifact: PersistedArtifact,
}

/// Fetch, analyze, persist. Only a listing failure or a failed write stops
/// the run; everything else degrades in place.
pub async fn run_pipeline(config: &Config, topic: Option<&Topic>) -> PipelineResult<RunOutcome> {
    let stamp = RunStamp::now();
    let writer = ReportWriter::new(LocalStorage::new(&config.output.data_dir));
    info!("Data directory: {}", config.output.data_dir.display());

    info!("STEP 1: fetching Hacker News stories");
    let fetcher = StoryFetcher::new(&config.hacker_news)?;
    let mut batch = fetcher.fetch_batch().await?;

    if let Some(topic) = topic {
        let before = batch.len();
        batch = topic.filter(batch);
        info!(
            "Topic '{}' kept {} of {} stories (keywords: {})",
            topic.name,
            batch.len(),
            before,
            topic.keywords.join(", ")
        );
    }

    let raw_path = writer.write_raw(&stamp, &batch).await?;

    info!("STEP 2: analyzing {} stories", batch.len());
    let analyzer = StoryAnalyzer::from_config(&config.llm)?;
    let analysis = analyzer.analyze(&batch, stamp).await;

    info!("STEP 3: generating report");
    let report = render_report(&batch, &analysis);
    let (analysis_path, report_path) = writer
        .write_processed(&stamp, &batch, &analysis, &report)
        .await?;

    info!("Analysis complete");
    Ok(RunOutcome {
        batch,
        analysis,
        report,
        artifact: PersistedArtifact {
            raw_path,
            analysis_path,
            report_path,
        },
    })
}
