use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use common::config::TOPIC_STORY_LIMIT;
use common::Config;
use hacker_news::Topic;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Fetch top Hacker News stories, analyze them with a local model and
/// write a trend report.
#[derive(Parser, Debug)]
#[command(name = "hn-trends", version)]
struct Cli {
    /// Number of top stories to fetch (default 20, or 100 with a topic)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Directory for raw and processed output
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Model name served by the completion endpoint
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible completion endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Only keep stories for a preset topic (number or name prefix)
    #[arg(long, conflicts_with = "keywords")]
    topic: Option<String>,

    /// Only keep stories whose title contains one of these keywords
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(limit) = self.limit {
            config.hacker_news.story_limit = limit;
        } else if self.topic.is_some() || !self.keywords.is_empty() {
            config.hacker_news.story_limit = TOPIC_STORY_LIMIT;
        }
        if let Some(dir) = &self.data_dir {
            config.output.data_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(url) = &self.base_url {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
    }

    fn topic(&self) -> Result<Option<Topic>> {
        if let Some(selector) = &self.topic {
            let Some(topic) = Topic::preset(selector) else {
                let names: Vec<String> = Topic::presets()
                    .iter()
                    .enumerate()
                    .map(|(i, t)| format!("{}. {}", i + 1, t.name))
                    .collect();
                anyhow::bail!("Unknown topic '{}'. Available topics:\n{}", selector, names.join("\n"));
            };
            return Ok(Some(topic));
        }
        if !self.keywords.is_empty() {
            let topic = Topic::custom("Custom", self.keywords.iter().cloned());
            if topic.keywords.is_empty() {
                anyhow::bail!("--keywords needs at least one non-empty keyword");
            }
            return Ok(Some(topic));
        }
        Ok(None)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;
    let topic = cli.topic()?;

    info!("Starting Hacker News trend analysis");
    let outcome = hn_trends::run_pipeline(&config, topic.as_ref()).await?;

    println!("{}", outcome.report);
    info!(
        "Wrote {}, {} and {}",
        outcome.artifact.raw_path.display(),
        outcome.artifact.analysis_path.display(),
        outcome.artifact.report_path.display()
    );
    Ok(())
}
