use std::path::PathBuf;

use tracing::info;

use crate::error::{PipelineError, PipelineResult};

/// Writes run artifacts under a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Writes `content` to `relative_path` (e.g. `raw/stories_20240115_090507.json`)
    /// and returns the full path. The content lands in a sibling temp file first
    /// and is renamed into place, so a failed write never leaves a truncated file
    /// behind.
    pub async fn write_file(&self, relative_path: &str, content: &str) -> PipelineResult<PathBuf> {
        let path = self.base_dir.join(relative_path.trim_start_matches('/'));
        let parent = path
            .parent()
            .ok_or_else(|| PipelineError::StorageWrite(format!("no parent directory for {}", path.display())))?;

        tokio::fs::create_dir_all(parent).await?;

        let tmp_path = path.with_extension("tmp");
        info!("Writing {} ({} bytes)", path.display(), content.len());

        if let Err(e) = tokio::fs::write(&tmp_path, content).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(PipelineError::StorageWrite(format!(
                "failed to write {}: {}",
                path.display(),
                e
            )));
        }
        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| {
            PipelineError::StorageWrite(format!("failed to move {} into place: {}", path.display(), e))
        })?;

        Ok(path)
    }
}
