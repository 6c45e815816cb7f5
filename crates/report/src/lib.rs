pub mod render;
pub mod writer;

pub use render::{render_report, TOP_STORIES_LIMIT};
pub use writer::{PersistedArtifact, ReportWriter};
