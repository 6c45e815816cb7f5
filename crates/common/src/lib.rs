pub mod config;
pub mod error;
pub mod storage;
pub mod timestamp;

pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use storage::LocalStorage;
pub use timestamp::RunStamp;
