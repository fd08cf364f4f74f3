pub mod config;
pub mod constants;
pub mod error;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod sources;
pub mod storage;
pub mod types;

pub use error::{PipelineError, Result};
pub use types::{Origin, ReviewRecord};
