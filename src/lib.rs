pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod naming;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod translate;
pub mod workspace;

pub use config::Config;
pub use error::{Result, TunefetchError};
pub use pipeline::{print_summary, Pipeline, PipelineConfig, PipelineResult, PipelineStats};
pub use report::{ProblemKind, ProblemRecord, ProblemReport};
