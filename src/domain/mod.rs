pub mod error;
pub mod llm_config;
pub mod meta;
pub mod pipeline_config;
pub mod row;

pub use error::{AppError, Result};
pub use llm_config::LlmConfig;
pub use meta::GeneratedMeta;
pub use pipeline_config::PipelineConfig;
pub use row::{Dialect, ProductRow};
