pub mod status;
pub mod use_cases;

pub use status::StatusSink;
pub use use_cases::{
    BatchOutcome, BatchRowEnricher, MetaGenerationOrchestrator, DEFAULT_SECTOR,
};
