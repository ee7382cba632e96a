pub mod batch_enricher;
pub mod cta;
pub mod finalizer;
pub mod injector;
pub mod keyphrase;
pub mod meta_generator;
pub mod padding;
pub mod sanitizer;
pub mod trimmer;

pub use batch_enricher::{BatchOutcome, BatchRowEnricher};
pub use cta::CtaEnforcer;
pub use finalizer::DescriptionFinalizer;
pub use injector::KeyphraseInjector;
pub use keyphrase::KeyphraseDeriver;
pub use meta_generator::{MetaGenerationOrchestrator, DEFAULT_SECTOR};
pub use padding::PaddingEngine;
pub use sanitizer::TextSanitizer;
