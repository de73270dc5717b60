pub mod completion;
pub mod config;
pub mod error;
pub mod generators;
pub mod geodata;
pub mod models;
pub mod prompts;
pub mod recovery;
pub mod sanitize;
pub mod styles;

pub use error::{CopyError, Result};
pub use generators::{CopyGenerator, FallbackGenerator, HeuristicGenerator, ModelBackedGenerator};
pub use models::{GenerationResult, ListingFacts, Section};
