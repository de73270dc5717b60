pub mod provider;
pub mod summary;

pub use provider::{CachedGeodataProvider, GeodataProvider};
pub use summary::{bullet_lines, join_list, summarize, PlaceCategory};
