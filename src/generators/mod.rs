pub mod fallback;
pub mod heuristic;
pub mod model;
pub mod rewrite;
pub mod traits;

pub use fallback::FallbackGenerator;
pub use heuristic::HeuristicGenerator;
pub use model::ModelBackedGenerator;
pub use rewrite::RewriteIntent;
pub use traits::CopyGenerator;
