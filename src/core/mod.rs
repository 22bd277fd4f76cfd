pub mod favorites;
pub mod matcher;
pub mod orchestrator;
pub mod refine;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use matcher::MatchGenerator;
pub use orchestrator::{SearchOrchestrator, SearchView};
