//! PawMatch - Search and match engine for an adoptable-dog catalog
//!
//! This library drives a filter/sort/paginate search over an external dog
//! catalog, keeps overlapping page fetches consistent, persists a favorites
//! set across sessions, and turns favorites into an adoption match.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{FavoritesStore, MatchGenerator, SearchOrchestrator, SearchView};
pub use crate::models::{CriteriaPatch, Dog, FilterCriteria, SearchPage, SortKey, PAGE_SIZE};
pub use crate::services::{Catalog, CatalogClient, CatalogError};
