use std::sync::Arc;

use crate::models::Dog;
use crate::services::catalog::{Catalog, CatalogError};

use super::favorites::FavoritesStore;

/// Runs the favorites-to-match workflow.
///
/// The catalog picks one ID out of the submitted favorites; the generator
/// then resolves that ID into a full record so the result can be shown
/// without another lookup.
pub struct MatchGenerator {
    catalog: Arc<dyn Catalog>,
}

impl MatchGenerator {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Produce a match from the current favorites.
    ///
    /// Fails with `NoFavorites` before any network call when the set is
    /// empty. Candidates are submitted in sorted order so identical sets
    /// produce identical requests.
    pub async fn generate_match(&self, favorites: &FavoritesStore) -> Result<Dog, CatalogError> {
        if favorites.is_empty() {
            return Err(CatalogError::NoFavorites);
        }

        let candidates = favorites.sorted_ids();

        tracing::debug!("Requesting a match from {} favorites", candidates.len());

        let selected = self.catalog.request_match(&candidates).await?;

        let dogs = self
            .catalog
            .fetch_details(std::slice::from_ref(&selected.match_id))
            .await?;

        dogs.into_iter()
            .find(|dog| dog.id == selected.match_id)
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "Matched dog {} has no detail record",
                    selected.match_id
                ))
            })
    }
}
