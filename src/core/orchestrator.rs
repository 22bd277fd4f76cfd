use std::sync::{Arc, Mutex};

use crate::models::{CriteriaPatch, FilterCriteria, SearchPage};
use crate::services::catalog::{Catalog, CatalogError};

use super::refine::refine;

/// Snapshot of everything a caller needs to render the search screen.
#[derive(Debug, Clone)]
pub struct SearchView {
    pub criteria: FilterCriteria,
    /// Last successfully fetched page, empty until the first success. Kept
    /// as-is while a newer fetch is in flight and when a fetch fails.
    pub page: SearchPage,
    /// True while the most recently issued fetch has not finished.
    pub loading: bool,
    /// Message from the most recent failed fetch, cleared by the next
    /// successful one.
    pub error: Option<String>,
}

struct SearchState {
    criteria: FilterCriteria,
    /// Last successfully fetched page, `None` until one resolves.
    page: Option<SearchPage>,
    error: Option<String>,
    /// Sequence number handed to the most recently issued fetch.
    issued: u64,
    /// Sequence number of the last fetch whose outcome landed.
    applied: u64,
}

/// Drives the two-phase page fetch and keeps the view consistent when
/// fetches overlap.
///
/// Every mutation takes the next sequence number under the state lock and
/// carries it through its fetch. An outcome only lands if its number still
/// equals the highest issued one, so the view always reflects the
/// last-issued request, not the last response to arrive. Superseded
/// outcomes are discarded without touching the view, whether they
/// succeeded or failed.
pub struct SearchOrchestrator {
    catalog: Arc<dyn Catalog>,
    state: Mutex<SearchState>,
}

impl SearchOrchestrator {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            state: Mutex::new(SearchState {
                criteria: FilterCriteria::default(),
                page: None,
                error: None,
                issued: 0,
                applied: 0,
            }),
        }
    }

    /// Merge `patch` into the criteria and fetch the page they now describe.
    ///
    /// Recoverable fetch failures are recorded on the view and reported as
    /// `Ok(())`; only an expired session surfaces as `Err`. An empty patch
    /// refetches the current page unchanged.
    pub async fn set_criteria(&self, patch: CriteriaPatch) -> Result<(), CatalogError> {
        let (seq, criteria) = {
            let mut state = self.state.lock().unwrap();
            state.criteria.apply(patch);
            state.issued += 1;
            (state.issued, state.criteria.clone())
        };

        self.run_fetch(seq, criteria).await
    }

    /// Move to `page`, clamped to `[1, page_count]` of the last resolved
    /// total. Before the first page resolves there is no known total and
    /// only the lower bound applies.
    pub async fn set_page(&self, page: u32) -> Result<(), CatalogError> {
        let (seq, criteria) = {
            let mut state = self.state.lock().unwrap();
            state.criteria.page = match &state.page {
                Some(last) => page.clamp(1, last.page_count().max(1)),
                None => page.max(1),
            };
            state.issued += 1;
            (state.issued, state.criteria.clone())
        };

        self.run_fetch(seq, criteria).await
    }

    /// Refetch the current page without changing any criteria. Used to retry
    /// after a recoverable failure.
    pub async fn refresh(&self) -> Result<(), CatalogError> {
        self.set_criteria(CriteriaPatch::default()).await
    }

    /// Drop all criteria and fetch the first unfiltered page.
    pub async fn reset(&self) -> Result<(), CatalogError> {
        let (seq, criteria) = {
            let mut state = self.state.lock().unwrap();
            state.criteria = FilterCriteria::default();
            state.issued += 1;
            (state.issued, state.criteria.clone())
        };

        self.run_fetch(seq, criteria).await
    }

    /// Snapshot the current view for rendering.
    pub fn current_view(&self) -> SearchView {
        let state = self.state.lock().unwrap();
        SearchView {
            criteria: state.criteria.clone(),
            page: state.page.clone().unwrap_or_default(),
            loading: state.applied != state.issued,
            error: state.error.clone(),
        }
    }

    async fn run_fetch(&self, seq: u64, criteria: FilterCriteria) -> Result<(), CatalogError> {
        let outcome = self.fetch_page(&criteria).await;

        let mut state = self.state.lock().unwrap();
        if seq != state.issued {
            tracing::debug!("Discarding superseded fetch {} (latest is {})", seq, state.issued);
            return Ok(());
        }
        state.applied = seq;

        match outcome {
            Ok(page) => {
                tracing::debug!("Applied page with {} dogs (total {})", page.dogs.len(), page.total);
                state.page = Some(page);
                state.error = None;
                Ok(())
            }
            Err(CatalogError::AuthExpired) => {
                state.error = Some(CatalogError::AuthExpired.to_string());
                Err(CatalogError::AuthExpired)
            }
            Err(e) => {
                tracing::warn!("Page fetch failed: {}", e);
                state.error = Some(e.to_string());
                Ok(())
            }
        }
    }

    /// Run both phases of a page fetch for `criteria`.
    ///
    /// A page whose ID list comes back empty skips the detail phase
    /// entirely. The returned total is the server-side one, taken before the
    /// local refinement shrinks the rows.
    async fn fetch_page(&self, criteria: &FilterCriteria) -> Result<SearchPage, CatalogError> {
        let response = self.catalog.search_ids(criteria).await?;

        if response.result_ids.is_empty() {
            return Ok(SearchPage {
                dogs: Vec::new(),
                total: response.total,
            });
        }

        let dogs = self.catalog.fetch_details(&response.result_ids).await?;
        let dogs = refine(dogs, criteria);

        Ok(SearchPage {
            dogs,
            total: response.total,
        })
    }
}
