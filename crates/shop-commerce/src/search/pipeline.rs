//! Catalog pipeline: paged retrieval, merge, and client-side filter/sort.
//!
//! All methods take `&self`; the state lock is released across the fetch so
//! a parameter change can be issued while an earlier fetch is in flight. The
//! earlier response is then dropped by the generation check.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::catalog::{
    CatalogSource, FetchOutcome, FetchTicket, PagedState, PipelineStatus, ProductSummary,
};
use crate::error::CatalogError;
use crate::search::{CatalogParams, CatalogView};

const EVENT_CAPACITY: usize = 64;

/// Change notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    StatusChanged(PipelineStatus),
    PageMerged { added: usize, total: usize },
    FetchFailed(CatalogError),
}

#[derive(Debug)]
struct PipelineState {
    params: CatalogParams,
    pages: PagedState<ProductSummary>,
}

/// Product list state for the shop page.
pub struct CatalogPipeline {
    source: Arc<dyn CatalogSource>,
    state: Mutex<PipelineState>,
    events: broadcast::Sender<CatalogEvent>,
}

impl CatalogPipeline {
    pub fn new(source: Arc<dyn CatalogSource>, page_size: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source,
            state: Mutex::new(PipelineState {
                params: CatalogParams::default(),
                pages: PagedState::new(page_size),
            }),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    pub fn params(&self) -> CatalogParams {
        self.lock().params.clone()
    }

    pub fn status(&self) -> PipelineStatus {
        self.lock().pages.status()
    }

    /// Current generation; bumps on every first-page fetch.
    pub fn generation(&self) -> u64 {
        self.lock().pages.generation()
    }

    /// Replace the parameters, discard fetched pages and fetch the first page.
    pub async fn set_params(&self, params: CatalogParams) -> Result<FetchOutcome, CatalogError> {
        let ticket = {
            let mut state = self.lock();
            state.params = params;
            state.pages.begin_first()
        };
        debug!(generation = ticket.generation, "Catalog parameters changed");
        self.run(ticket).await
    }

    /// Edit the current parameters in place, then refetch.
    pub async fn update_params<F>(&self, edit: F) -> Result<FetchOutcome, CatalogError>
    where
        F: FnOnce(&mut CatalogParams),
    {
        let mut params = self.params();
        edit(&mut params);
        self.set_params(params).await
    }

    /// Refetch from the first page with the current parameters.
    pub async fn refresh(&self) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.lock().pages.begin_first();
        self.run(ticket).await
    }

    /// Fetch and append the next page.
    ///
    /// Returns `InFlight` while another fetch runs and `Exhausted` when the
    /// last page said there is nothing more. On failure the fetched data is
    /// unchanged and the pipeline is ready for another attempt.
    pub async fn load_more(&self) -> Result<FetchOutcome, CatalogError> {
        let ticket = match self.lock().pages.begin_next() {
            Ok(ticket) => ticket,
            Err(outcome) => {
                debug!(?outcome, "Nothing to load");
                return Ok(outcome);
            }
        };
        self.run(ticket).await
    }

    /// Filtered, sorted view over everything fetched so far.
    pub fn view(&self) -> CatalogView {
        let state = self.lock();
        CatalogView::build(
            state.pages.pages().nodes(),
            &state.params,
            state.pages.status(),
            state.pages.pages().next_cursor().is_some(),
        )
    }

    /// Every fetched product, unfiltered, in merge order.
    pub fn fetched(&self) -> Vec<ProductSummary> {
        self.lock().pages.pages().nodes().to_vec()
    }

    async fn run(&self, ticket: FetchTicket) -> Result<FetchOutcome, CatalogError> {
        let _ = self.events.send(CatalogEvent::StatusChanged(self.status()));

        let result = self
            .source
            .fetch_products(&ticket.request)
            .await
            .map_err(CatalogError::from);

        let (outcome, status, total) = {
            let mut state = self.lock();
            let outcome = state.pages.complete(&ticket, result);
            (outcome, state.pages.status(), state.pages.pages().len())
        };

        match &outcome {
            Ok(FetchOutcome::Applied { added }) => {
                info!(
                    generation = ticket.generation,
                    added,
                    total,
                    "Catalog page merged"
                );
                let _ = self.events.send(CatalogEvent::PageMerged {
                    added: *added,
                    total,
                });
                let _ = self.events.send(CatalogEvent::StatusChanged(status));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(generation = ticket.generation, kind = ?ticket.kind, error = %e, "Catalog fetch failed");
                let _ = self.events.send(CatalogEvent::FetchFailed(e.clone()));
                let _ = self.events.send(CatalogEvent::StatusChanged(status));
            }
        }
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CatalogPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogPipeline")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}
