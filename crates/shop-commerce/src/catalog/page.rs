//! Cursor pagination: page types, the merge accumulator and the fetch state
//! machine shared by the product pipeline and the post feed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::post::PostSummary;
use crate::catalog::product::ProductSummary;

/// Anything with a stable identity inside a paged collection.
pub trait Node {
    fn node_id(&self) -> &str;
}

impl Node for ProductSummary {
    fn node_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Node for PostSummary {
    fn node_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Cursor position after a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
}

/// One page of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(nodes: Vec<T>, page_info: PageInfo) -> Self {
        Self { nodes, page_info }
    }

    /// A final page with no successor.
    pub fn last(nodes: Vec<T>) -> Self {
        Self::new(nodes, PageInfo::default())
    }
}

/// Arguments for a page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub first: u32,
    pub after: Option<String>,
}

impl PageRequest {
    pub fn first_page(first: u32) -> Self {
        Self { first, after: None }
    }

    pub fn after(first: u32, cursor: impl Into<String>) -> Self {
        Self {
            first,
            after: Some(cursor.into()),
        }
    }
}

/// Concatenation of fetched pages, deduplicated by node id.
///
/// The first occurrence of an id wins; later duplicates are dropped.
/// `page_info` always reflects the most recent page.
#[derive(Debug, Clone)]
pub struct PageAccumulator<T> {
    nodes: Vec<T>,
    seen: HashSet<String>,
    page_info: PageInfo,
    pages: usize,
}

impl<T> Default for PageAccumulator<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            seen: HashSet::new(),
            page_info: PageInfo::default(),
            pages: 0,
        }
    }
}

impl<T: Node> PageAccumulator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every page.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Merge a page, returning how many new nodes it contributed.
    pub fn append(&mut self, page: Page<T>) -> usize {
        let before = self.nodes.len();
        for node in page.nodes {
            if self.seen.insert(node.node_id().to_string()) {
                self.nodes.push(node);
            }
        }
        self.page_info = page.page_info;
        self.pages += 1;
        self.nodes.len() - before
    }

    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cursor for the next page, if the last page said there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.page_info.has_next_page {
            self.page_info.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Lifecycle of a paged collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    #[default]
    Idle,
    FetchingFirstPage,
    FetchingNextPage,
    Ready,
    /// The first page failed. Whatever is accumulated stays readable.
    Error,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Idle => "idle",
            PipelineStatus::FetchingFirstPage => "fetching_first_page",
            PipelineStatus::FetchingNextPage => "fetching_next_page",
            PipelineStatus::Ready => "ready",
            PipelineStatus::Error => "error",
        }
    }

    pub fn is_fetching(&self) -> bool {
        matches!(
            self,
            PipelineStatus::FetchingFirstPage | PipelineStatus::FetchingNextPage
        )
    }
}

/// Result of a fetch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged.
    Applied { added: usize },
    /// A newer fetch was started meanwhile; the response was dropped.
    Stale,
    /// There is no next page.
    Exhausted,
    /// Another fetch for the current parameters is already running.
    InFlight,
}

/// Which page a fetch is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    First,
    Next,
}

/// Ticket handed out when a fetch starts and presented when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub kind: FetchKind,
    pub request: PageRequest,
}

/// Fetch state machine with a stale-response guard.
///
/// Every first-page fetch bumps the generation; completions carrying an
/// older generation are discarded without touching state.
#[derive(Debug)]
pub struct PagedState<T> {
    pages: PageAccumulator<T>,
    status: PipelineStatus,
    generation: u64,
    page_size: u32,
}

impl<T: Node> PagedState<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            pages: PageAccumulator::new(),
            status: PipelineStatus::Idle,
            generation: 0,
            page_size,
        }
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pages(&self) -> &PageAccumulator<T> {
        &self.pages
    }

    /// Discard accumulated pages and start a first-page fetch.
    pub fn begin_first(&mut self) -> FetchTicket {
        self.generation += 1;
        self.pages.reset();
        self.status = PipelineStatus::FetchingFirstPage;
        FetchTicket {
            generation: self.generation,
            kind: FetchKind::First,
            request: PageRequest::first_page(self.page_size),
        }
    }

    /// Start a next-page fetch, or explain why none is needed.
    pub fn begin_next(&mut self) -> Result<FetchTicket, FetchOutcome> {
        if self.status.is_fetching() {
            return Err(FetchOutcome::InFlight);
        }
        let cursor = self
            .pages
            .next_cursor()
            .map(str::to_string)
            .ok_or(FetchOutcome::Exhausted)?;
        self.status = PipelineStatus::FetchingNextPage;
        Ok(FetchTicket {
            generation: self.generation,
            kind: FetchKind::Next,
            request: PageRequest::after(self.page_size, cursor),
        })
    }

    /// Apply a completed fetch.
    ///
    /// Returns `Ok(Stale)` for superseded tickets. Errors are handed back
    /// unchanged after the status is updated; data is never touched.
    pub fn complete<E>(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Page<T>, E>,
    ) -> Result<FetchOutcome, E> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale page response"
            );
            return Ok(FetchOutcome::Stale);
        }
        match result {
            Ok(page) => {
                let added = self.pages.append(page);
                self.status = PipelineStatus::Ready;
                Ok(FetchOutcome::Applied { added })
            }
            Err(e) => {
                self.status = match ticket.kind {
                    FetchKind::First => PipelineStatus::Error,
                    FetchKind::Next => PipelineStatus::Ready,
                };
                Err(e)
            }
        }
    }
}
