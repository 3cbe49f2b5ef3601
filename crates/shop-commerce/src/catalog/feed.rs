//! Paginated post feed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::catalog::page::{FetchOutcome, PagedState, PipelineStatus};
use crate::catalog::post::PostSummary;
use crate::catalog::source::ContentSource;
use crate::error::CatalogError;

/// Posts fetched so far, appended page by page.
pub struct PostFeed {
    source: Arc<dyn ContentSource>,
    state: Mutex<PagedState<PostSummary>>,
}

impl PostFeed {
    pub fn new(source: Arc<dyn ContentSource>, page_size: u32) -> Self {
        Self {
            source,
            state: Mutex::new(PagedState::new(page_size)),
        }
    }

    /// Drop everything and fetch the first page.
    pub async fn refresh(&self) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.lock().begin_first();
        let result = self.source.fetch_posts(&ticket.request).await;
        let outcome = self.lock().complete(&ticket, result);
        log_outcome("refresh", &outcome);
        Ok(outcome?)
    }

    /// Append the next page, if there is one.
    pub async fn load_more(&self) -> Result<FetchOutcome, CatalogError> {
        let ticket = match self.lock().begin_next() {
            Ok(ticket) => ticket,
            Err(outcome) => return Ok(outcome),
        };
        let result = self.source.fetch_posts(&ticket.request).await;
        let outcome = self.lock().complete(&ticket, result);
        log_outcome("load_more", &outcome);
        Ok(outcome?)
    }

    pub fn posts(&self) -> Vec<PostSummary> {
        self.lock().pages().nodes().to_vec()
    }

    pub fn status(&self) -> PipelineStatus {
        self.lock().status()
    }

    pub fn has_next_page(&self) -> bool {
        self.lock().pages().next_cursor().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, PagedState<PostSummary>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_outcome<E: std::fmt::Display>(op: &str, outcome: &Result<FetchOutcome, E>) {
    match outcome {
        Ok(FetchOutcome::Applied { added }) => info!(op, added, "Posts merged"),
        Ok(_) => {}
        Err(e) => warn!(op, error = %e, "Post fetch failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::page::{Page, PageInfo, PageRequest};
    use crate::catalog::post::PostDetail;
    use crate::error::SourceError;
    use async_trait::async_trait;

    struct TwoPages;

    #[async_trait]
    impl ContentSource for TwoPages {
        async fn fetch_posts(&self, request: &PageRequest) -> Result<Page<PostSummary>, SourceError> {
            match request.after.as_deref() {
                None => Ok(Page::new(
                    vec![PostSummary::new("a", "A", "a"), PostSummary::new("b", "B", "b")],
                    PageInfo {
                        has_next_page: true,
                        end_cursor: Some("cb".into()),
                    },
                )),
                Some("cb") => Ok(Page::last(vec![
                    PostSummary::new("b", "B", "b"),
                    PostSummary::new("c", "C", "c"),
                ])),
                Some(_) => Err(SourceError::Service("unknown cursor".into())),
            }
        }

        async fn fetch_post_by_slug(&self, _: &str) -> Result<Option<PostDetail>, SourceError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_feed_pages_through() {
        let feed = PostFeed::new(Arc::new(TwoPages), 2);
        assert_eq!(feed.refresh().await.unwrap(), FetchOutcome::Applied { added: 2 });
        assert!(feed.has_next_page());

        assert_eq!(feed.load_more().await.unwrap(), FetchOutcome::Applied { added: 1 });
        assert_eq!(feed.load_more().await.unwrap(), FetchOutcome::Exhausted);

        let slugs: Vec<_> = feed.posts().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, ["a", "b", "c"]);
        assert_eq!(feed.status(), PipelineStatus::Ready);
    }
}
