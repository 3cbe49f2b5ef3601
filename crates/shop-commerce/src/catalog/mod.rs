//! Catalog model and pagination.
//!
//! - [`ProductSummary`], [`PostSummary`] - nodes delivered by the service
//! - [`Category`] - category tree and name lookup
//! - [`PageAccumulator`], [`PagedState`] - cursor merge and fetch lifecycle
//! - [`CatalogSource`], [`ContentSource`] - remote boundaries
//! - [`PostFeed`] - paginated post list

mod category;
mod feed;
mod page;
mod post;
mod product;
mod source;

pub use category::{find_category, Category};
pub use feed::PostFeed;
pub use page::{
    FetchKind, FetchOutcome, FetchTicket, Node, Page, PageAccumulator, PageInfo, PageRequest,
    PagedState, PipelineStatus,
};
pub use post::{PostDetail, PostSummary, TermRef};
pub use product::{CategoryRef, ImageRef, ProductSummary, StockStatus};
pub use source::{CatalogSource, ContentSource};
