//! Catalog filtering, sorting and retrieval.

mod filter;
mod pipeline;
mod query;
mod quick;
mod results;

pub use filter::{CatalogFilter, PriceWindow};
pub use pipeline::{CatalogEvent, CatalogPipeline};
pub use query::{CatalogParams, SortKey};
pub use quick::{QuickSearch, SearchOutcome};
pub use results::CatalogView;
