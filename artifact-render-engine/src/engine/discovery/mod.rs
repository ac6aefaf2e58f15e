//! Client-side discovery: simulated search plus facet filtering and sorting.

/// Facet selections, sort orders and the pure filter function.
pub mod filters;

/// Search profiles, tickets and the cancelable discovery pipeline.
pub mod search;

pub mod systems;

pub use filters::{Facet, FilterState, SortOrder, apply_filters, era_sort_key};
pub use search::{DiscoveryPipeline, SearchPhase, SearchProfile, SearchState, SearchTicket};
pub use systems::{DiscoveryCommand, SearchCompleted};
