use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use constants::timing::{
    EXPLORE_SEARCH_LATENCY_MS, HERO_FALLBACK_SAMPLE_SIZE, HERO_SEARCH_LATENCY_MS,
};
use serde::{Deserialize, Serialize};

use super::filters::{FilterState, Facet, SortOrder, apply_filters};
use crate::catalog::{Artifact, Catalog};

/// Which search surface is being emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProfile {
    /// Explore page: name/culture/tag match, whole catalog when nothing matches.
    #[default]
    Explore,
    /// Landing page hero box: also matches era, small sample when nothing matches.
    Hero,
}

impl SearchProfile {
    pub fn latency(&self) -> Duration {
        match self {
            Self::Explore => Duration::from_millis(EXPLORE_SEARCH_LATENCY_MS),
            Self::Hero => Duration::from_millis(HERO_SEARCH_LATENCY_MS),
        }
    }

    fn matches_era(&self) -> bool {
        matches!(self, Self::Hero)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Done,
}

/// Identifies one submitted query. Only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchState {
    pub query: String,
    pub phase: SearchPhase,
    pub results: Option<Vec<Artifact>>,
}

/// Simulated semantic search over the catalog.
///
/// Case-insensitive substring match on name, culture and tags (plus era for
/// [`SearchProfile::Hero`]). An empty match falls back to a profile-specific
/// default list so the page never shows nothing.
pub fn search_catalog(catalog: &Catalog, query: &str, profile: SearchProfile) -> Vec<Artifact> {
    // Surrounding whitespace is part of the needle.
    let needle = query.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&needle);

    let matched: Vec<Artifact> = catalog
        .artifacts()
        .iter()
        .filter(|a| {
            contains(&a.name)
                || contains(&a.culture)
                || a.tags.iter().any(|t| contains(t))
                || (profile.matches_era() && contains(&a.era))
        })
        .cloned()
        .collect();

    if !matched.is_empty() {
        return matched;
    }

    match profile {
        SearchProfile::Explore => catalog.artifacts().to_vec(),
        SearchProfile::Hero => catalog
            .artifacts()
            .iter()
            .take(HERO_FALLBACK_SAMPLE_SIZE)
            .cloned()
            .collect(),
    }
}

/// Query + facets → displayed list, with a cancelable searching phase.
#[derive(Resource, Debug, Clone)]
pub struct DiscoveryPipeline {
    catalog: Arc<Catalog>,
    profile: SearchProfile,
    latency: Duration,
    state: SearchState,
    filters: FilterState,
    /// Ticket allowed to complete; `None` after a clear.
    latest: Option<SearchTicket>,
    next_ticket: u64,
    pending: Vec<(SearchTicket, Duration)>,
}

impl DiscoveryPipeline {
    pub fn new(catalog: Arc<Catalog>, profile: SearchProfile) -> Self {
        Self {
            catalog,
            profile,
            latency: profile.latency(),
            state: SearchState::default(),
            filters: FilterState::default(),
            latest: None,
            next_ticket: 1,
            pending: Vec::new(),
        }
    }

    /// Override the simulated latency, e.g. zero for synchronous hosts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Start a search. Blank queries are ignored and return `None`.
    pub fn submit(&mut self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            return None;
        }

        let ticket = SearchTicket(self.next_ticket);
        self.next_ticket += 1;

        self.state.query = query.to_string();
        self.state.phase = SearchPhase::Searching;
        self.state.results = None;
        self.latest = Some(ticket);
        self.pending.push((ticket, self.latency));

        debug!("Search {:?} submitted: {:?}", ticket, query);
        Some(ticket)
    }

    /// Advance pending completions; returns the ticket whose results were applied.
    pub fn tick(&mut self, delta: Duration) -> Option<SearchTicket> {
        let mut arrived = Vec::new();
        self.pending.retain_mut(|(ticket, remaining)| {
            *remaining = remaining.saturating_sub(delta);
            if remaining.is_zero() {
                arrived.push(*ticket);
                false
            } else {
                true
            }
        });

        let mut applied = None;
        for ticket in arrived {
            if self.complete(ticket) {
                applied = Some(ticket);
            }
        }
        applied
    }

    /// Apply results for `ticket` if it is still the latest request.
    pub fn complete(&mut self, ticket: SearchTicket) -> bool {
        self.pending.retain(|(t, _)| *t != ticket);

        if self.latest != Some(ticket) || self.state.phase != SearchPhase::Searching {
            debug!("Discarding stale search completion {:?}", ticket);
            return false;
        }

        let results = search_catalog(&self.catalog, &self.state.query, self.profile);
        info!(
            "Search {:?} for {:?} completed with {} results",
            ticket,
            self.state.query,
            results.len()
        );
        self.state.results = Some(results);
        self.state.phase = SearchPhase::Done;
        true
    }

    /// Drop query and results immediately, cancelling anything in flight.
    pub fn clear(&mut self) {
        self.state = SearchState::default();
        self.latest = None;
        self.pending.clear();
    }

    /// Results (or the whole catalog) after facets and sort.
    pub fn display_set(&self) -> Vec<Artifact> {
        let source = self
            .state
            .results
            .as_deref()
            .unwrap_or(self.catalog.artifacts());
        apply_filters(source, &self.filters)
    }

    pub fn set_culture(&mut self, culture: Facet) {
        self.filters.culture = culture;
    }

    pub fn set_category(&mut self, category: Facet) {
        self.filters.category = category;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filters.sort = sort;
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn phase(&self) -> SearchPhase {
        self.state.phase
    }

    pub fn is_searching(&self) -> bool {
        self.state.phase == SearchPhase::Searching
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn profile(&self) -> SearchProfile {
        self.profile
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}
