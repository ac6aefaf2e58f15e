/// Simulated 3D reconstruction delay before a viewer session becomes ready (milliseconds)
pub const GENERATION_DELAY_MS: u64 = 2000;

/// Simulated semantic search latency on the explore page (milliseconds)
pub const EXPLORE_SEARCH_LATENCY_MS: u64 = 2200;

/// Simulated semantic search latency for the landing page hero search (milliseconds)
pub const HERO_SEARCH_LATENCY_MS: u64 = 2600;

/// Number of catalog entries shown when a hero search matches nothing
pub const HERO_FALLBACK_SAMPLE_SIZE: usize = 4;
