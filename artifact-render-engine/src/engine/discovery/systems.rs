use bevy::prelude::*;
use serde::Serialize;

use super::filters::{Facet, SortOrder};
use super::search::{DiscoveryPipeline, SearchTicket};

/// Search and facet requests from the presentation layer.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum DiscoveryCommand {
    Submit(String),
    Clear,
    SetCulture(Facet),
    SetCategory(Facet),
    SetSort(SortOrder),
}

/// Fired when the latest search applies its results.
#[derive(Event, Debug, Clone, PartialEq, Serialize)]
pub struct SearchCompleted {
    pub ticket: SearchTicket,
    pub query: String,
    pub result_count: usize,
}

pub fn handle_discovery_commands(
    mut commands: EventReader<DiscoveryCommand>,
    mut pipeline: ResMut<DiscoveryPipeline>,
) {
    for command in commands.read() {
        match command {
            DiscoveryCommand::Submit(query) => {
                if pipeline.submit(query).is_none() {
                    debug!("Blank query ignored");
                }
            }
            DiscoveryCommand::Clear => pipeline.clear(),
            DiscoveryCommand::SetCulture(facet) => pipeline.set_culture(facet.clone()),
            DiscoveryCommand::SetCategory(facet) => pipeline.set_category(facet.clone()),
            DiscoveryCommand::SetSort(sort) => pipeline.set_sort(*sort),
        }
    }
}

/// Deliver simulated search completions once their latency has elapsed.
pub fn tick_discovery_clock(
    time: Res<Time>,
    mut pipeline: ResMut<DiscoveryPipeline>,
    mut completed: EventWriter<SearchCompleted>,
) {
    if let Some(ticket) = pipeline.tick(time.delta()) {
        let state = pipeline.state();
        completed.write(SearchCompleted {
            ticket,
            query: state.query.clone(),
            result_count: state.results.as_ref().map_or(0, Vec::len),
        });
    }
}
