//! Route blocking
//!
//! Blocking a well or refinery tightens the upper bound of every allowed route
//! touching it to zero. Variables and constraint rows are never removed, so the
//! policy composes with whatever the builder produced.

use itertools::Itertools;
use tracing::{info, warn};

use super::FlowModel;
use crate::domain::{BlockList, NetworkDefinition, Node};

/// Bound overrides for blocked wells and refineries
pub struct RouteBlockingPolicy<'a> {
    network: &'a NetworkDefinition,
    blocks: &'a BlockList,
}

impl<'a> RouteBlockingPolicy<'a> {
    pub fn new(network: &'a NetworkDefinition, blocks: &'a BlockList) -> Self {
        Self { network, blocks }
    }

    /// Return `model` with blocked routes bounded to zero
    ///
    /// Ids that name no node match no allowed route and are skipped with a
    /// warning.
    pub fn apply(&self, mut model: FlowModel) -> FlowModel {
        if self.blocks.is_empty() {
            return model;
        }
        self.warn_unknown();

        let blocked_routes: Vec<(String, String)> = self
            .blocks
            .wells
            .iter()
            .cartesian_product(self.network.refineries())
            .map(|(w, r)| (w.as_str(), r))
            .chain(
                self.network
                    .wells()
                    .cartesian_product(self.blocks.refineries.iter())
                    .map(|(w, r)| (w, r.as_str())),
            )
            .filter(|(w, r)| self.network.is_allowed(w, r))
            .map(|(w, r)| (w.to_string(), r.to_string()))
            .collect();

        let tightened = model.zero_upper_bounds(|v| {
            blocked_routes
                .iter()
                .any(|(w, r)| *w == v.well && *r == v.refinery)
        });

        info!(
            blocked_wells = self.blocks.wells.len(),
            blocked_refineries = self.blocks.refineries.len(),
            blocked_routes = blocked_routes.len(),
            tightened,
            "route blocking applied"
        );

        model
    }

    fn warn_unknown(&self) {
        for w in self
            .blocks
            .wells
            .iter()
            .filter(|w| !self.network.contains(Node::Well(w)))
        {
            warn!(well = %w, "blocked well is not in the network");
        }
        for r in self
            .blocks
            .refineries
            .iter()
            .filter(|r| !self.network.contains(Node::Refinery(r)))
        {
            warn!(refinery = %r, "blocked refinery is not in the network");
        }
    }
}
