//! Referee/match flow network construction.
//!
//! # Node Layout
//!
//! For `R` referees, `M` matches and `D` days:
//!
//! ```text
//! 0                          source
//! 1 + referee * D + day      referee-day nodes   [1, 1 + R·D)
//! 1 + R·D + match            match nodes         [1 + R·D, 1 + R·D + M)
//! 1 + R·D + M                sink
//! ```
//!
//! The scheme is fixed so node indices in logs and diagnostics mean the same
//! thing across runs.
//!
//! ## Edges
//!
//! Added in this order:
//!
//! 1. `source → referee-day` with that referee's hours for that day.
//! 2. `match → sink` with the match duration.
//! 3. `referee-day(match.day) → match` with the match duration, only when the
//!    referee holds the match's certification.
//!
//! Referee-day nodes are day-specific, so a referee can only reach matches
//! on the day the node stands for.
//!
//! ## Content Hash
//!
//! [`Network::content_hash`] is a BLAKE3 hash over `(from, to, capacity)` of
//! every forward arc in insertion order. Identical inputs in identical order
//! give identical hashes.

#![allow(clippy::module_name_repetitions)]

use officiate_core::{Day, Match, MatchId, Referee, RefereeId, validate};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::FeasibilityError;
use crate::residual::{Capacity, EdgeRef, NodeId, ResidualGraph};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Index arithmetic for the four node tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkLayout {
    pub referees: usize,
    pub matches: usize,
    pub days: Day,
    match_offset: NodeId,
    sink: NodeId,
}

impl NetworkLayout {
    /// Build the layout, checking that every index fits in [`NodeId`].
    ///
    /// # Errors
    ///
    /// Returns [`FeasibilityError::NodeCountOverflow`] when `1 + R·D + M + 1`
    /// does not fit.
    pub fn new(referees: usize, matches: usize, days: Day) -> Result<Self, FeasibilityError> {
        let overflow = || FeasibilityError::NodeCountOverflow {
            referees,
            matches,
            days,
        };
        let days_usize = usize::try_from(days).map_err(|_| overflow())?;
        let match_offset = referees
            .checked_mul(days_usize)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(overflow)?;
        let sink = match_offset.checked_add(matches).ok_or_else(overflow)?;
        // Keep node_count() = sink + 1 representable.
        sink.checked_add(1).ok_or_else(overflow)?;

        Ok(Self {
            referees,
            matches,
            days,
            match_offset,
            sink,
        })
    }

    #[must_use]
    pub const fn source(&self) -> NodeId {
        0
    }

    #[must_use]
    pub const fn sink(&self) -> NodeId {
        self.sink
    }

    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.sink + 1
    }

    /// Node for `referee` on `day`: `1 + referee * days + day`.
    ///
    /// Callers must pass a validated referee id and day.
    #[must_use]
    pub const fn referee_day_node(&self, referee: RefereeId, day: Day) -> NodeId {
        1 + referee * self.days as usize + day as usize
    }

    /// Node for match `id`: `1 + R·days + id`.
    #[must_use]
    pub const fn match_node(&self, id: MatchId) -> NodeId {
        self.match_offset + id
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// A built referee/match network, ready to solve.
#[derive(Debug, Clone)]
pub struct Network {
    pub graph: ResidualGraph,
    pub layout: NetworkLayout,
    /// Sum of match durations; the flow value that means "feasible".
    pub total_demand: Capacity,
    /// `match → sink` arc per match, indexed by match id.
    pub sink_edges: Vec<EdgeRef>,
    /// BLAKE3 hash of the forward arc list (`blake3:<hex>`).
    pub content_hash: String,
}

impl Network {
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.layout.source()
    }

    #[must_use]
    pub const fn sink(&self) -> NodeId {
        self.layout.sink()
    }
}

/// Validate the inputs and build the feasibility network.
///
/// # Errors
///
/// Returns [`FeasibilityError::Invalid`] for rejected input,
/// [`FeasibilityError::NodeCountOverflow`] if the layout does not fit and
/// [`FeasibilityError::DemandOverflow`] if total demand exceeds `u64`. No
/// graph is returned on error.
#[instrument(skip_all, fields(referees = referees.len(), matches = matches.len(), days = days))]
pub fn build(
    referees: &[Referee],
    matches: &[Match],
    days: Day,
) -> Result<Network, FeasibilityError> {
    validate(referees, matches, days)?;

    let layout = NetworkLayout::new(referees.len(), matches.len(), days)?;
    let total_demand = matches
        .iter()
        .try_fold(0_u64, |acc, m| acc.checked_add(Capacity::from(m.duration())))
        .ok_or(FeasibilityError::DemandOverflow)?;

    let mut builder = Builder {
        graph: ResidualGraph::new(layout.node_count()),
        hasher: blake3::Hasher::new(),
    };

    for referee in referees {
        for day in 0..days {
            builder.add(
                layout.source(),
                layout.referee_day_node(referee.id, day),
                Capacity::from(referee.hours_on(day)),
            )?;
        }
    }

    let mut sink_edges = vec![EdgeRef { node: 0, offset: 0 }; matches.len()];
    for m in matches {
        sink_edges[m.id()] = builder.add(
            layout.match_node(m.id()),
            layout.sink(),
            Capacity::from(m.duration()),
        )?;
    }

    let mut eligibility_edges = 0_usize;
    for referee in referees {
        for m in matches {
            if !referee.holds(m.certification()) {
                continue;
            }
            builder.add(
                layout.referee_day_node(referee.id, m.day()),
                layout.match_node(m.id()),
                Capacity::from(m.duration()),
            )?;
            eligibility_edges += 1;
        }
    }

    let Builder { graph, hasher } = builder;
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        eligibility_edges,
        total_demand,
        "feasibility network built"
    );

    Ok(Network {
        graph,
        layout,
        total_demand,
        sink_edges,
        content_hash: format!("blake3:{}", hasher.finalize()),
    })
}

struct Builder {
    graph: ResidualGraph,
    hasher: blake3::Hasher,
}

impl Builder {
    fn add(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    ) -> Result<EdgeRef, FeasibilityError> {
        let edge = self.graph.add_edge(from, to, capacity)?;
        self.hasher.update(&(from as u64).to_le_bytes());
        self.hasher.update(&(to as u64).to_le_bytes());
        self.hasher.update(&capacity.to_le_bytes());
        Ok(edge)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
