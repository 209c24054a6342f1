//! Feasibility verdicts from the maximum flow of the referee network.
//!
//! Every `match → sink` arc carries exactly the match's duration, so the
//! maximum flow can never exceed the total demand, and it reaches the total
//! demand exactly when every match can be fully covered by certified
//! referees within their daily budgets. The evaluator certifies that such a
//! covering exists; it does not say who covers what.

#![allow(clippy::module_name_repetitions)]

use officiate_core::{Day, Match, MatchId, Problem, Referee};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::dinic::Dinic;
use crate::error::FeasibilityError;
use crate::network::{Network, build};
use crate::residual::Capacity;

/// Scalar verdict handed to reporting code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowResult {
    pub feasible: bool,
    pub achieved_flow: Capacity,
    pub total_demand: Capacity,
}

impl FlowResult {
    #[must_use]
    pub const fn new(achieved_flow: Capacity, total_demand: Capacity) -> Self {
        Self {
            feasible: achieved_flow == total_demand,
            achieved_flow,
            total_demand,
        }
    }

    /// Match-hours that could not be covered.
    #[must_use]
    pub const fn shortfall(&self) -> Capacity {
        self.total_demand.saturating_sub(self.achieved_flow)
    }
}

/// A match whose demand was not fully routed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UncoveredMatch {
    pub match_id: MatchId,
    pub required: Capacity,
    pub uncovered: Capacity,
}

/// Verdict plus diagnostics about the solved network.
///
/// `uncovered` depends on which augmenting paths the solver happened to
/// take; only its total (`result.shortfall()`) is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeasibilityReport {
    #[serde(flatten)]
    pub result: FlowResult,
    pub uncovered: Vec<UncoveredMatch>,
    pub nodes: usize,
    pub edges: usize,
    pub phases: usize,
    pub augmenting_paths: usize,
    pub content_hash: String,
}

/// Build the network for the given inputs and return the scalar verdict.
///
/// # Errors
///
/// Returns a [`FeasibilityError`] for invalid input or overflow; no verdict
/// is produced in that case.
pub fn evaluate(
    referees: &[Referee],
    matches: &[Match],
    days: Day,
) -> Result<FlowResult, FeasibilityError> {
    evaluate_report(referees, matches, days).map(|report| report.result)
}

/// [`evaluate`] with per-match shortfall and solver diagnostics.
///
/// # Errors
///
/// See [`evaluate`].
#[instrument(skip_all, fields(referees = referees.len(), matches = matches.len(), days = days))]
pub fn evaluate_report(
    referees: &[Referee],
    matches: &[Match],
    days: Day,
) -> Result<FeasibilityReport, FeasibilityError> {
    let network = build(referees, matches, days)?;
    solve(network)
}

/// [`evaluate_report`] over a [`Problem`] bundle.
///
/// # Errors
///
/// See [`evaluate`].
pub fn evaluate_problem(problem: &Problem) -> Result<FeasibilityReport, FeasibilityError> {
    evaluate_report(&problem.referees, &problem.matches, problem.days)
}

/// Solve an already built network.
///
/// # Errors
///
/// Returns [`FeasibilityError::Graph`] if the solver fails.
pub fn solve(mut network: Network) -> Result<FeasibilityReport, FeasibilityError> {
    let (source, sink) = (network.source(), network.sink());
    let mut solver = Dinic::new();
    let achieved = solver.max_flow(&mut network.graph, source, sink)?;
    let result = FlowResult::new(achieved, network.total_demand);

    let uncovered = network
        .sink_edges
        .iter()
        .enumerate()
        .filter_map(|(match_id, edge)| {
            let arc = network.graph.edge(*edge)?;
            (arc.residual() > 0).then_some(UncoveredMatch {
                match_id,
                required: arc.original(),
                uncovered: arc.residual(),
            })
        })
        .collect();

    info!(
        feasible = result.feasible,
        achieved_flow = result.achieved_flow,
        total_demand = result.total_demand,
        "feasibility evaluated"
    );

    Ok(FeasibilityReport {
        result,
        uncovered,
        nodes: network.graph.node_count(),
        edges: network.graph.edge_count(),
        phases: solver.phases(),
        augmenting_paths: solver.augmenting_paths(),
        content_hash: network.content_hash,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
