#![forbid(unsafe_code)]
//! officiate-flow library.
//!
//! # Overview
//!
//! Decides whether every match can be staffed by reducing the question to a
//! maximum flow:
//!
//! ```text
//! referees + matches + days
//!        ↓  network::build()            (validates first)
//! Network (ResidualGraph: source → referee-day → match → sink)
//!        ↓  dinic::Dinic::max_flow()
//! achieved flow
//!        ↓  feasibility::solve()
//! FlowResult { feasible = achieved == total_demand }
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums ([`GraphError`], [`FeasibilityError`]).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod cut;
pub mod dinic;
pub mod error;
pub mod feasibility;
pub mod network;
pub mod residual;

pub use cut::{MinCut, min_cut};
pub use dinic::{Dinic, max_flow};
pub use error::{FeasibilityError, GraphError};
pub use feasibility::{
    FeasibilityReport, FlowResult, UncoveredMatch, evaluate, evaluate_problem, evaluate_report,
    solve,
};
pub use network::{Network, NetworkLayout, build};
pub use residual::{Capacity, Edge, EdgeRef, NodeId, ResidualGraph};
