use officiate_core::{ErrorCode, ValidationError};

use crate::residual::NodeId;

/// Errors raised by the residual graph and the flow solver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint or terminal outside `0..node_count`.
    #[error("node {node} is out of range for a graph with {node_count} node(s)")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    /// Source and sink are the same node.
    #[error("source and sink must differ (both are node {node})")]
    SameTerminal { node: NodeId },

    /// Accumulated flow or cut capacity no longer fits in `u64`.
    #[error("flow accumulation overflowed: {accumulated} + {pushed}")]
    FlowOverflow { accumulated: u64, pushed: u64 },
}

impl GraphError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NodeOutOfRange { .. } => ErrorCode::NodeOutOfRange,
            Self::SameTerminal { .. } => ErrorCode::InvalidTerminals,
            Self::FlowOverflow { .. } => ErrorCode::CapacityOverflow,
        }
    }
}

/// Errors that prevent a feasibility verdict from being produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeasibilityError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The sum of match durations does not fit in `u64`.
    #[error("total match demand overflowed")]
    DemandOverflow,

    /// The node index scheme cannot address this many referee-days and
    /// matches.
    #[error(
        "network for {referees} referee(s) x {days} day(s) and {matches} match(es) exceeds the addressable node range"
    )]
    NodeCountOverflow {
        referees: usize,
        matches: usize,
        days: u32,
    },
}

impl FeasibilityError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Invalid(err) => err.code(),
            Self::Graph(err) => err.code(),
            Self::DemandOverflow | Self::NodeCountOverflow { .. } => ErrorCode::CapacityOverflow,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
