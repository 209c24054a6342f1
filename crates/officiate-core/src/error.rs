use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::{Day, MatchId, RefereeId};

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ProblemParseError,
    ProblemReadError,
    InvalidTimeRange,
    DayOutOfRange,
    NoDays,
    InvalidId,
    InvalidCertification,
    NodeOutOfRange,
    InvalidTerminals,
    CapacityOverflow,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ProblemParseError => "E1002",
            Self::ProblemReadError => "E1003",
            Self::InvalidTimeRange => "E2001",
            Self::DayOutOfRange => "E2002",
            Self::NoDays => "E2003",
            Self::InvalidId => "E2004",
            Self::InvalidCertification => "E2005",
            Self::NodeOutOfRange => "E3001",
            Self::InvalidTerminals => "E3002",
            Self::CapacityOverflow => "E4001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ProblemParseError => "Problem file parse error",
            Self::ProblemReadError => "Problem file could not be read",
            Self::InvalidTimeRange => "Match ends at or before its start",
            Self::DayOutOfRange => "Day index outside the scheduling horizon",
            Self::NoDays => "Scheduling horizon has no days",
            Self::InvalidId => "Referee or match id is duplicated or out of range",
            Self::InvalidCertification => "Certification tag out of range",
            Self::NodeOutOfRange => "Flow node index out of range",
            Self::InvalidTerminals => "Invalid source/sink pair",
            Self::CapacityOverflow => "Capacity accumulation overflowed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in officiate.toml and retry."),
            Self::ProblemParseError => {
                Some("Problem files must be JSON or TOML with days, referees and matches.")
            }
            Self::ProblemReadError => Some("Check that the path exists and is readable."),
            Self::InvalidTimeRange => Some("Every match needs end > start."),
            Self::DayOutOfRange => Some("Use day indices in [0, days)."),
            Self::NoDays => Some("Set days to a positive integer."),
            Self::InvalidId => Some("Number referees 0..R and matches 0..M, each id exactly once."),
            Self::InvalidCertification => Some("Certification tags must be below 64."),
            Self::NodeOutOfRange | Self::InvalidTerminals => None,
            Self::CapacityOverflow => Some("Reduce hour budgets or match durations."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A problem file that could not be turned into a [`Problem`](crate::Problem).
#[derive(Debug, thiserror::Error)]
pub enum ProblemFileError {
    #[error(
        "unsupported problem file extension {extension:?} for {} (expected .json or .toml)",
        path.display()
    )]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl ProblemFileError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ProblemReadError,
            Self::UnsupportedExtension { .. } | Self::Parse { .. } => ErrorCode::ProblemParseError,
        }
    }
}

/// Input rejected before any flow network is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A match whose end is not after its start.
    #[error("match {match_id} has end {end} <= start {start}")]
    InvalidTimeRange {
        match_id: MatchId,
        start: u32,
        end: u32,
    },

    /// A match scheduled on a day outside `[0, days)`.
    #[error("match {match_id} is on day {day}, horizon has {days} day(s)")]
    MatchDayOutOfRange { match_id: MatchId, day: Day, days: Day },

    /// A referee availability override outside `[0, days)`.
    #[error("referee {referee_id} has availability for day {day}, horizon has {days} day(s)")]
    AvailabilityDayOutOfRange {
        referee_id: RefereeId,
        day: Day,
        days: Day,
    },

    /// `days == 0`.
    #[error("days must be positive")]
    NoDays,

    #[error("referee id {id} appears more than once")]
    DuplicateRefereeId { id: RefereeId },

    #[error("referee id {id} is out of range for {count} referee(s)")]
    RefereeIdOutOfRange { id: RefereeId, count: usize },

    #[error("match id {id} appears more than once")]
    DuplicateMatchId { id: MatchId },

    #[error("match id {id} is out of range for {count} match(es)")]
    MatchIdOutOfRange { id: MatchId, count: usize },

    /// A certification tag that does not fit the 64-bit set.
    #[error("certification tag {tag} is out of range (max {max})")]
    CertificationOutOfRange { tag: u8, max: u8 },
}

impl ValidationError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidTimeRange { .. } => ErrorCode::InvalidTimeRange,
            Self::MatchDayOutOfRange { .. } | Self::AvailabilityDayOutOfRange { .. } => {
                ErrorCode::DayOutOfRange
            }
            Self::NoDays => ErrorCode::NoDays,
            Self::DuplicateRefereeId { .. }
            | Self::RefereeIdOutOfRange { .. }
            | Self::DuplicateMatchId { .. }
            | Self::MatchIdOutOfRange { .. } => ErrorCode::InvalidId,
            Self::CertificationOutOfRange { .. } => ErrorCode::InvalidCertification,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
