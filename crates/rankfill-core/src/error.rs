use std::fmt;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidField,
    DuplicateRank,
    CapacityExceeded,
    IdPoolExhausted,
    ConsistencyViolation,
    CycleDetected,
    BoundContradiction,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidField => "E1002",
            Self::DuplicateRank => "E1003",
            Self::CapacityExceeded => "E1004",
            Self::IdPoolExhausted => "E1005",
            Self::ConsistencyViolation => "E2001",
            Self::CycleDetected => "E2002",
            Self::BoundContradiction => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidField => "Field value out of range",
            Self::DuplicateRank => "Duplicate global rank",
            Self::CapacityExceeded => "More items than available ranks",
            Self::IdPoolExhausted => "Identifier pool exhausted",
            Self::ConsistencyViolation => "Inconsistent group sequence",
            Self::CycleDetected => "Ordering cycle detected",
            Self::BoundContradiction => "Contradictory rank bounds",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in rankfill.toml and retry."),
            Self::InvalidField => {
                Some("Check the rank and group_seq columns against the configured bounds.")
            }
            Self::DuplicateRank => Some("Each global rank may be claimed by a single item."),
            Self::CapacityExceeded => {
                Some("Widen [ranks] in the config or remove surplus items from the input.")
            }
            Self::IdPoolExhausted => Some("Split the input; the identifier pool holds 1014 ids."),
            Self::ConsistencyViolation => {
                Some("Group sequence numbers must run 1, 2, 3, ... within each year.")
            }
            Self::CycleDetected => {
                Some("Correct the rank or group_seq of one of the listed items.")
            }
            Self::BoundContradiction => {
                Some("The two evidence signals disagree around this item; review its neighbours.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result alias for fallible inference operations.
pub type Result<T> = std::result::Result<T, InferError>;

/// Fatal data errors raised while ingesting items or running the pipeline.
///
/// Items are named by their short identifier (`#ab`). Nothing is recovered
/// automatically; callers decide whether to abort or ask for corrected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferError {
    #[error("invalid {field} ({value}) for {item}: expected {min}..={max}")]
    InvalidField {
        item: String,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("rank {rank} is claimed by both {first} and {second}")]
    DuplicateRank {
        rank: u32,
        first: String,
        second: String,
    },

    #[error("{items} items do not fit into {capacity} ranks ({low}..={high})")]
    CapacityExceeded {
        items: usize,
        capacity: usize,
        low: u32,
        high: u32,
    },

    #[error("identifier pool exhausted after {allocated} ids")]
    IdPoolExhausted { allocated: usize },

    #[error("inconsistent group sequence for {year} at {item}: {reason}")]
    Consistency {
        item: String,
        year: i32,
        reason: String,
    },

    #[error("ordering cycle through {} items: {}", .members.len(), .members.join(" -> "))]
    Cycle { members: Vec<String> },

    #[error(
        "contradictory bounds for {item}: min {min} > max {max} (lower anchor {}, upper anchor {})",
        anchor_label(.lower_anchor.as_deref()),
        anchor_label(.upper_anchor.as_deref())
    )]
    BoundContradiction {
        item: String,
        min: u32,
        max: u32,
        lower_anchor: Option<String>,
        upper_anchor: Option<String>,
    },
}

fn anchor_label(anchor: Option<&str>) -> &str {
    anchor.unwrap_or("none")
}

impl InferError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidField { .. } => ErrorCode::InvalidField,
            Self::DuplicateRank { .. } => ErrorCode::DuplicateRank,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::IdPoolExhausted { .. } => ErrorCode::IdPoolExhausted,
            Self::Consistency { .. } => ErrorCode::ConsistencyViolation,
            Self::Cycle { .. } => ErrorCode::CycleDetected,
            Self::BoundContradiction { .. } => ErrorCode::BoundContradiction,
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
