use crate::crew::Rank;
use crate::flight::LegId;
use crate::resource::ResourceKey;
use crate::route::FlightNumber;
use std::fmt;
use thiserror::Error;

/// A seat of a leg that was still empty (or short) at completion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRole {
    Aircraft,
    Captain,
    FirstOfficer,
    CabinCrew { bound: usize, required: usize },
}

impl fmt::Display for MissingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRole::Aircraft => write!(f, "aircraft"),
            MissingRole::Captain => write!(f, "captain"),
            MissingRole::FirstOfficer => write!(f, "first officer"),
            MissingRole::CabinCrew { bound, required } => {
                write!(f, "cabin crew ({}/{})", bound, required)
            }
        }
    }
}

fn describe(missing: &[MissingRole]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("{resource} is already booked on leg {conflicting}, cannot bind to leg {leg}")]
    DoubleBooked {
        resource: ResourceKey,
        leg: LegId,
        conflicting: LegId,
    },

    #[error("leg {leg} is incomplete, missing {}", describe(.missing))]
    InvalidAllocation { leg: LegId, missing: Vec<MissingRole> },

    #[error("{resource} does not hold the rank of {expected}")]
    RankMismatch { resource: ResourceKey, expected: Rank },

    #[error("leg {leg} is closed to further allocation")]
    LegClosed { leg: LegId },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} identifier {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("route {flight_number} is invalid: {reason}")]
    InvalidRoute {
        flight_number: FlightNumber,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("qualification weight {qualification} must exceed the combined other factors ({others})")]
    QualificationNotDominant { qualification: u64, others: u64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
