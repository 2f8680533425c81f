use crate::airport::AirportCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

pub type CrewId = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Captain,
    FirstOfficer,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Captain => write!(f, "Captain"),
            Rank::FirstOfficer => write!(f, "First Officer"),
        }
    }
}

/// Behaviour shared by flight-deck and cabin crew.
pub trait Crew {
    fn name(&self) -> &CrewId;
    fn home_base(&self) -> &AirportCode;
    fn type_ratings(&self) -> &BTreeSet<Arc<str>>;

    fn is_qualified_for(&self, type_code: &str) -> bool {
        self.type_ratings().contains(type_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    pub name: CrewId,
    pub rank: Rank,
    pub home_base: AirportCode,
    pub type_ratings: BTreeSet<Arc<str>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabinCrew {
    pub name: CrewId,
    pub home_base: AirportCode,
    pub type_ratings: BTreeSet<Arc<str>>,
}

impl Crew for Pilot {
    fn name(&self) -> &CrewId {
        &self.name
    }

    fn home_base(&self) -> &AirportCode {
        &self.home_base
    }

    fn type_ratings(&self) -> &BTreeSet<Arc<str>> {
        &self.type_ratings
    }
}

impl Crew for CabinCrew {
    fn name(&self) -> &CrewId {
        &self.name
    }

    fn home_base(&self) -> &AirportCode {
        &self.home_base
    }

    fn type_ratings(&self) -> &BTreeSet<Arc<str>> {
        &self.type_ratings
    }
}

impl fmt::Display for Pilot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.rank)
    }
}

impl fmt::Display for CabinCrew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
