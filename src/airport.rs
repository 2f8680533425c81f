use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;

pub type AirportCode = Arc<str>;

/// The carrier's home country, expressed as the set of its airports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HomeCountry {
    pub name: Arc<str>,
    pub airports: BTreeSet<AirportCode>,
}

impl HomeCountry {
    pub fn new(name: &str, airports: &[&str]) -> Self {
        HomeCountry {
            name: Arc::from(name),
            airports: airports.iter().map(|code| Arc::from(*code)).collect(),
        }
    }

    pub fn is_domestic(&self, code: &str) -> bool {
        self.airports.contains(code)
    }
}

impl Default for HomeCountry {
    fn default() -> Self {
        HomeCountry::new(
            "United Kingdom",
            &[
                "ABZ", "BFS", "BHD", "BHX", "BOH", "BRS", "CWL", "DSA", "EDI", "EMA", "EXT", "GLA",
                "INV", "JER", "GCI", "LBA", "LCY", "LGW", "LHR", "LPL", "LTN", "MAN", "NCL", "NQY",
                "NWI", "PIK", "SOU", "STN", "SEN", "MME",
            ],
        )
    }
}

impl fmt::Display for HomeCountry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} airports)", self.name, self.airports.len())
    }
}
