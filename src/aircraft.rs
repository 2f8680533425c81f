use crate::airport::AirportCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type TailCode = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Manufacturer {
    Airbus,
    Boeing,
    Bombardier,
    Embraer,
    Fokker,
    Atr,
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Manufacturer::Airbus => "Airbus",
            Manufacturer::Boeing => "Boeing",
            Manufacturer::Bombardier => "Bombardier",
            Manufacturer::Embraer => "Embraer",
            Manufacturer::Fokker => "Fokker",
            Manufacturer::Atr => "ATR",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub tail_code: TailCode,
    pub type_code: Arc<str>,
    pub manufacturer: Manufacturer,
    pub model: Arc<str>,
    pub seats: u32,
    pub cabin_crew_required: usize,
    pub starting_location: AirportCode,
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.tail_code, self.manufacturer, self.model)
    }
}
