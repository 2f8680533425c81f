use crate::aircraft::Aircraft;
use crate::crew::{CabinCrew, Crew, Pilot};
use crate::error::LoadError;
use crate::route::{FlightNumber, Route};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

pub trait AircraftCatalog {
    fn all_aircraft(&self) -> Vec<Arc<Aircraft>>;

    fn find_by_min_seats(&self, seats: u32) -> Vec<Arc<Aircraft>> {
        self.all_aircraft()
            .into_iter()
            .filter(|a| a.seats >= seats)
            .collect()
    }

    fn find_by_starting_location(&self, code: &str) -> Vec<Arc<Aircraft>> {
        self.all_aircraft()
            .into_iter()
            .filter(|a| &*a.starting_location == code)
            .collect()
    }

    fn find_by_tail_code(&self, tail_code: &str) -> Option<Arc<Aircraft>> {
        self.all_aircraft()
            .into_iter()
            .find(|a| &*a.tail_code == tail_code)
    }
}

pub trait CrewRoster {
    fn all_pilots(&self) -> Vec<Arc<Pilot>>;
    fn all_cabin_crew(&self) -> Vec<Arc<CabinCrew>>;

    fn find_pilots_by_home_base(&self, code: &str) -> Vec<Arc<Pilot>> {
        self.all_pilots()
            .into_iter()
            .filter(|p| &**p.home_base() == code)
            .collect()
    }

    fn find_pilots_by_type_rating(&self, type_code: &str) -> Vec<Arc<Pilot>> {
        self.all_pilots()
            .into_iter()
            .filter(|p| p.is_qualified_for(type_code))
            .collect()
    }

    fn find_cabin_crew_by_home_base(&self, code: &str) -> Vec<Arc<CabinCrew>> {
        self.all_cabin_crew()
            .into_iter()
            .filter(|c| &**c.home_base() == code)
            .collect()
    }

    fn find_cabin_crew_by_type_rating(&self, type_code: &str) -> Vec<Arc<CabinCrew>> {
        self.all_cabin_crew()
            .into_iter()
            .filter(|c| c.is_qualified_for(type_code))
            .collect()
    }
}

pub trait RouteCatalog {
    fn all_routes(&self) -> Vec<Arc<Route>>;
}

pub trait PassengerForecast {
    /// Predicted passengers for a flight on a date, `None` when no data exists.
    fn lookup(&self, flight_number: FlightNumber, date: NaiveDate) -> Option<u32>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastEntry {
    pub flight_number: FlightNumber,
    pub date: NaiveDate,
    pub passengers: u32,
}

/// Every input snapshot the scheduler needs, held in memory.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub aircraft: Vec<Arc<Aircraft>>,
    pub pilots: Vec<Arc<Pilot>>,
    pub cabin_crew: Vec<Arc<CabinCrew>>,
    pub routes: Vec<Arc<Route>>,
    passengers: HashMap<(FlightNumber, NaiveDate), u32>,
}

impl Scenario {
    pub fn new(
        aircraft: Vec<Aircraft>,
        pilots: Vec<Pilot>,
        cabin_crew: Vec<CabinCrew>,
        routes: Vec<Route>,
        forecasts: Vec<ForecastEntry>,
    ) -> Result<Self, LoadError> {
        Self::ensure_unique("aircraft", aircraft.iter().map(|a| a.tail_code.to_string()))?;
        Self::ensure_unique("pilot", pilots.iter().map(|p| p.name.to_string()))?;
        Self::ensure_unique("cabin crew", cabin_crew.iter().map(|c| c.name.to_string()))?;
        for route in &routes {
            route.validate().map_err(|reason| LoadError::InvalidRoute {
                flight_number: route.flight_number,
                reason,
            })?;
        }

        // later entries overwrite earlier ones for the same flight and date
        let passengers = forecasts
            .into_iter()
            .map(|f| ((f.flight_number, f.date), f.passengers))
            .collect();

        Ok(Scenario {
            aircraft: aircraft.into_iter().map(Arc::new).collect(),
            pilots: pilots.into_iter().map(Arc::new).collect(),
            cabin_crew: cabin_crew.into_iter().map(Arc::new).collect(),
            routes: routes.into_iter().map(Arc::new).collect(),
            passengers,
        })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, LoadError> {
        #[derive(Deserialize)]
        struct RawData {
            #[serde(default)]
            aircraft: Vec<Aircraft>,
            #[serde(default)]
            pilots: Vec<Pilot>,
            #[serde(default)]
            cabin_crew: Vec<CabinCrew>,
            #[serde(default)]
            routes: Vec<Route>,
            #[serde(default)]
            passengers: Vec<ForecastEntry>,
        }
        let raw: RawData = serde_json::from_str(data)?;
        Scenario::new(
            raw.aircraft,
            raw.pilots,
            raw.cabin_crew,
            raw.routes,
            raw.passengers,
        )
    }

    fn ensure_unique(
        kind: &'static str,
        ids: impl Iterator<Item = String>,
    ) -> Result<(), LoadError> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id.clone()) {
                return Err(LoadError::Duplicate { kind, id });
            }
        }
        Ok(())
    }
}

impl AircraftCatalog for Scenario {
    fn all_aircraft(&self) -> Vec<Arc<Aircraft>> {
        self.aircraft.clone()
    }
}

impl CrewRoster for Scenario {
    fn all_pilots(&self) -> Vec<Arc<Pilot>> {
        self.pilots.clone()
    }

    fn all_cabin_crew(&self) -> Vec<Arc<CabinCrew>> {
        self.cabin_crew.clone()
    }
}

impl RouteCatalog for Scenario {
    fn all_routes(&self) -> Vec<Arc<Route>> {
        self.routes.clone()
    }
}

impl PassengerForecast for Scenario {
    fn lookup(&self, flight_number: FlightNumber, date: NaiveDate) -> Option<u32> {
        self.passengers.get(&(flight_number, date)).copied()
    }
}
