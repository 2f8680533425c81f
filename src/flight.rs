use crate::airport::AirportCode;
use crate::route::{FlightNumber, Route};
use crate::time::TimeRange;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LegId(pub usize);

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegStatus {
    Pending,
    PartiallyAllocated,
    Completed,
    Failed,
}

impl LegStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, LegStatus::Completed | LegStatus::Failed)
    }
}

impl fmt::Display for LegStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegStatus::Pending => write!(f, "Pending"),
            LegStatus::PartiallyAllocated => write!(f, "Partial"),
            LegStatus::Completed => write!(f, "Completed"),
            LegStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub id: LegId,
    pub route: Arc<Route>,
    pub date: NaiveDate,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub status: LegStatus,
}

impl FlightLeg {
    pub fn new(id: LegId, route: Arc<Route>, date: NaiveDate) -> Self {
        let departure = date.and_time(route.departure_time);
        // expansion drops invalid routes; an unusable duration yields an empty range
        let arrival = route
            .duration()
            .and_then(|d| departure.checked_add_signed(d))
            .unwrap_or(departure);
        FlightLeg {
            id,
            route,
            date,
            departure,
            arrival,
            status: LegStatus::Pending,
        }
    }

    pub fn flight_number(&self) -> FlightNumber {
        self.route.flight_number
    }

    pub fn departure_airport(&self) -> &AirportCode {
        &self.route.departure_airport
    }

    pub fn arrival_airport(&self) -> &AirportCode {
        &self.route.arrival_airport
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.departure, self.arrival)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.arrival - self.departure).num_minutes()
    }
}

impl fmt::Display for FlightLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} flight {} {}-{} {}",
            self.id,
            self.flight_number(),
            self.departure_airport(),
            self.arrival_airport(),
            self.departure.format("%Y-%m-%d %H:%M")
        )
    }
}
