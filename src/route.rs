use crate::airport::AirportCode;
use chrono::{NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type FlightNumber = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub flight_number: FlightNumber,
    pub day_of_week: Weekday,
    pub departure_airport: AirportCode,
    pub departure_time: NaiveTime,
    pub arrival_airport: AirportCode,
    pub arrival_time: NaiveTime,
    pub duration_minutes: i64,
}

/// Longest block time a single leg may have.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

impl Route {
    /// Scheduled block time, `None` unless positive and representable.
    pub fn duration(&self) -> Option<TimeDelta> {
        TimeDelta::try_minutes(self.duration_minutes).filter(|d| *d > TimeDelta::zero())
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.duration_minutes <= 0 {
            return Err("duration must be positive");
        }
        if self.duration_minutes > MAX_DURATION_MINUTES {
            return Err("duration exceeds 24 hours");
        }
        Ok(())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{}",
            self.flight_number, self.day_of_week, self.departure_airport, self.arrival_airport
        )
    }
}
