use crate::aircraft::Aircraft;
use crate::airport::AirportCode;
use crate::config::{SchedulerConfig, Score};
use crate::crew::{CabinCrew, Crew, Pilot, Rank};
use crate::flight::{FlightLeg, LegId};
use crate::resource::{Resource, ResourceKey};
use crate::schedule::ledger::Ledger;
use crate::time::TimeRange;
use chrono::{NaiveDateTime, TimeDelta};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub candidate: T,
    pub score: Score,
}

/// What the duty history says about one crew member with respect to one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewFacts {
    pub qualified: bool,
    pub home_base: AirportCode,
    pub location: AirportCode,
    pub last_landing: Option<(AirportCode, NaiveDateTime)>,
    pub minutes_this_month: i64,
    pub weekly_rest: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AircraftFacts {
    pub seats: u32,
    pub location: AirportCode,
    pub passengers: Option<u32>,
}

type CrewFactor = fn(&SchedulerConfig, &CrewFacts, &FlightLeg) -> Score;
type AircraftFactor = fn(&SchedulerConfig, &AircraftFacts, &FlightLeg) -> Score;

const CREW_FACTORS: [(&str, CrewFactor); 6] = [
    ("qualification", qualification),
    ("continuity", continuity),
    ("rest", rest),
    ("monthly_hours", monthly_hours),
    ("weekly_rest", weekly_rest),
    ("outward", outward),
];

const AIRCRAFT_FACTORS: [(&str, AircraftFactor); 2] = [
    ("capacity", capacity),
    ("position", position),
];

pub(crate) fn qualification(config: &SchedulerConfig, facts: &CrewFacts, _: &FlightLeg) -> Score {
    if facts.qualified {
        config.weights.qualification
    } else {
        0
    }
}

pub(crate) fn continuity(config: &SchedulerConfig, facts: &CrewFacts, leg: &FlightLeg) -> Score {
    if facts.location == *leg.departure_airport() {
        return config.weights.continuity;
    }
    match &facts.last_landing {
        Some((_, landed))
            if leg.departure - *landed >= TimeDelta::hours(config.rest.repositioning_hours) =>
        {
            config.weights.repositioning
        }
        _ => 0,
    }
}

pub(crate) fn rest(config: &SchedulerConfig, facts: &CrewFacts, leg: &FlightLeg) -> Score {
    let departure = leg.departure_airport();
    let home = &config.home_country;
    if !home.is_domestic(&facts.location) && !home.is_domestic(departure) {
        return 0;
    }

    let (min_hours, points) = if facts.home_base == *departure {
        (config.rest.min_rest_home_hours, config.weights.rest_at_home)
    } else {
        (config.rest.min_rest_away_hours, config.weights.rest_away)
    };
    match &facts.last_landing {
        Some((_, landed)) if leg.departure - *landed <= TimeDelta::hours(min_hours) => 0,
        _ => points,
    }
}

pub(crate) fn monthly_hours(config: &SchedulerConfig, facts: &CrewFacts, _: &FlightLeg) -> Score {
    let cap = config.rest.monthly_cap_minutes;
    if cap <= 0 || facts.minutes_this_month >= cap {
        return 0;
    }
    let remaining = (cap - facts.minutes_this_month.max(0)) as u64;
    config.weights.monthly_hours * remaining / cap as u64
}

pub(crate) fn weekly_rest(config: &SchedulerConfig, facts: &CrewFacts, _: &FlightLeg) -> Score {
    if facts.weekly_rest {
        config.weights.weekly_rest
    } else {
        0
    }
}

pub(crate) fn outward(config: &SchedulerConfig, facts: &CrewFacts, leg: &FlightLeg) -> Score {
    if facts.location != facts.home_base && *leg.arrival_airport() != facts.home_base {
        config.weights.outward
    } else {
        0
    }
}

pub(crate) fn capacity(config: &SchedulerConfig, facts: &AircraftFacts, _: &FlightLeg) -> Score {
    let w = &config.weights;
    match facts.passengers {
        Some(passengers) if facts.seats >= passengers => {
            let excess = (facts.seats - passengers) as u64;
            w.aircraft_capacity
                .saturating_sub(excess * w.excess_seat_penalty)
        }
        Some(_) => (facts.seats as u64 * w.underfit_seat_points).min(w.aircraft_capacity),
        None => w.aircraft_capacity / 2,
    }
}

pub(crate) fn position(config: &SchedulerConfig, facts: &AircraftFacts, leg: &FlightLeg) -> Score {
    if facts.location == *leg.departure_airport() {
        config.weights.aircraft_position
    } else {
        0
    }
}

/// First candidate reaching the highest score wins.
fn first_best<T>(candidates: impl Iterator<Item = Scored<T>>) -> Option<Scored<T>> {
    candidates.fold(None, |best, next| match best {
        Some(b) if next.score <= b.score => Some(b),
        _ => Some(next),
    })
}

/// Read-only view over the ledger that ranks candidates for a leg.
pub struct CandidateScorer<'a> {
    ledger: &'a Ledger,
    config: &'a SchedulerConfig,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(ledger: &'a Ledger, config: &'a SchedulerConfig) -> Self {
        CandidateScorer { ledger, config }
    }

    fn is_eligible(&self, resource: &impl Resource, leg: LegId) -> bool {
        let key = resource.key();
        !self.ledger.allocation(leg).holds(&key) && !self.ledger.has_conflict(resource, leg)
    }

    fn minutes_in_month(&self, key: &ResourceKey, leg: &FlightLeg) -> i64 {
        let window = TimeRange::month_window(self.ledger.start(), leg.departure);
        self.ledger
            .duty_history(key)
            .iter()
            .map(|id| self.ledger.leg(*id))
            .filter(|l| window.contains(l.departure))
            .map(|l| l.duration_minutes())
            .sum()
    }

    fn has_weekly_rest(&self, key: &ResourceKey, leg: &FlightLeg) -> bool {
        let window = TimeRange::day_window(self.ledger.start(), 7, leg.departure);
        let threshold = TimeDelta::hours(self.config.rest.weekly_rest_hours);

        let mut busy = self
            .ledger
            .duty_history(key)
            .iter()
            .map(|id| self.ledger.leg(*id))
            .filter(|l| window.contains(l.departure))
            .map(|l| l.time_range())
            .chain(std::iter::once(leg.time_range()))
            .collect::<Vec<TimeRange>>();
        busy.sort_by_key(|r| r.start);

        let mut free_since = window.start;
        for range in busy {
            if range.start - free_since >= threshold {
                return true;
            }
            free_since = free_since.max(range.end);
        }
        false
    }

    pub fn crew_facts<C: Crew + Resource>(&self, crew: &C, leg: &FlightLeg) -> CrewFacts {
        let key = crew.key();
        let last_landing = self
            .ledger
            .previous_duty(&key, leg.departure)
            .map(|l| (l.arrival_airport().clone(), l.arrival));
        let location = last_landing
            .as_ref()
            .map(|(airport, _)| airport.clone())
            .unwrap_or_else(|| crew.home_base().clone());
        let qualified = self
            .ledger
            .aircraft_for(leg.id)
            .is_some_and(|a| crew.is_qualified_for(&a.type_code));

        CrewFacts {
            qualified,
            home_base: crew.home_base().clone(),
            location,
            last_landing,
            minutes_this_month: self.minutes_in_month(&key, leg),
            weekly_rest: self.has_weekly_rest(&key, leg),
        }
    }

    pub fn aircraft_facts(
        &self,
        aircraft: &Aircraft,
        leg: &FlightLeg,
        passengers: Option<u32>,
    ) -> AircraftFacts {
        AircraftFacts {
            seats: aircraft.seats,
            location: self.ledger.location_at(
                &aircraft.key(),
                &aircraft.starting_location,
                leg.departure,
            ),
            passengers,
        }
    }

    pub fn score_crew(&self, facts: &CrewFacts, leg: &FlightLeg) -> Score {
        CREW_FACTORS.iter().fold(0, |total, (name, factor)| {
            let points = factor(self.config, facts, leg);
            trace!(factor = *name, points, "crew factor");
            total + points
        })
    }

    pub fn score_aircraft(&self, facts: &AircraftFacts, leg: &FlightLeg) -> Score {
        AIRCRAFT_FACTORS.iter().fold(0, |total, (name, factor)| {
            let points = factor(self.config, facts, leg);
            trace!(factor = *name, points, "aircraft factor");
            total + points
        })
    }

    pub fn best_aircraft(
        &self,
        fleet: &[Arc<Aircraft>],
        leg: LegId,
        passengers: Option<u32>,
    ) -> Option<Scored<Arc<Aircraft>>> {
        let flight = self.ledger.leg(leg);
        first_best(
            fleet
                .iter()
                .filter(|a| self.is_eligible(*a, leg))
                .map(|a| Scored {
                    candidate: a.clone(),
                    score: self.score_aircraft(&self.aircraft_facts(a, flight, passengers), flight),
                }),
        )
    }

    pub fn best_pilot(
        &self,
        pilots: &[Arc<Pilot>],
        leg: LegId,
        rank: Rank,
    ) -> Option<Scored<Arc<Pilot>>> {
        let flight = self.ledger.leg(leg);
        first_best(
            pilots
                .iter()
                .filter(|p| p.rank == rank)
                .filter(|p| self.is_eligible(*p, leg))
                .map(|p| Scored {
                    candidate: p.clone(),
                    score: self.score_crew(&self.crew_facts(&**p, flight), flight),
                }),
        )
    }

    /// Eligible cabin crew, best first; equal scores keep roster order.
    pub fn rank_cabin_crew(
        &self,
        cabin_crew: &[Arc<CabinCrew>],
        leg: LegId,
    ) -> Vec<Scored<Arc<CabinCrew>>> {
        let flight = self.ledger.leg(leg);
        let mut ranked = cabin_crew
            .iter()
            .filter(|c| self.is_eligible(*c, leg))
            .map(|c| Scored {
                candidate: c.clone(),
                score: self.score_crew(&self.crew_facts(&**c, flight), flight),
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }
}
