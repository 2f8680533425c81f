use crate::aircraft::{Aircraft, Manufacturer};
use crate::catalog::{ForecastEntry, Scenario};
use crate::config::SchedulerConfig;
use crate::crew::{CabinCrew, Pilot, Rank};
use crate::route::Route;
use crate::schedule::engine::Scheduler;
use crate::schedule::ledger::Ledger;
use chrono::{NaiveDate, NaiveTime, TimeDelta, Weekday};
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Monday 6 July 2020.
pub fn monday() -> NaiveDate {
    date("2020-07-06")
}

pub fn add_aircraft(
    aircraft: &mut Vec<Aircraft>,
    tail_code: &str,
    type_code: &str,
    seats: u32,
    cabin_crew_required: usize,
    starting_location: &str,
) {
    aircraft.push(Aircraft {
        tail_code: id(tail_code),
        type_code: id(type_code),
        manufacturer: Manufacturer::Airbus,
        model: id(type_code),
        seats,
        cabin_crew_required,
        starting_location: id(starting_location),
    });
}

pub fn add_pilot(
    pilots: &mut Vec<Pilot>,
    name: &str,
    rank: Rank,
    home_base: &str,
    type_ratings: &[&str],
) {
    pilots.push(Pilot {
        name: id(name),
        rank,
        home_base: id(home_base),
        type_ratings: type_ratings.iter().map(|t| id(t)).collect(),
    });
}

pub fn add_cabin_crew(
    cabin_crew: &mut Vec<CabinCrew>,
    name: &str,
    home_base: &str,
    type_ratings: &[&str],
) {
    cabin_crew.push(CabinCrew {
        name: id(name),
        home_base: id(home_base),
        type_ratings: type_ratings.iter().map(|t| id(t)).collect(),
    });
}

/// Adds `count` cabin crew named `{prefix}{n}`.
pub fn add_cabin_crew_pool(
    cabin_crew: &mut Vec<CabinCrew>,
    prefix: &str,
    count: usize,
    home_base: &str,
    type_ratings: &[&str],
) {
    for n in 1..=count {
        add_cabin_crew(cabin_crew, &format!("{}{}", prefix, n), home_base, type_ratings);
    }
}

pub fn add_route(
    routes: &mut Vec<Route>,
    flight_number: u32,
    day_of_week: Weekday,
    departure_airport: &str,
    departure_time: &str,
    arrival_airport: &str,
    duration_minutes: i64,
) {
    let departure_time = NaiveTime::parse_from_str(departure_time, "%H:%M").unwrap();
    routes.push(Route {
        flight_number,
        day_of_week,
        departure_airport: id(departure_airport),
        departure_time,
        arrival_airport: id(arrival_airport),
        arrival_time: departure_time + TimeDelta::minutes(duration_minutes),
        duration_minutes,
    });
}

pub fn forecast(flight_number: u32, date: NaiveDate, passengers: u32) -> ForecastEntry {
    ForecastEntry {
        flight_number,
        date,
        passengers,
    }
}

pub fn ledger(routes: Vec<Route>, start: NaiveDate, end: NaiveDate) -> Ledger {
    let routes = routes.into_iter().map(Arc::new).collect::<Vec<_>>();
    Ledger::new(&routes, start, end)
}

pub fn scenario(
    aircraft: Vec<Aircraft>,
    pilots: Vec<Pilot>,
    cabin_crew: Vec<CabinCrew>,
    routes: Vec<Route>,
    forecasts: Vec<ForecastEntry>,
) -> Scenario {
    Scenario::new(aircraft, pilots, cabin_crew, routes, forecasts).unwrap()
}

pub fn run(scenario: &Scenario, start: NaiveDate, end: NaiveDate) -> Ledger {
    run_with(SchedulerConfig::default(), scenario, start, end)
}

pub fn run_with(
    config: SchedulerConfig,
    scenario: &Scenario,
    start: NaiveDate,
    end: NaiveDate,
) -> Ledger {
    Scheduler::new(config).generate_schedule(scenario, scenario, scenario, scenario, start, end)
}

pub fn arb_airport() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("MAN"), Just("EDI"), Just("CDG")]
}

pub fn arb_type_code() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("A319"), Just("A320")]
}

pub fn arb_weekday() -> impl Strategy<Value = Weekday> {
    prop_oneof![
        Just(Weekday::Mon),
        Just(Weekday::Tue),
        Just(Weekday::Wed),
        Just(Weekday::Sun)
    ]
}

pub fn arb_rank() -> impl Strategy<Value = Rank> {
    prop_oneof![Just(Rank::Captain), Just(Rank::FirstOfficer)]
}

pub fn arb_route(flight_number: u32) -> impl Strategy<Value = Route> {
    (arb_weekday(), arb_airport(), 0u32..22, 0u32..4, arb_airport(), 30i64..300).prop_map(
        move |(day, from, hour, quarter, to, duration)| {
            let mut routes = vec![];
            let time = format!("{:02}:{:02}", hour, quarter * 15);
            add_route(&mut routes, flight_number, day, from, &time, to, duration);
            routes.remove(0)
        },
    )
}
