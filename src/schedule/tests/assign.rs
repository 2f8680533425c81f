use crate::catalog::Scenario;
use crate::crew::Rank;
use crate::error::MissingRole;
use crate::flight::{LegId, LegStatus};
use crate::resource::Resource;
use crate::schedule::tests::utils::{
    add_aircraft, add_cabin_crew_pool, add_pilot, add_route, date, forecast, id, monday, run,
    scenario,
};
use chrono::Weekday::Mon;
use std::sync::Arc;

#[test]
fn test_single_leg_is_completed() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 4, "MAN");
    add_pilot(&mut pilots, "Ada Byrne", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Tom Hale", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 4, "MAN", &["A320"]);
    add_route(&mut routes, 1001, Mon, "MAN", "07:00", "CDG", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(1, ledger.legs().len());
    assert_eq!(LegStatus::Completed, ledger.leg(LegId(0)).status);
    assert_eq!(id("G-EZAA"), ledger.aircraft_for(LegId(0)).unwrap().tail_code);
    assert_eq!(id("Ada Byrne"), ledger.captain_of(LegId(0)).unwrap().name);
    assert_eq!(id("Tom Hale"), ledger.first_officer_of(LegId(0)).unwrap().name);
    assert_eq!(4, ledger.cabin_crew_of(LegId(0)).len());
    assert_eq!(
        vec![LegId(0)],
        ledger.duty_history(&scenario.pilots[0].key()).to_vec()
    );
}

#[test]
fn test_single_aircraft_cannot_fly_overlapping_legs() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 4, "MAN");
    add_pilot(&mut pilots, "Captain 1", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Captain 2", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer 1", Rank::FirstOfficer, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer 2", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 8, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 120);
    add_route(&mut routes, 2, Mon, "MAN", "08:00", "EDI", 60);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(LegStatus::Completed, ledger.leg(LegId(0)).status);
    assert_eq!(LegStatus::Failed, ledger.leg(LegId(1)).status);
    assert_eq!(vec![MissingRole::Aircraft], ledger.missing_roles(LegId(1)));
    assert_eq!(id("Captain 2"), ledger.captain_of(LegId(1)).unwrap().name);

    let summary = ledger.summary();
    assert_eq!(1, summary.completed);
    assert_eq!(1, summary.failed);
}

#[test]
fn test_inverted_legs_are_never_staffed() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 2, "MAN");
    add_pilot(&mut pilots, "Captain", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 2, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", -60);
    add_route(&mut routes, 2, Mon, "MAN", "07:00", "EDI", -60);
    // built by hand, the loader would reject these routes
    let mut scenario = Scenario::default();
    scenario.aircraft = aircraft.into_iter().map(Arc::new).collect();
    scenario.pilots = pilots.into_iter().map(Arc::new).collect();
    scenario.cabin_crew = cabin_crew.into_iter().map(Arc::new).collect();
    scenario.routes = routes.into_iter().map(Arc::new).collect();

    let ledger = run(&scenario, monday(), monday());

    assert!(ledger.legs().is_empty());
}

#[test]
fn test_unqualified_pilots_still_fly() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 2, "MAN");
    add_pilot(&mut pilots, "Captain", Rank::Captain, "MAN", &["B737"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &[]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 2, "MAN", &["B737"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(LegStatus::Completed, ledger.leg(LegId(0)).status);
    assert_eq!(id("Captain"), ledger.captain_of(LegId(0)).unwrap().name);
    assert_eq!(id("Officer"), ledger.first_officer_of(LegId(0)).unwrap().name);
}

#[test]
fn test_short_cabin_crew_pool_fails_every_leg() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 4, "MAN");
    add_pilot(&mut pilots, "Captain", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 3, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), date("2020-07-13"));

    assert_eq!(2, ledger.legs().len());
    for leg in ledger.legs() {
        assert_eq!(LegStatus::Failed, leg.status);
        assert_eq!(
            vec![MissingRole::CabinCrew {
                bound: 3,
                required: 4
            }],
            ledger.missing_roles(leg.id)
        );
    }
    assert!(ledger.completed_allocations().is_empty());
}

#[test]
fn test_empty_route_catalog() {
    let mut aircraft = vec![];
    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 4, "MAN");
    let scenario = scenario(aircraft, vec![], vec![], vec![], vec![]);

    let ledger = run(&scenario, monday(), date("2020-07-31"));

    assert!(ledger.legs().is_empty());
}

#[test]
fn test_qualified_pilot_preferred() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 2, "MAN");
    add_pilot(&mut pilots, "Unrated", Rank::Captain, "MAN", &["B737"]);
    add_pilot(&mut pilots, "Rated", Rank::Captain, "CDG", &["A320"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 2, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(id("Rated"), ledger.captain_of(LegId(0)).unwrap().name);
}

#[test]
fn test_first_candidate_wins_ties() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-AAAA", "A320", 180, 2, "MAN");
    add_aircraft(&mut aircraft, "G-BBBB", "A320", 180, 2, "MAN");
    add_pilot(&mut pilots, "Captain 1", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Captain 2", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer 1", Rank::FirstOfficer, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer 2", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 4, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(id("G-AAAA"), ledger.aircraft_for(LegId(0)).unwrap().tail_code);
    assert_eq!(id("Captain 1"), ledger.captain_of(LegId(0)).unwrap().name);
    assert_eq!(id("Officer 1"), ledger.first_officer_of(LegId(0)).unwrap().name);
    let names = ledger
        .cabin_crew_of(LegId(0))
        .iter()
        .map(|c| c.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(vec![id("Cabin 1"), id("Cabin 2")], names);
}

#[test]
fn test_aircraft_at_departure_airport_preferred() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EDIN", "A320", 180, 2, "EDI");
    add_aircraft(&mut aircraft, "G-MANC", "A320", 180, 2, "MAN");
    add_pilot(&mut pilots, "Captain", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 2, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(id("G-MANC"), ledger.aircraft_for(LegId(0)).unwrap().tail_code);
}

#[test]
fn test_closest_capacity_fit_preferred() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-WIDE", "A320", 300, 2, "MAN");
    add_aircraft(&mut aircraft, "G-SMAL", "A320", 140, 2, "MAN");
    add_aircraft(&mut aircraft, "G-SNUG", "A320", 160, 2, "MAN");
    add_pilot(&mut pilots, "Captain", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 2, "MAN", &["A320"]);
    add_route(&mut routes, 7, Mon, "MAN", "07:00", "CDG", 90);
    let forecasts = vec![forecast(7, monday(), 150)];
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, forecasts);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(id("G-SNUG"), ledger.aircraft_for(LegId(0)).unwrap().tail_code);
}

#[test]
fn test_aircraft_follows_its_own_arrival() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-AAAA", "A320", 180, 2, "MAN");
    add_aircraft(&mut aircraft, "G-BBBB", "A320", 180, 2, "EDI");
    add_pilot(&mut pilots, "Captain", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 2, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 90);
    add_route(&mut routes, 2, Mon, "CDG", "12:00", "MAN", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(2, ledger.summary().completed);
    assert_eq!(
        vec![LegId(0), LegId(1)],
        ledger.duty_history(&scenario.aircraft[0].key()).to_vec()
    );
    assert!(ledger.duty_history(&scenario.aircraft[1].key()).is_empty());
}

#[test]
fn test_booked_captain_leaves_overlapping_leg_short() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-AAAA", "A320", 180, 4, "MAN");
    add_aircraft(&mut aircraft, "G-BBBB", "A320", 180, 4, "MAN");
    add_pilot(&mut pilots, "Captain", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer 1", Rank::FirstOfficer, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Officer 2", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 8, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 120);
    add_route(&mut routes, 2, Mon, "MAN", "08:00", "EDI", 60);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(LegStatus::Completed, ledger.leg(LegId(0)).status);
    assert_eq!(vec![MissingRole::Captain], ledger.missing_roles(LegId(1)));
    assert_eq!(id("G-BBBB"), ledger.aircraft_for(LegId(1)).unwrap().tail_code);
    assert_eq!(4, ledger.cabin_crew_of(LegId(1)).len());
}

#[test]
fn test_rested_captain_preferred_over_one_just_landed() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-EZAA", "A320", 180, 2, "MAN");
    add_pilot(&mut pilots, "Manchester", Rank::Captain, "MAN", &["A320"]);
    add_pilot(&mut pilots, "Edinburgh", Rank::Captain, "EDI", &["A320"]);
    add_pilot(&mut pilots, "Officer", Rank::FirstOfficer, "MAN", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Cabin ", 2, "MAN", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "EDI", 60);
    add_route(&mut routes, 2, Mon, "EDI", "10:00", "MAN", 60);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let ledger = run(&scenario, monday(), monday());

    assert_eq!(id("Manchester"), ledger.captain_of(LegId(0)).unwrap().name);
    assert_eq!(id("Edinburgh"), ledger.captain_of(LegId(1)).unwrap().name);
    assert_eq!(id("Officer"), ledger.first_officer_of(LegId(1)).unwrap().name);
    assert_eq!(2, ledger.summary().completed);
}

#[test]
fn test_determinism() {
    let mut aircraft = vec![];
    let mut pilots = vec![];
    let mut cabin_crew = vec![];
    let mut routes = vec![];

    add_aircraft(&mut aircraft, "G-AAAA", "A319", 156, 3, "MAN");
    add_aircraft(&mut aircraft, "G-BBBB", "A320", 180, 4, "EDI");
    add_pilot(&mut pilots, "Captain 1", Rank::Captain, "MAN", &["A319"]);
    add_pilot(&mut pilots, "Captain 2", Rank::Captain, "EDI", &["A320"]);
    add_pilot(&mut pilots, "Officer 1", Rank::FirstOfficer, "MAN", &["A319", "A320"]);
    add_pilot(&mut pilots, "Officer 2", Rank::FirstOfficer, "EDI", &["A320"]);
    add_cabin_crew_pool(&mut cabin_crew, "Man ", 4, "MAN", &["A319"]);
    add_cabin_crew_pool(&mut cabin_crew, "Edi ", 4, "EDI", &["A320"]);
    add_route(&mut routes, 1, Mon, "MAN", "07:00", "CDG", 90);
    add_route(&mut routes, 2, Mon, "EDI", "07:30", "MAN", 60);
    add_route(&mut routes, 3, Mon, "CDG", "10:00", "MAN", 90);
    let scenario = scenario(aircraft, pilots, cabin_crew, routes, vec![]);

    let first = run(&scenario, monday(), date("2020-07-27"));
    let second = run(&scenario, monday(), date("2020-07-27"));

    assert_eq!(first.summary(), second.summary());
    for leg in first.legs() {
        assert_eq!(leg.status, second.leg(leg.id).status);
        assert_eq!(first.allocation(leg.id), second.allocation(leg.id));
    }
}
