use crate::aircraft::Aircraft;
use crate::catalog::{AircraftCatalog, CrewRoster, PassengerForecast, RouteCatalog};
use crate::config::SchedulerConfig;
use crate::crew::{CabinCrew, Pilot, Rank};
use crate::error::AllocationError;
use crate::flight::{LegId, LegStatus};
use crate::schedule::ledger::Ledger;
use crate::schedule::scorer::CandidateScorer;
use chrono::{NaiveDate, TimeDelta};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

struct Snapshot {
    fleet: Vec<Arc<Aircraft>>,
    pilots: Vec<Arc<Pilot>>,
    cabin_crew: Vec<Arc<CabinCrew>>,
}

/// Pairs each outbound leg with the first free leg departing from its arrival
/// airport within `max_turnaround` of landing. Keys are outbound legs.
pub fn link_return_legs(ledger: &Ledger, max_turnaround: TimeDelta) -> BTreeMap<LegId, LegId> {
    let mut pairs = BTreeMap::new();
    let mut linked = HashSet::new();

    for outbound in ledger.legs() {
        if linked.contains(&outbound.id) {
            continue;
        }
        let found = ledger
            .legs()
            .iter()
            .filter(|l| l.id != outbound.id && !linked.contains(&l.id))
            .filter(|l| l.departure_airport() == outbound.arrival_airport())
            .find(|l| {
                l.departure >= outbound.arrival && l.departure - outbound.arrival <= max_turnaround
            })
            .map(|l| l.id);

        if let Some(ret) = found {
            linked.insert(outbound.id);
            linked.insert(ret);
            pairs.insert(outbound.id, ret);
        }
    }
    pairs
}

pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Scheduler {
        Scheduler { config }
    }

    /// Runs one greedy pass over every leg in expansion order. Never fails:
    /// legs that cannot be fully staffed are left `Failed` in the ledger.
    #[instrument(skip_all, fields(%start, %end))]
    pub fn generate_schedule(
        &self,
        aircraft: &impl AircraftCatalog,
        crew: &impl CrewRoster,
        routes: &impl RouteCatalog,
        passengers: &impl PassengerForecast,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Ledger {
        let snapshot = Snapshot {
            fleet: aircraft.all_aircraft(),
            pilots: crew.all_pilots(),
            cabin_crew: crew.all_cabin_crew(),
        };
        let mut ledger = Ledger::new(&routes.all_routes(), start, end)
            .with_cabin_crew_policy(self.config.cabin_crew_policy);

        info!(
            legs = ledger.legs().len(),
            aircraft = snapshot.fleet.len(),
            pilots = snapshot.pilots.len(),
            cabin_crew = snapshot.cabin_crew.len(),
            "Scheduling started"
        );

        let pairs = if self.config.pairing.enabled {
            link_return_legs(
                &ledger,
                TimeDelta::minutes(self.config.pairing.max_turnaround_minutes),
            )
        } else {
            BTreeMap::new()
        };
        let returns = pairs.values().copied().collect::<HashSet<LegId>>();
        if !pairs.is_empty() {
            info!(pairs = pairs.len(), "Linked return legs");
        }

        let order = ledger.legs().iter().map(|l| l.id).collect::<Vec<LegId>>();
        for leg in order {
            if returns.contains(&leg) {
                continue;
            }
            self.process_leg(&mut ledger, &snapshot, passengers, leg);

            if let Some(ret) = pairs.get(&leg).copied() {
                if ledger.leg(leg).status == LegStatus::Completed {
                    Self::copy_allocation(&mut ledger, leg, ret);
                }
                self.process_leg(&mut ledger, &snapshot, passengers, ret);
            }
        }

        ledger.assert_invariants();
        let summary = ledger.summary();
        info!(
            completed = summary.completed,
            failed = summary.failed,
            "Scheduling finished"
        );
        ledger
    }

    #[instrument(level = "debug", skip_all, fields(leg = %leg))]
    fn process_leg(
        &self,
        ledger: &mut Ledger,
        snapshot: &Snapshot,
        passengers: &impl PassengerForecast,
        leg: LegId,
    ) {
        self.staff_leg(ledger, snapshot, passengers, leg);
        if let Err(error) = ledger.complete_allocation_for(leg) {
            Self::report_incomplete(ledger, leg, &error);
        }
    }

    /// Fills every role still empty on `leg`, in seat order.
    fn staff_leg(
        &self,
        ledger: &mut Ledger,
        snapshot: &Snapshot,
        passengers: &impl PassengerForecast,
        leg: LegId,
    ) {
        if ledger.aircraft_for(leg).is_none() {
            let flight = ledger.leg(leg);
            let forecast = passengers.lookup(flight.flight_number(), flight.date);
            let choice = CandidateScorer::new(ledger, &self.config).best_aircraft(
                &snapshot.fleet,
                leg,
                forecast,
            );
            match choice {
                Some(best) => {
                    debug!(
                        aircraft = %best.candidate.tail_code,
                        score = best.score,
                        ?forecast,
                        "Aircraft selected"
                    );
                    let result = ledger.allocate_aircraft_to(best.candidate, leg);
                    Self::log_refusal(leg, "aircraft", result);
                }
                None => debug!("No aircraft available"),
            }
        }

        for rank in [Rank::Captain, Rank::FirstOfficer] {
            let seated = match rank {
                Rank::Captain => ledger.captain_of(leg).is_some(),
                Rank::FirstOfficer => ledger.first_officer_of(leg).is_some(),
            };
            if seated {
                continue;
            }
            let choice =
                CandidateScorer::new(ledger, &self.config).best_pilot(&snapshot.pilots, leg, rank);
            let Some(best) = choice else {
                debug!(%rank, "No pilot available");
                continue;
            };
            debug!(%rank, pilot = %best.candidate.name, score = best.score, "Pilot selected");
            let result = match rank {
                Rank::Captain => ledger.allocate_captain_to(best.candidate, leg),
                Rank::FirstOfficer => ledger.allocate_first_officer_to(best.candidate, leg),
            };
            Self::log_refusal(leg, "pilot", result);
        }

        let required = ledger.aircraft_for(leg).map_or(0, |a| a.cabin_crew_required);
        if ledger.cabin_crew_of(leg).len() < required {
            let ranked = CandidateScorer::new(ledger, &self.config)
                .rank_cabin_crew(&snapshot.cabin_crew, leg);
            for member in ranked {
                if ledger.cabin_crew_of(leg).len() >= required {
                    break;
                }
                debug!(
                    member = %member.candidate.name,
                    score = member.score,
                    "Cabin crew selected"
                );
                let result = ledger.allocate_cabin_crew_to(member.candidate, leg);
                Self::log_refusal(leg, "cabin crew", result);
            }
        }
    }

    /// Carries the outbound crew and aircraft over to its return leg.
    fn copy_allocation(ledger: &mut Ledger, from: LegId, to: LegId) {
        let source = ledger.allocation(from).clone();
        debug!(%from, %to, "Copying allocation to return leg");

        if let Some(aircraft) = source.aircraft {
            Self::log_refusal(to, "aircraft", ledger.allocate_aircraft_to(aircraft, to));
        }
        if let Some(captain) = source.captain {
            Self::log_refusal(to, "pilot", ledger.allocate_captain_to(captain, to));
        }
        if let Some(first_officer) = source.first_officer {
            let result = ledger.allocate_first_officer_to(first_officer, to);
            Self::log_refusal(to, "pilot", result);
        }
        for member in source.cabin_crew {
            Self::log_refusal(to, "cabin crew", ledger.allocate_cabin_crew_to(member, to));
        }
    }

    fn log_refusal(leg: LegId, role: &'static str, result: Result<(), AllocationError>) {
        if let Err(error) = result {
            warn!(%leg, role, %error, "Allocation refused, role left unfilled");
        }
    }

    fn report_incomplete(ledger: &Ledger, leg: LegId, error: &AllocationError) {
        let name = |n: Option<String>| n.unwrap_or_else(|| "-".to_string());
        let cabin_crew = ledger
            .cabin_crew_of(leg)
            .iter()
            .map(|c| c.name.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        warn!(
            leg = %ledger.leg(leg),
            aircraft = %name(ledger.aircraft_for(leg).map(|a| a.tail_code.to_string())),
            captain = %name(ledger.captain_of(leg).map(|p| p.name.to_string())),
            first_officer = %name(ledger.first_officer_of(leg).map(|p| p.name.to_string())),
            %cabin_crew,
            required = ledger.aircraft_for(leg).map_or(0, |a| a.cabin_crew_required),
            %error,
            "Leg left incomplete"
        );
    }
}
