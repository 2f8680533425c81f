use crate::aircraft::Aircraft;
use crate::airport::AirportCode;
use crate::config::CabinCrewPolicy;
use crate::crew::{CabinCrew, Pilot, Rank};
use crate::error::{AllocationError, MissingRole};
use crate::flight::{FlightLeg, LegId, LegStatus};
use crate::resource::{Resource, ResourceKey};
use crate::route::Route;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resources bound to one leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    pub aircraft: Option<Arc<Aircraft>>,
    pub captain: Option<Arc<Pilot>>,
    pub first_officer: Option<Arc<Pilot>>,
    pub cabin_crew: Vec<Arc<CabinCrew>>,
}

impl Allocation {
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.aircraft
            .iter()
            .map(|a| a.key())
            .chain(self.captain.iter().map(|p| p.key()))
            .chain(self.first_officer.iter().map(|p| p.key()))
            .chain(self.cabin_crew.iter().map(|c| c.key()))
            .collect()
    }

    pub fn holds(&self, key: &ResourceKey) -> bool {
        self.keys().iter().any(|k| k == key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSummary {
    pub legs: usize,
    pub pending: usize,
    pub partial: usize,
    pub completed: usize,
    pub failed: usize,
}

/// One leg per route and matching weekday in `[start, end]`, route-major.
/// Routes with an invalid duration are skipped.
pub fn expand(routes: &[Arc<Route>], start: NaiveDate, end: NaiveDate) -> Vec<FlightLeg> {
    let dates = start
        .iter_days()
        .take_while(|d| *d <= end)
        .collect::<Vec<NaiveDate>>();

    routes
        .iter()
        .filter(|route| match route.validate() {
            Ok(()) => true,
            Err(reason) => {
                warn!(flight_number = route.flight_number, reason, "Route skipped");
                false
            }
        })
        .flat_map(|route| {
            dates
                .iter()
                .filter(move |d| d.weekday() == route.day_of_week)
                .map(move |d| (route.clone(), *d))
        })
        .enumerate()
        .map(|(i, (route, date))| FlightLeg::new(LegId(i), route, date))
        .collect()
}

/// Authoritative allocation store for one scheduling run.
///
/// Leg ids handed to the ledger must come from [`Ledger::legs`]; the ledger
/// indexes by them directly.
pub struct Ledger {
    start: NaiveDate,
    end: NaiveDate,
    legs: Vec<FlightLeg>,
    allocations: Vec<Allocation>,
    bookings: HashMap<ResourceKey, Vec<LegId>>,
    duty: HashMap<ResourceKey, Vec<LegId>>,
    cabin_crew_policy: CabinCrewPolicy,
}

impl Ledger {
    pub fn new(routes: &[Arc<Route>], start: NaiveDate, end: NaiveDate) -> Ledger {
        let legs = expand(routes, start, end);
        let allocations = vec![Allocation::default(); legs.len()];
        Ledger {
            start,
            end,
            legs,
            allocations,
            bookings: HashMap::new(),
            duty: HashMap::new(),
            cabin_crew_policy: CabinCrewPolicy::default(),
        }
    }

    pub fn with_cabin_crew_policy(mut self, policy: CabinCrewPolicy) -> Ledger {
        self.cabin_crew_policy = policy;
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn legs(&self) -> &[FlightLeg] {
        &self.legs
    }

    pub fn leg(&self, leg: LegId) -> &FlightLeg {
        &self.legs[leg.0]
    }

    pub fn allocation(&self, leg: LegId) -> &Allocation {
        &self.allocations[leg.0]
    }

    pub fn has_conflict(&self, resource: &impl Resource, leg: LegId) -> bool {
        self.conflicting_leg(&resource.key(), leg).is_some()
    }

    fn conflicting_leg(&self, key: &ResourceKey, leg: LegId) -> Option<LegId> {
        let range = self.legs[leg.0].time_range();
        self.bookings.get(key)?.iter().copied().find(|other| {
            *other != leg && self.legs[other.0].time_range().is_overlapping(&range)
        })
    }

    fn ensure_bookable(&self, key: &ResourceKey, leg: LegId) -> Result<(), AllocationError> {
        if self.legs[leg.0].status.is_closed() {
            return Err(AllocationError::LegClosed { leg });
        }
        // one resource, one seat per leg
        if self.allocations[leg.0].holds(key) {
            return Err(AllocationError::DoubleBooked {
                resource: key.clone(),
                leg,
                conflicting: leg,
            });
        }
        match self.conflicting_leg(key, leg) {
            Some(conflicting) => Err(AllocationError::DoubleBooked {
                resource: key.clone(),
                leg,
                conflicting,
            }),
            None => Ok(()),
        }
    }

    fn book(&mut self, key: ResourceKey, leg: LegId) {
        trace!(%key, %leg, "Booked");
        self.bookings.entry(key).or_default().push(leg);
        self.legs[leg.0].status = LegStatus::PartiallyAllocated;
    }

    fn release(&mut self, key: &ResourceKey, leg: LegId) {
        if let Some(legs) = self.bookings.get_mut(key) {
            legs.retain(|l| *l != leg);
        }
    }

    fn bind_seat<T: Resource>(
        &mut self,
        resource: Arc<T>,
        leg: LegId,
        seat: fn(&mut Allocation) -> &mut Option<Arc<T>>,
    ) -> Result<(), AllocationError> {
        let key = resource.key();
        self.ensure_bookable(&key, leg)?;
        if let Some(previous) = seat(&mut self.allocations[leg.0]).replace(resource) {
            self.release(&previous.key(), leg);
        }
        self.book(key, leg);
        Ok(())
    }

    fn ensure_rank(pilot: &Pilot, expected: Rank) -> Result<(), AllocationError> {
        if pilot.rank != expected {
            return Err(AllocationError::RankMismatch {
                resource: pilot.key(),
                expected,
            });
        }
        Ok(())
    }

    pub fn allocate_aircraft_to(
        &mut self,
        aircraft: Arc<Aircraft>,
        leg: LegId,
    ) -> Result<(), AllocationError> {
        self.bind_seat(aircraft, leg, |a| &mut a.aircraft)
    }

    pub fn allocate_captain_to(
        &mut self,
        captain: Arc<Pilot>,
        leg: LegId,
    ) -> Result<(), AllocationError> {
        Self::ensure_rank(&captain, Rank::Captain)?;
        self.bind_seat(captain, leg, |a| &mut a.captain)
    }

    pub fn allocate_first_officer_to(
        &mut self,
        first_officer: Arc<Pilot>,
        leg: LegId,
    ) -> Result<(), AllocationError> {
        Self::ensure_rank(&first_officer, Rank::FirstOfficer)?;
        self.bind_seat(first_officer, leg, |a| &mut a.first_officer)
    }

    pub fn allocate_cabin_crew_to(
        &mut self,
        member: Arc<CabinCrew>,
        leg: LegId,
    ) -> Result<(), AllocationError> {
        let key = member.key();
        self.ensure_bookable(&key, leg)?;
        self.allocations[leg.0].cabin_crew.push(member);
        self.book(key, leg);
        Ok(())
    }

    pub fn missing_roles(&self, leg: LegId) -> Vec<MissingRole> {
        let allocation = &self.allocations[leg.0];
        let mut missing = vec![];
        if allocation.aircraft.is_none() {
            missing.push(MissingRole::Aircraft);
        }
        if allocation.captain.is_none() {
            missing.push(MissingRole::Captain);
        }
        if allocation.first_officer.is_none() {
            missing.push(MissingRole::FirstOfficer);
        }
        if let Some(aircraft) = &allocation.aircraft {
            let bound = allocation.cabin_crew.len();
            let required = aircraft.cabin_crew_required;
            if !self.cabin_crew_policy.is_satisfied(bound, required) {
                missing.push(MissingRole::CabinCrew { bound, required });
            }
        }
        missing
    }

    pub fn complete_allocation_for(&mut self, leg: LegId) -> Result<(), AllocationError> {
        if self.legs[leg.0].status.is_closed() {
            return Err(AllocationError::LegClosed { leg });
        }

        let missing = self.missing_roles(leg);
        if !missing.is_empty() {
            self.legs[leg.0].status = LegStatus::Failed;
            debug!(%leg, missing = missing.len(), "Leg failed");
            return Err(AllocationError::InvalidAllocation { leg, missing });
        }

        self.legs[leg.0].status = LegStatus::Completed;
        debug!(%leg, "Leg completed");
        let departure = self.legs[leg.0].departure;
        let Ledger {
            legs,
            allocations,
            duty,
            ..
        } = self;
        for key in allocations[leg.0].keys() {
            let history = duty.entry(key).or_default();
            let pos = history.partition_point(|id| legs[id.0].departure <= departure);
            history.insert(pos, leg);
        }
        Ok(())
    }

    pub fn aircraft_for(&self, leg: LegId) -> Option<&Arc<Aircraft>> {
        self.allocations[leg.0].aircraft.as_ref()
    }

    pub fn captain_of(&self, leg: LegId) -> Option<&Arc<Pilot>> {
        self.allocations[leg.0].captain.as_ref()
    }

    pub fn first_officer_of(&self, leg: LegId) -> Option<&Arc<Pilot>> {
        self.allocations[leg.0].first_officer.as_ref()
    }

    pub fn cabin_crew_of(&self, leg: LegId) -> &[Arc<CabinCrew>] {
        &self.allocations[leg.0].cabin_crew
    }

    /// Completed legs of a resource, ordered by departure.
    pub fn duty_history(&self, key: &ResourceKey) -> &[LegId] {
        self.duty.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn completed_allocations_for(&self, resource: &impl Resource) -> Vec<&FlightLeg> {
        self.duty_history(&resource.key())
            .iter()
            .map(|id| &self.legs[id.0])
            .collect()
    }

    /// Latest completed leg of `key` that has landed by `instant`.
    pub fn previous_duty(&self, key: &ResourceKey, instant: NaiveDateTime) -> Option<&FlightLeg> {
        let history = self.duty_history(key);
        let idx = history.partition_point(|id| self.legs[id.0].arrival <= instant);
        idx.checked_sub(1).map(|i| &self.legs[history[i].0])
    }

    /// Where `key` stands at `instant`: the arrival airport of its previous
    /// duty, else `fallback` (starting location or home base).
    pub fn location_at(
        &self,
        key: &ResourceKey,
        fallback: &AirportCode,
        instant: NaiveDateTime,
    ) -> AirportCode {
        self.previous_duty(key, instant)
            .map(|leg| leg.arrival_airport().clone())
            .unwrap_or_else(|| fallback.clone())
    }

    pub fn remaining_allocations(&self) -> Vec<&FlightLeg> {
        self.legs
            .iter()
            .filter(|l| l.status != LegStatus::Completed)
            .collect()
    }

    pub fn completed_allocations(&self) -> Vec<&FlightLeg> {
        self.legs
            .iter()
            .filter(|l| l.status == LegStatus::Completed)
            .collect()
    }

    pub fn summary(&self) -> LedgerSummary {
        self.legs.iter().fold(
            LedgerSummary {
                legs: self.legs.len(),
                ..LedgerSummary::default()
            },
            |mut acc, leg| {
                match leg.status {
                    LegStatus::Pending => acc.pending += 1,
                    LegStatus::PartiallyAllocated => acc.partial += 1,
                    LegStatus::Completed => acc.completed += 1,
                    LegStatus::Failed => acc.failed += 1,
                }
                acc
            },
        )
    }

    pub(crate) fn assert_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }

        debug_assert!(
            self.legs.iter().all(|l| l.departure < l.arrival),
            "Leg <-> positive duration invariant violated"
        );

        for (key, legs) in &self.bookings {
            let mut ranges = legs
                .iter()
                .map(|id| self.legs[id.0].time_range())
                .collect::<Vec<_>>();
            ranges.sort_by_key(|r| r.start);
            let mut busy_until = None;
            for range in ranges {
                debug_assert!(
                    busy_until.is_none_or(|end| end <= range.start),
                    "{} is booked on overlapping legs",
                    key
                );
                busy_until = busy_until.max(Some(range.end));
            }
        }

        debug_assert!(
            self.legs
                .iter()
                .filter(|l| l.status == LegStatus::Completed)
                .all(|l| self.missing_roles(l.id).is_empty()),
            "Completed leg <-> full allocation invariant violated"
        );

        debug_assert!(
            self.allocations.iter().all(|a| match (&a.captain, &a.first_officer) {
                (Some(c), Some(f)) => c.name != f.name,
                _ => true,
            }),
            "Captain <-> first officer distinctness violated"
        );
    }
}
