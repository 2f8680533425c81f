use crate::airport::HomeCountry;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type Score = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub qualification: Score,
    pub continuity: Score,
    pub repositioning: Score,
    pub rest_at_home: Score,
    pub rest_away: Score,
    pub monthly_hours: Score,
    pub weekly_rest: Score,
    pub outward: Score,
    pub aircraft_capacity: Score,
    pub excess_seat_penalty: Score,
    pub underfit_seat_points: Score,
    pub aircraft_position: Score,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            qualification: 500_000,
            continuity: 50_000,
            repositioning: 20_000,
            rest_at_home: 50_000,
            rest_away: 40_000,
            monthly_hours: 5_000,
            weekly_rest: 30_000,
            outward: 10_000,
            aircraft_capacity: 50_000,
            excess_seat_penalty: 10,
            underfit_seat_points: 10,
            aircraft_position: 50_000,
        }
    }
}

impl ScoringWeights {
    /// Highest total the non-qualification crew factors can reach together.
    pub fn crew_ceiling_without_qualification(&self) -> Score {
        self.continuity.max(self.repositioning)
            + self.rest_at_home.max(self.rest_away)
            + self.monthly_hours
            + self.weekly_rest
            + self.outward
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestRules {
    pub min_rest_home_hours: i64,
    pub min_rest_away_hours: i64,
    pub repositioning_hours: i64,
    pub weekly_rest_hours: i64,
    pub monthly_cap_minutes: i64,
}

impl Default for RestRules {
    fn default() -> Self {
        RestRules {
            min_rest_home_hours: 12,
            min_rest_away_hours: 24,
            repositioning_hours: 48,
            weekly_rest_hours: 36,
            monthly_cap_minutes: 6000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinCrewPolicy {
    #[default]
    Exact,
    AtLeast,
}

impl CabinCrewPolicy {
    pub fn is_satisfied(&self, bound: usize, required: usize) -> bool {
        match self {
            CabinCrewPolicy::Exact => bound == required,
            CabinCrewPolicy::AtLeast => bound >= required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    pub enabled: bool,
    pub max_turnaround_minutes: i64,
}

impl Default for PairingConfig {
    fn default() -> Self {
        PairingConfig {
            enabled: false,
            max_turnaround_minutes: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub weights: ScoringWeights,
    pub rest: RestRules,
    pub home_country: HomeCountry,
    pub cabin_crew_policy: CabinCrewPolicy,
    pub pairing: PairingConfig,
}

impl SchedulerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let others = self.weights.crew_ceiling_without_qualification();
        if self.weights.qualification <= others {
            return Err(ConfigError::QualificationNotDominant {
                qualification: self.weights.qualification,
                others,
            });
        }
        if self.rest.monthly_cap_minutes <= 0 {
            return Err(ConfigError::Zero("rest.monthly_cap_minutes"));
        }
        if self.pairing.enabled && self.pairing.max_turnaround_minutes <= 0 {
            return Err(ConfigError::Zero("pairing.max_turnaround_minutes"));
        }
        Ok(())
    }
}
