use serde::{Deserialize, Serialize};

/// Points awarded once a value strictly exceeds `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub above: f64,
    pub points: f64,
}

/// Points awarded while a value stays strictly below `below`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub below: f64,
    pub points: f64,
}

/// Weight table for the relapse-risk questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Checked in order; the first matching tier wins.
    pub duration_tiers: Vec<Tier>,
    pub frequency_daily: f64,
    pub frequency_weekly: f64,
    pub frequency_monthly: f64,
    pub stress_multiplier: f64,
    pub sleep_multiplier: f64,
    pub support_none: f64,
    pub support_limited: f64,
    pub relapse_recent: f64,
    pub relapse_within_year: f64,
    pub per_trigger: f64,
    /// Negative: each active coping strategy lowers the score.
    pub per_coping_strategy: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            duration_tiers: vec![
                Tier {
                    above: 10.0,
                    points: 30.0,
                },
                Tier {
                    above: 5.0,
                    points: 20.0,
                },
                Tier {
                    above: 2.0,
                    points: 10.0,
                },
            ],
            frequency_daily: 25.0,
            frequency_weekly: 15.0,
            frequency_monthly: 5.0,
            stress_multiplier: 2.0,
            sleep_multiplier: 2.0,
            support_none: 20.0,
            support_limited: 10.0,
            relapse_recent: 25.0,
            relapse_within_year: 15.0,
            per_trigger: 3.0,
            per_coping_strategy: -2.0,
        }
    }
}

/// Weight table for the stress questionnaire; the weights sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressWeights {
    pub base_stress_weight: f64,
    /// Checked in order; the first step whose bound exceeds the value wins.
    pub sleep_steps: Vec<Step>,
    pub exercise_steps: Vec<Step>,
    pub pressure_weight: f64,
    /// Sum of the four pressure sliders at their maximum.
    pub pressure_scale: f64,
    pub social_support_weight: f64,
    pub per_symptom: f64,
    pub symptom_cap: f64,
}

impl Default for StressWeights {
    fn default() -> Self {
        Self {
            base_stress_weight: 20.0,
            sleep_steps: vec![
                Step {
                    below: 6.0,
                    points: 15.0,
                },
                Step {
                    below: 7.0,
                    points: 10.0,
                },
                Step {
                    below: 8.0,
                    points: 5.0,
                },
            ],
            exercise_steps: vec![
                Step {
                    below: 2.0,
                    points: 10.0,
                },
                Step {
                    below: 4.0,
                    points: 6.0,
                },
                Step {
                    below: 6.0,
                    points: 3.0,
                },
            ],
            pressure_weight: 30.0,
            pressure_scale: 40.0,
            social_support_weight: 10.0,
            per_symptom: 0.9375,
            symptom_cap: 15.0,
        }
    }
}

/// Weight tables for every questionnaire the engine scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub risk: RiskWeights,
    pub stress: StressWeights,
}
