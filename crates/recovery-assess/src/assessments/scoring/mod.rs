mod bands;
mod config;
mod profile;
mod rules;

pub use bands::{RiskBand, Score, LOW_CEILING, MODERATE_CEILING};
pub use config::{RiskWeights, ScoringConfig, Step, StressWeights, Tier};
pub use profile::VariantProfile;

use super::domain::{Answers, AssessmentVariant};
use serde::Serialize;
use tracing::debug;

/// Stateless scorer that applies the configured weight tables to an answer set.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, answers: &Answers) -> ScoreOutcome {
        let breakdown = match answers {
            Answers::Risk(risk) => rules::score_risk(risk, &self.config.risk),
            Answers::Stress(stress) => rules::score_stress(stress, &self.config.stress),
        };

        let variant = answers.variant();
        for field in &breakdown.defaulted {
            debug!(%variant, field, "unanswered field scored with neutral default");
        }

        let score = Score::from_raw(breakdown.raw_total);
        let mut outcome = ScoreOutcome::from_score(variant, score);
        outcome.raw_total = Some(breakdown.raw_total);
        outcome.components = breakdown.components;
        outcome.defaulted_fields = breakdown.defaulted;
        outcome
    }
}

/// Discrete contribution to a score, kept so results can be audited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub factor: &'static str,
    pub contribution: f64,
    pub notes: String,
}

/// Score, category, and advice for one answer set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub variant: AssessmentVariant,
    pub score: Score,
    pub band: RiskBand,
    pub category: &'static str,
    pub recommendations: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_total: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ScoreComponent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defaulted_fields: Vec<&'static str>,
}

impl ScoreOutcome {
    /// Derives category and advice from a score alone, without a breakdown.
    pub fn from_score(variant: AssessmentVariant, score: Score) -> Self {
        let profile = variant.profile();
        let band = score.band();
        Self {
            variant,
            score,
            band,
            category: profile.category_label(band),
            recommendations: profile.recommendations(band).to_vec(),
            raw_total: None,
            components: Vec::new(),
            defaulted_fields: Vec::new(),
        }
    }

    pub fn recommendation_strings(&self) -> Vec<String> {
        self.recommendations
            .iter()
            .map(|line| line.to_string())
            .collect()
    }

    /// Compares the parts that are persisted: score, category, and advice.
    pub fn same_result(&self, other: &ScoreOutcome) -> bool {
        self.variant == other.variant
            && self.score == other.score
            && self.category == other.category
            && self.recommendations == other.recommendations
    }
}
