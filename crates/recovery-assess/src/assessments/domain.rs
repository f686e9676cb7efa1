use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::lenient::{self, Choice};

/// The two questionnaires the service knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentVariant {
    Risk,
    Stress,
}

impl AssessmentVariant {
    pub const fn ordered() -> [Self; 2] {
        [Self::Risk, Self::Stress]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Risk => "risk",
            Self::Stress => "stress",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Risk => "Relapse Risk Assessment",
            Self::Stress => "Stress Assessment",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "risk" | "relapse" | "risk_assessments" => Some(Self::Risk),
            "stress" | "stress_assessments" => Some(Self::Stress),
            _ => None,
        }
    }
}

impl fmt::Display for AssessmentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Stored as its label; unrecognised labels are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum UsageFrequency {
    Daily,
    Weekly,
    Monthly,
    Occasional,
    Other(String),
}

impl Choice for UsageFrequency {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "occasional" | "occasionally" => Self::Occasional,
            _ => Self::Other(label.to_string()),
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Occasional => "occasional",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<UsageFrequency> for String {
    fn from(value: UsageFrequency) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum SupportSystem {
    Strong,
    Moderate,
    Limited,
    Absent,
    Other(String),
}

impl Choice for SupportSystem {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "strong" => Self::Strong,
            "moderate" => Self::Moderate,
            "limited" => Self::Limited,
            "none" => Self::Absent,
            _ => Self::Other(label.to_string()),
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Limited => "limited",
            Self::Absent => "none",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<SupportSystem> for String {
    fn from(value: SupportSystem) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum LastRelapse {
    Never,
    Recent,
    WithinYear,
    OverYear,
    Other(String),
}

impl Choice for LastRelapse {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "never" => Self::Never,
            "recent" => Self::Recent,
            "within-year" | "within_year" => Self::WithinYear,
            "over-year" | "over_year" => Self::OverYear,
            _ => Self::Other(label.to_string()),
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Never => "never",
            Self::Recent => "recent",
            Self::WithinYear => "within-year",
            Self::OverYear => "over-year",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<LastRelapse> for String {
    fn from(value: LastRelapse) -> Self {
        value.label().to_string()
    }
}

/// Answers to the substance-relapse risk questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnswers {
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub years_of_use: Option<f64>,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub substances: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub frequency: Option<UsageFrequency>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub stress_level: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sleep_quality: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub support_system: Option<SupportSystem>,
    #[serde(
        default,
        deserialize_with = "lenient::choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_relapse: Option<LastRelapse>,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub triggers: Vec<String>,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub coping_strategies: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl RiskAnswers {
    pub const DEFAULT_YEARS_OF_USE: f64 = 0.0;
    pub const DEFAULT_STRESS_LEVEL: f64 = 5.0;
    pub const DEFAULT_SLEEP_QUALITY: f64 = 5.0;
    pub const SLIDER_RANGE: (f64, f64) = (1.0, 10.0);

    fn is_answered(&self, field: &str) -> bool {
        match field {
            "substances" => !self.substances.is_empty(),
            "frequency" => self.frequency.is_some(),
            "supportSystem" => self.support_system.is_some(),
            "lastRelapse" => self.last_relapse.is_some(),
            "yearsOfUse" => self.years_of_use.is_some(),
            "stressLevel" => self.stress_level.is_some(),
            "sleepQuality" => self.sleep_quality.is_some(),
            _ => false,
        }
    }
}

/// Answers to the general stress questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StressAnswers {
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub stress_level: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sleep_hours: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub exercise_frequency: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_pressure: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub relationship_stress: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub financial_stress: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub health_concerns: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub social_support: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub coping_mechanisms: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub stress_triggers: Option<String>,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub physical_symptoms: Vec<String>,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub emotional_symptoms: Vec<String>,
}

impl StressAnswers {
    pub const DEFAULT_STRESS_LEVEL: f64 = 5.0;
    pub const DEFAULT_SLEEP_HOURS: f64 = 8.0;
    pub const DEFAULT_EXERCISE_DAYS: f64 = 5.0;
    pub const DEFAULT_PRESSURE: f64 = 0.0;
    pub const DEFAULT_SOCIAL_SUPPORT: f64 = 10.0;

    fn is_answered(&self, field: &str) -> bool {
        match field {
            "stress_level" => self.stress_level.is_some(),
            "sleep_hours" => self.sleep_hours.is_some(),
            "exercise_frequency" => self.exercise_frequency.is_some(),
            "social_support" => self.social_support.is_some(),
            _ => false,
        }
    }

    /// Free-text triggers split on commas.
    pub fn trigger_list(&self) -> Vec<String> {
        self.stress_triggers
            .as_deref()
            .map(lenient::split_list)
            .unwrap_or_default()
    }

    /// Free-text coping mechanisms split on commas.
    pub fn coping_list(&self) -> Vec<String> {
        self.coping_mechanisms
            .as_deref()
            .map(lenient::split_list)
            .unwrap_or_default()
    }
}

/// In-memory answer set owned by one session, tagged by questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answers {
    Risk(RiskAnswers),
    Stress(StressAnswers),
}

impl Answers {
    pub fn blank(variant: AssessmentVariant) -> Self {
        match variant {
            AssessmentVariant::Risk => Self::Risk(RiskAnswers::default()),
            AssessmentVariant::Stress => Self::Stress(StressAnswers::default()),
        }
    }

    pub fn variant(&self) -> AssessmentVariant {
        match self {
            Self::Risk(_) => AssessmentVariant::Risk,
            Self::Stress(_) => AssessmentVariant::Stress,
        }
    }

    /// Decodes a raw responses object for the given questionnaire.
    ///
    /// Unknown keys are ignored, which lets stored blobs (that also carry
    /// recommendations) round back into form state.
    pub fn from_responses(
        variant: AssessmentVariant,
        responses: &Value,
    ) -> Result<Self, AnswersError> {
        if !responses.is_object() {
            return Err(AnswersError::NotAnObject { variant });
        }

        let decoded = match variant {
            AssessmentVariant::Risk => {
                serde_json::from_value(merge_legacy_substances(responses)).map(Self::Risk)
            }
            AssessmentVariant::Stress => {
                serde_json::from_value(responses.clone()).map(Self::Stress)
            }
        };

        decoded.map_err(|source| AnswersError::Malformed { variant, source })
    }

    /// Flat key-value view used for persistence.
    pub fn to_responses(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }

    /// Whether the named required field carries an answer.
    pub fn is_answered(&self, field: &str) -> bool {
        match self {
            Self::Risk(answers) => answers.is_answered(field),
            Self::Stress(answers) => answers.is_answered(field),
        }
    }
}

/// Folds the single-valued `substanceType` key used by older blobs into
/// `substances`, so a payload carrying both still decodes.
fn merge_legacy_substances(responses: &Value) -> Value {
    let mut responses = responses.clone();
    let Some(map) = responses.as_object_mut() else {
        return responses;
    };
    let Some(legacy) = map.remove("substanceType") else {
        return responses;
    };

    let mut merged = Vec::new();
    for value in [map.remove("substances"), Some(legacy)].into_iter().flatten() {
        match value {
            Value::Array(items) => merged.extend(items),
            Value::String(_) => merged.push(value),
            _ => {}
        }
    }
    map.insert("substances".to_string(), Value::Array(merged));
    responses
}

/// Raw responses that could not be read as a questionnaire at all.
#[derive(Debug, thiserror::Error)]
pub enum AnswersError {
    #[error("{variant} responses must be a JSON object")]
    NotAnObject { variant: AssessmentVariant },
    #[error("{variant} responses are malformed: {source}")]
    Malformed {
        variant: AssessmentVariant,
        #[source]
        source: serde_json::Error,
    },
}
