use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Upper bound (inclusive) of the low band.
pub const LOW_CEILING: u8 = 30;
/// Upper bound (inclusive) of the moderate band.
pub const MODERATE_CEILING: u8 = 70;

/// Bounded assessment score in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(0);
    pub const MAX: Score = Score(100);

    /// Clamps a raw weighted sum into range and rounds to the nearest integer.
    pub fn from_raw(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        Self(raw.clamp(0.0, 100.0).round() as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn band(self) -> RiskBand {
        RiskBand::for_score(self)
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }
}

impl Serialize for Score {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

/// Stored scores may be any JSON number; they are clamped and rounded on read.
impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Self::from_raw)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100", self.0)
    }
}

/// Category band shared by every questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Moderate, Self::High]
    }

    pub fn for_score(score: Score) -> Self {
        match score.value() {
            value if value <= LOW_CEILING => Self::Low,
            value if value <= MODERATE_CEILING => Self::Moderate,
            _ => Self::High,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Moderate => 1,
            Self::High => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_closed_on_the_upper_bound() {
        assert_eq!(Score::from(0).band(), RiskBand::Low);
        assert_eq!(Score::from(30).band(), RiskBand::Low);
        assert_eq!(Score::from(31).band(), RiskBand::Moderate);
        assert_eq!(Score::from(70).band(), RiskBand::Moderate);
        assert_eq!(Score::from(71).band(), RiskBand::High);
        assert_eq!(Score::from(100).band(), RiskBand::High);
    }

    #[test]
    fn raw_sums_are_clamped_and_rounded() {
        assert_eq!(Score::from_raw(-12.0), Score::MIN);
        assert_eq!(Score::from_raw(144.0), Score::MAX);
        assert_eq!(Score::from_raw(30.4).value(), 30);
        assert_eq!(Score::from_raw(30.5).value(), 31);
        assert_eq!(Score::from_raw(f64::NAN), Score::MIN);
        assert_eq!(Score::from_raw(f64::INFINITY), Score::MAX);
    }

    #[test]
    fn stored_scores_outside_range_are_clamped_on_read() {
        let score: Score = serde_json::from_str("250").expect("score decodes");
        assert_eq!(score, Score::MAX);
        let score: Score = serde_json::from_str("-3").expect("score decodes");
        assert_eq!(score, Score::MIN);
        assert_eq!(serde_json::to_string(&Score::from(42)).expect("encodes"), "42");
    }

    #[test]
    fn stored_scores_written_as_floats_decode() {
        let decode = |raw: &str| serde_json::from_str::<Score>(raw).expect("score decodes");
        assert_eq!(decode("42.0").value(), 42);
        assert_eq!(decode("42.6").value(), 43);
        assert_eq!(decode("250.0"), Score::MAX);
        assert_eq!(decode("-0.5"), Score::MIN);
        assert!(serde_json::from_str::<Score>("\"high\"").is_err());
    }
}
