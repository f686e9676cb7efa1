use super::super::domain::AssessmentVariant;
use super::bands::RiskBand;

/// Static description of a questionnaire: where its records live, which answers
/// are mandatory, and how each band is labelled and advised.
#[derive(Debug)]
pub struct VariantProfile {
    pub variant: AssessmentVariant,
    pub table: &'static str,
    pub required_fields: &'static [&'static str],
    labels: [&'static str; 3],
    recommendations: [&'static [&'static str]; 3],
}

impl VariantProfile {
    pub fn category_label(&self, band: RiskBand) -> &'static str {
        self.labels[band.index()]
    }

    pub fn recommendations(&self, band: RiskBand) -> &'static [&'static str] {
        self.recommendations[band.index()]
    }
}

static RISK_PROFILE: VariantProfile = VariantProfile {
    variant: AssessmentVariant::Risk,
    table: "risk_assessments",
    required_fields: &["substances", "frequency", "supportSystem", "lastRelapse"],
    labels: ["Low Risk", "Moderate Risk", "High Risk"],
    recommendations: [
        &[
            "Continue your current recovery practices",
            "Maintain regular check-ins with your support network",
            "Consider preventive counseling sessions",
            "Keep up healthy lifestyle habits",
            "Schedule regular medical check-ups",
        ],
        &[
            "Increase frequency of support group meetings",
            "Schedule regular therapy sessions",
            "Implement stress management techniques",
            "Consider intensive outpatient programs",
            "Strengthen your support network",
            "Create a detailed relapse prevention plan",
        ],
        &[
            "Seek immediate professional help",
            "Consider residential treatment options",
            "Daily check-ins with counselor or sponsor",
            "Remove triggers from environment",
            "Activate crisis intervention plan",
            "Contact emergency support immediately if needed",
            "Consider medication-assisted treatment",
        ],
    ],
};

static STRESS_PROFILE: VariantProfile = VariantProfile {
    variant: AssessmentVariant::Stress,
    table: "stress_assessments",
    required_fields: &[],
    labels: ["Low Stress", "Moderate Stress", "High Stress"],
    recommendations: [
        &[
            "Continue your current stress management practices",
            "Maintain regular exercise and sleep schedule",
            "Practice preventive stress management techniques",
            "Consider helping others who may be struggling with stress",
        ],
        &[
            "Implement daily stress reduction techniques like meditation",
            "Improve sleep hygiene and aim for 7-9 hours of sleep",
            "Increase physical activity to at least 30 minutes daily",
            "Consider talking to a counselor or therapist",
            "Practice deep breathing exercises throughout the day",
        ],
        &[
            "Seek professional help from a mental health provider",
            "Consider stress management counseling or therapy",
            "Implement immediate stress relief techniques",
            "Prioritize self-care and set boundaries",
            "Consider medication consultation with a healthcare provider",
            "Reach out to your support network immediately",
        ],
    ],
};

impl AssessmentVariant {
    pub fn profile(self) -> &'static VariantProfile {
        match self {
            AssessmentVariant::Risk => &RISK_PROFILE,
            AssessmentVariant::Stress => &STRESS_PROFILE,
        }
    }
}
