use super::super::domain::{
    LastRelapse, RiskAnswers, StressAnswers, SupportSystem, UsageFrequency,
};
use super::super::lenient::Choice;
use super::config::{RiskWeights, Step, StressWeights, Tier};
use super::ScoreComponent;

/// Unclamped result of applying a weight table to one answer set.
#[derive(Debug, Default)]
pub(crate) struct Breakdown {
    pub components: Vec<ScoreComponent>,
    pub raw_total: f64,
    pub defaulted: Vec<&'static str>,
}

impl Breakdown {
    fn add(&mut self, factor: &'static str, contribution: f64, notes: String) {
        self.raw_total += contribution;
        self.components.push(ScoreComponent {
            factor,
            contribution,
            notes,
        });
    }

    fn numeric(
        &mut self,
        field: &'static str,
        value: Option<f64>,
        default: f64,
        (min, max): (f64, f64),
    ) -> f64 {
        match value {
            Some(value) => value.clamp(min, max),
            None => {
                self.defaulted.push(field);
                default
            }
        }
    }

    fn category<'a, T>(&mut self, field: &'static str, value: Option<&'a T>) -> Option<&'a T> {
        if value.is_none() {
            self.defaulted.push(field);
        }
        value
    }
}

fn tier_points(tiers: &[Tier], value: f64) -> f64 {
    tiers
        .iter()
        .find(|tier| value > tier.above)
        .map(|tier| tier.points)
        .unwrap_or(0.0)
}

fn step_points(steps: &[Step], value: f64) -> f64 {
    steps
        .iter()
        .find(|step| value < step.below)
        .map(|step| step.points)
        .unwrap_or(0.0)
}

pub(crate) fn score_risk(answers: &RiskAnswers, weights: &RiskWeights) -> Breakdown {
    let mut breakdown = Breakdown::default();

    let years = breakdown.numeric(
        "yearsOfUse",
        answers.years_of_use,
        RiskAnswers::DEFAULT_YEARS_OF_USE,
        (0.0, f64::MAX),
    );
    breakdown.add(
        "duration_of_use",
        tier_points(&weights.duration_tiers, years),
        format!("{years} year(s) of use"),
    );

    let frequency = breakdown.category("frequency", answers.frequency.as_ref());
    let frequency_points = match frequency {
        Some(UsageFrequency::Daily) => weights.frequency_daily,
        Some(UsageFrequency::Weekly) => weights.frequency_weekly,
        Some(UsageFrequency::Monthly) => weights.frequency_monthly,
        Some(UsageFrequency::Occasional) | Some(UsageFrequency::Other(_)) | None => 0.0,
    };
    breakdown.add(
        "usage_frequency",
        frequency_points,
        format!(
            "{} use",
            frequency.map(Choice::label).unwrap_or("unreported")
        ),
    );

    let stress = breakdown.numeric(
        "stressLevel",
        answers.stress_level,
        RiskAnswers::DEFAULT_STRESS_LEVEL,
        RiskAnswers::SLIDER_RANGE,
    );
    breakdown.add(
        "stress_level",
        stress * weights.stress_multiplier,
        format!("stress {stress}/10"),
    );

    let sleep = breakdown.numeric(
        "sleepQuality",
        answers.sleep_quality,
        RiskAnswers::DEFAULT_SLEEP_QUALITY,
        RiskAnswers::SLIDER_RANGE,
    );
    breakdown.add(
        "sleep_quality",
        (10.0 - sleep) * weights.sleep_multiplier,
        format!("sleep quality {sleep}/10"),
    );

    let support = breakdown.category("supportSystem", answers.support_system.as_ref());
    let support_points = match support {
        Some(SupportSystem::Absent) => weights.support_none,
        Some(SupportSystem::Limited) => weights.support_limited,
        _ => 0.0,
    };
    breakdown.add(
        "support_system",
        support_points,
        format!(
            "{} support",
            support.map(Choice::label).unwrap_or("unreported")
        ),
    );

    let relapse = breakdown.category("lastRelapse", answers.last_relapse.as_ref());
    let relapse_points = match relapse {
        Some(LastRelapse::Recent) => weights.relapse_recent,
        Some(LastRelapse::WithinYear) => weights.relapse_within_year,
        _ => 0.0,
    };
    breakdown.add(
        "last_relapse",
        relapse_points,
        format!(
            "last relapse: {}",
            relapse.map(Choice::label).unwrap_or("unreported")
        ),
    );

    let trigger_count = answers.triggers.len();
    breakdown.add(
        "triggers",
        trigger_count as f64 * weights.per_trigger,
        format!("{trigger_count} trigger(s) selected"),
    );

    let coping_count = answers.coping_strategies.len();
    breakdown.add(
        "coping_strategies",
        coping_count as f64 * weights.per_coping_strategy,
        format!("{coping_count} coping strateg(ies) in use"),
    );

    breakdown
}

pub(crate) fn score_stress(answers: &StressAnswers, weights: &StressWeights) -> Breakdown {
    let mut breakdown = Breakdown::default();

    let stress = breakdown.numeric(
        "stress_level",
        answers.stress_level,
        StressAnswers::DEFAULT_STRESS_LEVEL,
        (0.0, 10.0),
    );
    breakdown.add(
        "base_stress",
        stress / 10.0 * weights.base_stress_weight,
        format!("stress {stress}/10"),
    );

    let sleep_hours = breakdown.numeric(
        "sleep_hours",
        answers.sleep_hours,
        StressAnswers::DEFAULT_SLEEP_HOURS,
        (0.0, 24.0),
    );
    breakdown.add(
        "sleep_hours",
        step_points(&weights.sleep_steps, sleep_hours),
        format!("{sleep_hours}h sleep per night"),
    );

    let exercise = breakdown.numeric(
        "exercise_frequency",
        answers.exercise_frequency,
        StressAnswers::DEFAULT_EXERCISE_DAYS,
        (0.0, 7.0),
    );
    breakdown.add(
        "exercise_frequency",
        step_points(&weights.exercise_steps, exercise),
        format!("exercise {exercise} day(s) per week"),
    );

    let pressures = [
        ("work_pressure", answers.work_pressure),
        ("relationship_stress", answers.relationship_stress),
        ("financial_stress", answers.financial_stress),
        ("health_concerns", answers.health_concerns),
    ];
    let mut pressure_sum = 0.0;
    for (field, value) in pressures {
        pressure_sum +=
            breakdown.numeric(field, value, StressAnswers::DEFAULT_PRESSURE, (0.0, 10.0));
    }
    breakdown.add(
        "pressures",
        pressure_sum / weights.pressure_scale * weights.pressure_weight,
        format!(
            "combined pressure {pressure_sum}/{}",
            weights.pressure_scale
        ),
    );

    let support = breakdown.numeric(
        "social_support",
        answers.social_support,
        StressAnswers::DEFAULT_SOCIAL_SUPPORT,
        (0.0, 10.0),
    );
    breakdown.add(
        "social_support",
        (10.0 - support) / 10.0 * weights.social_support_weight,
        format!("social support {support}/10"),
    );

    let symptom_count = answers.physical_symptoms.len() + answers.emotional_symptoms.len();
    breakdown.add(
        "symptoms",
        (symptom_count as f64 * weights.per_symptom).min(weights.symptom_cap),
        format!("{symptom_count} symptom(s) reported"),
    );

    breakdown
}
