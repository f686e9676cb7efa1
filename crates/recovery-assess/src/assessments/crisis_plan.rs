use chrono::NaiveDate;

use super::domain::{Answers, AssessmentVariant, StressAnswers};
use super::records::AssessmentRecord;
use super::scoring::RiskBand;

const EMERGENCY_CONTACTS: &[&str] = &[
    "SAMHSA National Helpline: 1-800-662-4357",
    "Crisis Text Line: Text HOME to 741741",
    "National Suicide Prevention Lifeline: 988",
    "Local Emergency Services: 911",
];

const FALLBACK_TRIGGERS: &[&str] = &[
    "High stress situations",
    "Overwhelming emotions",
    "Social conflicts",
];

const FALLBACK_COPING: &[&str] = &[
    "Deep breathing exercises",
    "Call a support person",
    "Remove yourself from triggers",
];

const ADDITIONAL_STRATEGIES: &[&str] = &[
    "Practice 4-7-8 breathing (4 seconds in, 7 hold, 8 out)",
    "Use grounding techniques (5-4-3-2-1 method)",
    "Reach out to my support network",
    "Remove myself from triggering situations",
    "Use positive self-talk and affirmations",
];

const RESOURCES: &[(&str, &str)] = &[
    (
        "Recovery from Addiction - Complete Guide",
        "https://www.youtube.com/watch?v=7CVYDG9ywnI",
    ),
    (
        "The Science of Addiction Recovery",
        "https://www.youtube.com/watch?v=H0WHkP5WNYI",
    ),
    (
        "Daily Recovery Practices & Habits",
        "https://www.youtube.com/watch?v=aFLCdaOF6YE",
    ),
    (
        "Guided Meditation for Addiction Recovery",
        "https://www.youtube.com/watch?v=ZToicYcHIOU",
    ),
    (
        "Breathing Exercises for Cravings",
        "https://www.youtube.com/watch?v=tybOi4hjZFQ",
    ),
];

const COMMITMENTS: &[&str] = &[
    "Contacting help immediately when I feel unsafe",
    "Using my coping strategies before situations escalate",
    "Being honest with my support network about my struggles",
    "Attending regular check-ins with healthcare providers",
    "Following my treatment plan consistently",
];

const RULE: &str = "===========================================";

#[derive(Debug, thiserror::Error)]
pub enum CrisisPlanError {
    #[error("crisis plans are built from stress assessments, not {0}")]
    UnsupportedVariant(AssessmentVariant),
}

/// Renders a personal plain-text crisis plan from a stored stress assessment.
pub fn render(
    record: &AssessmentRecord,
    user_label: &str,
    generated_on: NaiveDate,
) -> Result<String, CrisisPlanError> {
    let answers = match record.answers() {
        Answers::Stress(answers) => answers,
        Answers::Risk(_) => return Err(CrisisPlanError::UnsupportedVariant(record.variant)),
    };
    let outcome = record.outcome();
    let date = generated_on.format("%Y-%m-%d");

    let mut plan = String::new();
    push_line(
        &mut plan,
        &format!("PERSONAL CRISIS PLAN - {}", user_label.to_uppercase()),
    );
    push_line(&mut plan, &format!("Generated: {date}"));
    push_line(&mut plan, &format!("Risk Level: {}", risk_level(outcome.band)));

    section(&mut plan, "EMERGENCY CONTACTS (Call immediately in crisis)");
    bullets(&mut plan, EMERGENCY_CONTACTS.iter().copied());

    section(&mut plan, "MY PERSONAL WARNING SIGNS");
    push_line(&mut plan, "Physical Symptoms:");
    bullets_or(
        &mut plan,
        &answers.physical_symptoms,
        "Monitor for changes in physical well-being",
    );
    push_line(&mut plan, "\nEmotional Symptoms:");
    bullets_or(
        &mut plan,
        &answers.emotional_symptoms,
        "Monitor for changes in emotional state",
    );
    push_line(&mut plan, "\nMy Stress Triggers:");
    personal_or_fallback(&mut plan, answers.trigger_list(), FALLBACK_TRIGGERS);

    section(&mut plan, "MY COPING STRATEGIES");
    personal_or_fallback(&mut plan, answers.coping_list(), FALLBACK_COPING);
    push_line(&mut plan, "\nAdditional Strategies:");
    bullets(&mut plan, ADDITIONAL_STRATEGIES.iter().copied());

    section(&mut plan, "MY RECOVERY RESOURCES");
    for (title, url) in RESOURCES {
        push_line(&mut plan, &format!("• {title}: {url}"));
    }

    section(&mut plan, "MY PERSONAL COMMITMENT");
    push_line(&mut plan, "I commit to:");
    bullets(&mut plan, COMMITMENTS.iter().copied());

    push_line(
        &mut plan,
        &format!(
            "\nCurrent Stress Level: {}/100 ({})",
            outcome.score.value(),
            outcome.category
        ),
    );
    push_line(&mut plan, &format!("Sleep Average: {}", sleep_line(&answers)));
    push_line(
        &mut plan,
        &format!("Exercise Frequency: {}", exercise_line(&answers)),
    );
    push_line(
        &mut plan,
        &format!(
            "\nThis plan is personalized based on my assessment on {}.",
            record.created_at.format("%Y-%m-%d")
        ),
    );
    push_line(
        &mut plan,
        "I will review and update this plan regularly with my healthcare provider.",
    );
    push_line(
        &mut plan,
        "\nRemember: Recovery is a journey, not a destination. Each day sober is a victory.",
    );

    Ok(plan)
}

/// Suggested download name for a rendered plan.
pub fn file_name(user_label: &str, generated_on: NaiveDate) -> String {
    let safe: String = user_label
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    format!("Crisis_Plan_{safe}_{}.txt", generated_on.format("%Y-%m-%d"))
}

fn risk_level(band: RiskBand) -> &'static str {
    match band {
        RiskBand::Low => "LOW RISK",
        RiskBand::Moderate => "MODERATE RISK",
        RiskBand::High => "HIGH RISK",
    }
}

fn section(plan: &mut String, title: &str) {
    push_line(plan, &format!("\n{RULE}\n{title}\n{RULE}"));
}

fn bullets<'a>(plan: &mut String, lines: impl IntoIterator<Item = &'a str>) {
    for line in lines {
        push_line(plan, &format!("• {line}"));
    }
}

fn bullets_or(plan: &mut String, items: &[String], fallback: &str) {
    if items.is_empty() {
        bullets(plan, [fallback]);
    } else {
        bullets(plan, items.iter().map(String::as_str));
    }
}

fn personal_or_fallback(plan: &mut String, personal: Vec<String>, fallback: &[&str]) {
    if personal.is_empty() {
        bullets(plan, fallback.iter().copied());
    } else {
        bullets(plan, personal.iter().map(String::as_str));
    }
}

fn push_line(plan: &mut String, line: &str) {
    plan.push_str(line);
    plan.push('\n');
}

fn sleep_line(answers: &StressAnswers) -> String {
    answers
        .sleep_hours
        .map(|hours| format!("{hours} hours"))
        .unwrap_or_else(|| "Not specified".to_string())
}

fn exercise_line(answers: &StressAnswers) -> String {
    answers
        .exercise_frequency
        .map(|days| format!("{days} days/week"))
        .unwrap_or_else(|| "Not specified".to_string())
}
