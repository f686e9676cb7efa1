use crate::infra::{parse_variant, read_answers, InMemoryRecordStore};
use chrono::Local;
use clap::Args;
use recovery_assess::assessments::{
    crisis_plan, Answers, AssessmentService, AssessmentSession, AssessmentVariant, LastRelapse,
    RiskAnswers, ScoreOutcome, ScoringEngine, StressAnswers, SupportSystem, UsageFrequency,
};
use recovery_assess::config::AssessmentConfig;
use recovery_assess::error::AppError;
use recovery_assess::identity::UserId;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Questionnaire to score (risk or stress)
    #[arg(long, value_parser = parse_variant)]
    pub(crate) variant: AssessmentVariant,
    /// Path to a JSON object holding the raw answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the full outcome as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// User id the demo records are stored under
    #[arg(long, default_value = "demo-user")]
    pub(crate) user: String,
    /// Print the generated crisis plan at the end of the demo
    #[arg(long)]
    pub(crate) crisis_plan: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        variant,
        answers,
        json,
    } = args;

    let answers = read_answers(&answers, variant)?;
    let outcome = ScoringEngine::default().score(&answers);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_outcome(variant.title(), &outcome);
        for component in &outcome.components {
            println!(
                "  {:<20} {:>+7.2}  {}",
                component.factor, component.contribution, component.notes
            );
        }
        if !outcome.defaulted_fields.is_empty() {
            println!(
                "Unanswered (neutral default): {}",
                outcome.defaulted_fields.join(", ")
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let user_id = UserId::parse(&args.user).unwrap_or_else(|| UserId("demo-user".to_string()));
    let store = Arc::new(InMemoryRecordStore::default());
    let service = AssessmentService::new(store, AssessmentConfig::default());

    println!("Recovery assessment demo for {user_id}");

    for (variant, first, retake) in [
        (
            AssessmentVariant::Risk,
            Answers::Risk(struggling_risk_answers()),
            Answers::Risk(steadier_risk_answers()),
        ),
        (
            AssessmentVariant::Stress,
            Answers::Stress(struggling_stress_answers()),
            Answers::Stress(steadier_stress_answers()),
        ),
    ] {
        let mut session = AssessmentSession::new(user_id.clone(), variant);
        let phase = session.mount(&service)?;
        println!("\n{} (opened in {phase} view)", variant.title());

        session.edit(first)?;
        render_outcome("First check-in", session.submit(&service)?);

        session.retake()?;
        session.edit(retake)?;
        render_outcome("Follow-up check-in", session.submit(&service)?);

        let history = service.history(&user_id, variant, None)?;
        println!("Stored {} {variant} assessment(s):", history.len());
        for record in &history {
            println!(
                "  - {} at {} => {}",
                record.id.0,
                record.created_at.format("%H:%M:%S%.6f"),
                record.score
            );
        }
    }

    let dashboard = service.dashboard(&user_id)?;
    println!("\nDashboard");
    for (label, summary) in [("Risk", &dashboard.risk), ("Stress", &dashboard.stress)] {
        match summary {
            Some(summary) => println!("- {label}: {} ({})", summary.score, summary.category),
            None => println!("- {label}: not taken yet"),
        }
    }

    if args.crisis_plan {
        if let Some(record) = service.load_latest(&user_id, AssessmentVariant::Stress)? {
            let today = Local::now().date_naive();
            match crisis_plan::render(&record, user_id.as_str(), today) {
                Ok(plan) => {
                    println!("\n{}", crisis_plan::file_name(user_id.as_str(), today));
                    println!("{plan}");
                }
                Err(err) => println!("\nCrisis plan unavailable: {err}"),
            }
        }
    }

    Ok(())
}

fn render_outcome(heading: &str, outcome: &ScoreOutcome) {
    println!("{heading}: {} ({})", outcome.score, outcome.category);
    for recommendation in &outcome.recommendations {
        println!("  * {recommendation}");
    }
}

fn struggling_risk_answers() -> RiskAnswers {
    RiskAnswers {
        years_of_use: Some(6.0),
        substances: vec!["alcohol".to_string()],
        frequency: Some(UsageFrequency::Weekly),
        stress_level: Some(8.0),
        sleep_quality: Some(3.0),
        support_system: Some(SupportSystem::Limited),
        last_relapse: Some(LastRelapse::WithinYear),
        triggers: vec!["work stress".to_string(), "social events".to_string()],
        coping_strategies: vec!["meetings".to_string()],
        notes: None,
    }
}

fn steadier_risk_answers() -> RiskAnswers {
    RiskAnswers {
        frequency: Some(UsageFrequency::Occasional),
        stress_level: Some(4.0),
        sleep_quality: Some(7.0),
        support_system: Some(SupportSystem::Strong),
        last_relapse: Some(LastRelapse::OverYear),
        triggers: vec!["work stress".to_string()],
        coping_strategies: vec![
            "meetings".to_string(),
            "exercise".to_string(),
            "sponsor calls".to_string(),
        ],
        ..struggling_risk_answers()
    }
}

fn struggling_stress_answers() -> StressAnswers {
    StressAnswers {
        stress_level: Some(8.0),
        sleep_hours: Some(5.5),
        exercise_frequency: Some(1.0),
        work_pressure: Some(8.0),
        relationship_stress: Some(5.0),
        financial_stress: Some(7.0),
        health_concerns: Some(3.0),
        social_support: Some(4.0),
        coping_mechanisms: Some("walking, music".to_string()),
        stress_triggers: Some("deadlines, bills".to_string()),
        physical_symptoms: vec!["headaches".to_string(), "tension".to_string()],
        emotional_symptoms: vec!["anxiety".to_string()],
    }
}

fn steadier_stress_answers() -> StressAnswers {
    StressAnswers {
        stress_level: Some(4.0),
        sleep_hours: Some(7.5),
        exercise_frequency: Some(4.0),
        work_pressure: Some(4.0),
        financial_stress: Some(4.0),
        social_support: Some(7.0),
        physical_symptoms: Vec::new(),
        ..struggling_stress_answers()
    }
}
