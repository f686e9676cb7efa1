//! Relapse-risk and stress questionnaires: scoring, persistence, and the
//! per-user session flow.
//!
//! Scoring is pure and deterministic. Everything that touches the record store
//! goes through [`AssessmentService`], which validates required answers before
//! anything is written and keeps failed saves around so they can be retried
//! without rescoring.

pub mod crisis_plan;
pub mod domain;
pub mod flow;
mod lenient;
pub mod records;
pub mod router;
pub mod scoring;
pub mod session;

#[cfg(test)]
mod tests;

pub use crisis_plan::CrisisPlanError;
pub use domain::{
    Answers, AnswersError, AssessmentVariant, LastRelapse, RiskAnswers, StressAnswers,
    SupportSystem, UsageFrequency,
};
pub use flow::{AssessmentSession, FlowError, SessionPhase};
pub use lenient::Choice;
pub use records::{
    AssessmentRecord, AssessmentSummary, AssessmentView, InsertedRecord, NewAssessmentRecord,
    RecordId, RecordQuery, RecordStore, StoreError,
};
pub use router::assessment_router;
pub use scoring::{RiskBand, Score, ScoreComponent, ScoreOutcome, ScoringConfig, ScoringEngine};
pub use session::{
    AssessmentService, DashboardSummary, PendingSubmission, SessionError, SubmissionReceipt,
    ValidationError,
};
