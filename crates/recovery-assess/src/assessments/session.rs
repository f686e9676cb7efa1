use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{Answers, AssessmentVariant};
use super::records::{
    AssessmentRecord, AssessmentSummary, NewAssessmentRecord, RecordQuery, RecordStore,
    StoreError,
};
use super::scoring::{ScoreOutcome, ScoringEngine};
use crate::config::AssessmentConfig;
use crate::identity::UserId;

/// Service composing the scoring engine with the append-only record store.
pub struct AssessmentService<S> {
    store: Arc<S>,
    engine: Arc<ScoringEngine>,
    config: AssessmentConfig,
}

impl<S> AssessmentService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, config: AssessmentConfig) -> Self {
        Self::with_engine(store, ScoringEngine::default(), config)
    }

    pub fn with_engine(store: Arc<S>, engine: ScoringEngine, config: AssessmentConfig) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
            config,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score answers without touching the store.
    pub fn preview(&self, answers: &Answers) -> ScoreOutcome {
        self.engine.score(answers)
    }

    /// Most recent record for this user and questionnaire, if any.
    pub fn load_latest(
        &self,
        user_id: &UserId,
        variant: AssessmentVariant,
    ) -> Result<Option<AssessmentRecord>, SessionError> {
        let records = self
            .store
            .query(variant.profile().table, &RecordQuery::latest(user_id.clone()))
            .map_err(|source| {
                warn!(%user_id, %variant, error = %source, "failed to load latest assessment");
                SessionError::persistence(source)
            })?;

        Ok(records.into_iter().max_by_key(|record| record.created_at))
    }

    /// Newest-first records, capped by the configured history limit.
    pub fn history(
        &self,
        user_id: &UserId,
        variant: AssessmentVariant,
        limit: Option<usize>,
    ) -> Result<Vec<AssessmentRecord>, SessionError> {
        let cap = self.config.history_limit.max(1);
        let limit = limit.map(|requested| requested.clamp(1, cap)).unwrap_or(cap);
        let query = RecordQuery {
            user_id: user_id.clone(),
            limit: Some(limit),
        };

        let mut records = self
            .store
            .query(variant.profile().table, &query)
            .map_err(SessionError::persistence)?;
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        records.truncate(limit);
        Ok(records)
    }

    /// Latest summary for every questionnaire.
    pub fn dashboard(&self, user_id: &UserId) -> Result<DashboardSummary, SessionError> {
        let risk = self.load_latest(user_id, AssessmentVariant::Risk)?;
        let stress = self.load_latest(user_id, AssessmentVariant::Stress)?;

        Ok(DashboardSummary {
            user_id: user_id.clone(),
            risk: risk.as_ref().map(AssessmentRecord::summary),
            stress: stress.as_ref().map(AssessmentRecord::summary),
        })
    }

    /// Validate, score, and append a new assessment.
    pub fn submit(
        &self,
        user_id: &UserId,
        answers: &Answers,
    ) -> Result<SubmissionReceipt, SessionError> {
        let variant = answers.variant();
        let missing: Vec<&'static str> = variant
            .profile()
            .required_fields
            .iter()
            .copied()
            .filter(|field| !answers.is_answered(field))
            .collect();
        if !missing.is_empty() {
            info!(%user_id, %variant, ?missing, "assessment rejected before scoring");
            return Err(ValidationError { variant, missing }.into());
        }

        let outcome = self.engine.score(answers);
        let record = NewAssessmentRecord::from_outcome(user_id.clone(), answers, &outcome);
        self.save(PendingSubmission { outcome, record })
    }

    /// Persist an already-scored submission, e.g. when retrying a failed save.
    ///
    /// Every call appends; concurrent saves for one user each produce a record.
    pub fn save(&self, pending: PendingSubmission) -> Result<SubmissionReceipt, SessionError> {
        let table = pending.record.variant.profile().table;
        match self.store.insert(table, pending.record.clone()) {
            Ok(inserted) => {
                let record = AssessmentRecord::from_insert(pending.record, inserted);
                info!(
                    user_id = %record.user_id,
                    variant = %record.variant,
                    score = record.score.value(),
                    record_id = %record.id.0,
                    "assessment stored"
                );
                Ok(SubmissionReceipt {
                    record,
                    outcome: pending.outcome,
                })
            }
            Err(source) => {
                warn!(
                    user_id = %pending.record.user_id,
                    variant = %pending.record.variant,
                    error = %source,
                    "assessment insert failed; result kept for retry"
                );
                Err(SessionError::Persistence {
                    source,
                    pending: Some(Box::new(pending)),
                })
            }
        }
    }
}

/// A scored submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub outcome: ScoreOutcome,
    pub record: NewAssessmentRecord,
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub record: AssessmentRecord,
    pub outcome: ScoreOutcome,
}

/// Latest results across questionnaires for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub user_id: UserId,
    pub risk: Option<AssessmentSummary>,
    pub stress: Option<AssessmentSummary>,
}

/// Required answers were missing; nothing was sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required answers for {variant} assessment: {}", missing.join(", "))]
pub struct ValidationError {
    pub variant: AssessmentVariant,
    pub missing: Vec<&'static str>,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("persistence failed: {source}")]
    Persistence {
        #[source]
        source: StoreError,
        /// Present when a computed result is waiting to be saved again.
        pending: Option<Box<PendingSubmission>>,
    },
}

impl SessionError {
    fn persistence(source: StoreError) -> Self {
        Self::Persistence {
            source,
            pending: None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Persistence { .. })
    }

    pub fn pending(&self) -> Option<&PendingSubmission> {
        match self {
            SessionError::Persistence { pending, .. } => pending.as_deref(),
            _ => None,
        }
    }
}
