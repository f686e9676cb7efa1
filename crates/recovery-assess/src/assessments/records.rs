use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{Answers, AssessmentVariant};
use super::scoring::{Score, ScoreOutcome};
use crate::identity::UserId;

/// Store-assigned identifier of an assessment record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

/// Record handed to the store; `id` and `created_at` are assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssessmentRecord {
    pub user_id: UserId,
    pub variant: AssessmentVariant,
    pub responses: Value,
    pub score: Score,
    pub category: String,
    pub recommendations: Vec<String>,
}

impl NewAssessmentRecord {
    /// Builds the insert payload: raw answers with the advice folded in.
    pub fn from_outcome(user_id: UserId, answers: &Answers, outcome: &ScoreOutcome) -> Self {
        let recommendations = outcome.recommendation_strings();
        let mut responses = answers.to_responses();
        if let Value::Object(map) = &mut responses {
            map.insert(
                "recommendations".to_string(),
                Value::from(recommendations.clone()),
            );
        }

        Self {
            user_id,
            variant: outcome.variant,
            responses,
            score: outcome.score,
            category: outcome.category.to_string(),
            recommendations,
        }
    }
}

/// Identity and timestamp returned by a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedRecord {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
}

/// Immutable persisted assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub variant: AssessmentVariant,
    pub created_at: DateTime<Utc>,
    pub responses: Value,
    pub score: Score,
    pub category: String,
    pub recommendations: Vec<String>,
}

impl AssessmentRecord {
    pub fn from_insert(record: NewAssessmentRecord, inserted: InsertedRecord) -> Self {
        Self {
            id: inserted.id,
            user_id: record.user_id,
            variant: record.variant,
            created_at: inserted.created_at,
            responses: record.responses,
            score: record.score,
            category: record.category,
            recommendations: record.recommendations,
        }
    }

    /// Category and advice re-derived from the stored score; the redundant
    /// `category`/`recommendations` columns are never trusted on read.
    pub fn outcome(&self) -> ScoreOutcome {
        ScoreOutcome::from_score(self.variant, self.score)
    }

    /// Stored responses decoded back into form state; unreadable blobs fall
    /// back to a blank form.
    pub fn answers(&self) -> Answers {
        Answers::from_responses(self.variant, &self.responses)
            .unwrap_or_else(|_| Answers::blank(self.variant))
    }

    pub fn view(&self) -> AssessmentView {
        let outcome = self.outcome();
        AssessmentView {
            id: self.id.clone(),
            variant: self.variant,
            created_at: self.created_at,
            score: self.score,
            category: outcome.category,
            recommendations: outcome.recommendations,
            responses: self.answers(),
        }
    }

    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary {
            id: self.id.clone(),
            score: self.score,
            category: self.outcome().category,
            created_at: self.created_at,
        }
    }
}

/// Filter for reading a user's records of one questionnaire.
///
/// Results are always ordered newest-first by `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub user_id: UserId,
    pub limit: Option<usize>,
}

impl RecordQuery {
    pub fn latest(user_id: UserId) -> Self {
        Self {
            user_id,
            limit: Some(1),
        }
    }
}

/// Append-only record store backing the session controller.
pub trait RecordStore: Send + Sync {
    fn insert(
        &self,
        table: &str,
        record: NewAssessmentRecord,
    ) -> Result<InsertedRecord, StoreError>;
    fn query(&self, table: &str, query: &RecordQuery)
        -> Result<Vec<AssessmentRecord>, StoreError>;
}

/// Error enumeration for store failures; callers treat every variant as a
/// retryable persistence failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store timed out")]
    Timeout,
    #[error("record store rejected request: {0}")]
    Rejected(String),
}

/// Client-facing representation of a stored assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub id: RecordId,
    pub variant: AssessmentVariant,
    pub created_at: DateTime<Utc>,
    pub score: Score,
    pub category: &'static str,
    pub recommendations: Vec<&'static str>,
    pub responses: Answers,
}

/// Compact summary used by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub id: RecordId,
    pub score: Score,
    pub category: &'static str,
    pub created_at: DateTime<Utc>,
}
