//! Per-user assessment flow: `Loading -> {Form, Results}`, `Form -> Results`
//! on a successful submit, and `Results -> Form` on retake.

use serde::Serialize;
use std::fmt;

use super::domain::{Answers, AssessmentVariant};
use super::records::RecordStore;
use super::scoring::ScoreOutcome;
use super::session::{AssessmentService, PendingSubmission, SessionError, SubmissionReceipt};
use crate::identity::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Loading,
    Form,
    Results,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Form => "form",
            SessionPhase::Results => "results",
        };
        f.write_str(label)
    }
}

/// State owned by one user working through one questionnaire.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    user_id: UserId,
    variant: AssessmentVariant,
    phase: SessionPhase,
    answers: Answers,
    outcome: Option<ScoreOutcome>,
    pending: Option<PendingSubmission>,
    notice: Option<String>,
}

impl AssessmentSession {
    pub fn new(user_id: UserId, variant: AssessmentVariant) -> Self {
        Self {
            user_id,
            variant,
            phase: SessionPhase::Loading,
            answers: Answers::blank(variant),
            outcome: None,
            pending: None,
            notice: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn variant(&self) -> AssessmentVariant {
        self.variant
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn outcome(&self) -> Option<&ScoreOutcome> {
        self.outcome.as_ref()
    }

    /// Last recoverable problem worth surfacing (failed load or save).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// A scored result is waiting for a successful save.
    pub fn pending(&self) -> Option<&PendingSubmission> {
        self.pending.as_ref()
    }

    /// Loads the previous assessment; a store failure degrades to a blank form.
    pub fn mount<S>(&mut self, service: &AssessmentService<S>) -> Result<SessionPhase, FlowError>
    where
        S: RecordStore + 'static,
    {
        self.expect_phase(SessionPhase::Loading, "mount")?;

        match service.load_latest(&self.user_id, self.variant) {
            Ok(Some(record)) => {
                self.answers = record.answers();
                self.outcome = Some(record.outcome());
                self.phase = SessionPhase::Results;
            }
            Ok(None) => {
                self.phase = SessionPhase::Form;
            }
            Err(err) => {
                self.notice = Some(format!("could not load your previous assessment: {err}"));
                self.phase = SessionPhase::Form;
            }
        }

        Ok(self.phase)
    }

    /// Replaces the in-memory answers wholesale.
    pub fn edit(&mut self, answers: Answers) -> Result<(), FlowError> {
        self.expect_phase(SessionPhase::Form, "edit")?;
        if answers.variant() != self.variant {
            return Err(FlowError::VariantMismatch {
                expected: self.variant,
                found: answers.variant(),
            });
        }
        self.answers = answers;
        self.pending = None;
        Ok(())
    }

    /// Scores and saves the current answers. While an unsaved result is
    /// pending the submit stays disabled until `retry_save` or `edit`.
    pub fn submit<S>(&mut self, service: &AssessmentService<S>) -> Result<&ScoreOutcome, FlowError>
    where
        S: RecordStore + 'static,
    {
        self.expect_phase(SessionPhase::Form, "submit")?;
        if self.pending.is_some() {
            return Err(FlowError::SavePending);
        }
        let result = service.submit(&self.user_id, &self.answers);
        self.settle(result)
    }

    /// Saves the pending result again without rescoring.
    pub fn retry_save<S>(
        &mut self,
        service: &AssessmentService<S>,
    ) -> Result<&ScoreOutcome, FlowError>
    where
        S: RecordStore + 'static,
    {
        self.expect_phase(SessionPhase::Form, "retry_save")?;
        let pending = self.pending.clone().ok_or(FlowError::NothingToRetry)?;
        let result = service.save(pending);
        self.settle(result)
    }

    /// Back to the form with the last answers kept as defaults.
    pub fn retake(&mut self) -> Result<(), FlowError> {
        self.expect_phase(SessionPhase::Results, "retake")?;
        self.outcome = None;
        self.pending = None;
        self.notice = None;
        self.phase = SessionPhase::Form;
        Ok(())
    }

    fn settle(
        &mut self,
        result: Result<SubmissionReceipt, SessionError>,
    ) -> Result<&ScoreOutcome, FlowError> {
        match result {
            Ok(receipt) => {
                self.pending = None;
                self.notice = None;
                self.phase = SessionPhase::Results;
                let outcome = self.outcome.insert(receipt.outcome);
                Ok(&*outcome)
            }
            Err(SessionError::Persistence { source, pending }) => {
                self.notice = Some(format!(
                    "your results could not be saved, please try again ({source})"
                ));
                self.pending = pending.map(|boxed| *boxed);
                Err(FlowError::Session(SessionError::Persistence {
                    source,
                    pending: None,
                }))
            }
            Err(other) => Err(FlowError::Session(other)),
        }
    }

    fn expect_phase(&self, expected: SessionPhase, action: &'static str) -> Result<(), FlowError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("cannot {action} while in the {from} state")]
    InvalidTransition {
        from: SessionPhase,
        action: &'static str,
    },
    #[error("expected {expected} answers, got {found}")]
    VariantMismatch {
        expected: AssessmentVariant,
        found: AssessmentVariant,
    },
    #[error("no unsaved result to retry")]
    NothingToRetry,
    #[error("a scored result is still waiting to be saved; retry the save or edit the answers")]
    SavePending,
    #[error(transparent)]
    Session(#[from] SessionError),
}
