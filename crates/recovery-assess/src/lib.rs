//! Scoring and persistence core for recovery self-assessments.
//!
//! The [`assessments`] module holds the deterministic scoring engine for the
//! relapse-risk and stress questionnaires together with the session controller
//! that loads, scores, and appends assessment records to an external store.

pub mod assessments;
pub mod config;
pub mod error;
pub mod identity;
pub mod telemetry;
