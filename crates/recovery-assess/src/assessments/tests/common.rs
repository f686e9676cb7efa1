use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::assessments::domain::{
    Answers, LastRelapse, RiskAnswers, StressAnswers, SupportSystem, UsageFrequency,
};
use crate::assessments::records::{
    AssessmentRecord, InsertedRecord, NewAssessmentRecord, RecordId, RecordQuery, RecordStore,
    StoreError,
};
use crate::assessments::scoring::ScoringEngine;
use crate::assessments::session::AssessmentService;
use crate::config::AssessmentConfig;
use crate::identity::UserId;

pub(super) fn user() -> UserId {
    UserId("user-042".to_string())
}

pub(super) fn other_user() -> UserId {
    UserId("user-777".to_string())
}

pub(super) fn low_risk_answers() -> RiskAnswers {
    RiskAnswers {
        years_of_use: Some(0.0),
        substances: vec!["alcohol".to_string()],
        frequency: Some(UsageFrequency::Occasional),
        stress_level: Some(1.0),
        sleep_quality: Some(10.0),
        support_system: Some(SupportSystem::Strong),
        last_relapse: Some(LastRelapse::Never),
        triggers: Vec::new(),
        coping_strategies: vec!["exercise".to_string()],
        notes: None,
    }
}

pub(super) fn high_risk_answers() -> RiskAnswers {
    RiskAnswers {
        years_of_use: Some(12.0),
        substances: vec!["opioids".to_string()],
        frequency: Some(UsageFrequency::Daily),
        stress_level: Some(10.0),
        sleep_quality: Some(1.0),
        support_system: Some(SupportSystem::Absent),
        last_relapse: Some(LastRelapse::Recent),
        triggers: vec!["stress".to_string(), "loneliness".to_string()],
        coping_strategies: Vec::new(),
        notes: Some("rough month".to_string()),
    }
}

pub(super) fn stressed_answers() -> StressAnswers {
    StressAnswers {
        stress_level: Some(9.0),
        sleep_hours: Some(5.0),
        exercise_frequency: Some(0.0),
        work_pressure: Some(9.0),
        relationship_stress: Some(7.0),
        financial_stress: Some(8.0),
        health_concerns: Some(6.0),
        social_support: Some(2.0),
        coping_mechanisms: Some("walking, journaling".to_string()),
        stress_triggers: Some("deadlines, family calls".to_string()),
        physical_symptoms: vec!["headaches".to_string(), "fatigue".to_string()],
        emotional_symptoms: vec!["irritability".to_string()],
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::default()
}

pub(super) fn build_service() -> (AssessmentService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = AssessmentService::new(store.clone(), AssessmentConfig::default());
    (service, store)
}

pub(super) fn fixed_time(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(minutes)
}

pub(super) fn record_from(answers: &Answers, user_id: UserId) -> NewAssessmentRecord {
    let outcome = engine().score(answers);
    NewAssessmentRecord::from_outcome(user_id, answers, &outcome)
}

/// Append-only store that keeps rows per table and counts insert attempts.
#[derive(Default)]
pub(super) struct MemoryStore {
    rows: Mutex<Vec<(String, AssessmentRecord)>>,
    inserts: AtomicUsize,
    sequence: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub(super) fn rows(&self, table: &str) -> Vec<AssessmentRecord> {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|(row_table, _)| row_table == table)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Stores a record with an explicit timestamp, bypassing insert counting.
    pub(super) fn seed(
        &self,
        table: &str,
        record: NewAssessmentRecord,
        created_at: DateTime<Utc>,
    ) -> AssessmentRecord {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = AssessmentRecord::from_insert(
            record,
            InsertedRecord {
                id: RecordId(format!("seed-{id:03}")),
                created_at,
            },
        );
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .push((table.to_string(), stored.clone()));
        stored
    }
}

impl RecordStore for MemoryStore {
    fn insert(
        &self,
        table: &str,
        record: NewAssessmentRecord,
    ) -> Result<InsertedRecord, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().expect("store mutex poisoned");
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let created_at = fixed_time(60 * 24) + Duration::seconds(id as i64);
        let inserted = InsertedRecord {
            id: RecordId(format!("asm-{id:03}")),
            created_at,
        };
        rows.push((
            table.to_string(),
            AssessmentRecord::from_insert(record, inserted.clone()),
        ));
        Ok(inserted)
    }

    fn query(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        let mut records: Vec<_> = self
            .rows(table)
            .into_iter()
            .filter(|record| record.user_id == query.user_id)
            .collect();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        Ok(records)
    }
}

pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn insert(
        &self,
        _table: &str,
        _record: NewAssessmentRecord,
    ) -> Result<InsertedRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn query(
        &self,
        _table: &str,
        _query: &RecordQuery,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Fails the first `failures` inserts, then behaves like [`MemoryStore`].
pub(super) struct FlakyStore {
    pub(super) inner: MemoryStore,
    failures: AtomicUsize,
}

impl FlakyStore {
    pub(super) fn failing(failures: usize) -> Self {
        Self {
            inner: MemoryStore::default(),
            failures: AtomicUsize::new(failures),
        }
    }
}

impl RecordStore for FlakyStore {
    fn insert(
        &self,
        table: &str,
        record: NewAssessmentRecord,
    ) -> Result<InsertedRecord, StoreError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Timeout);
        }
        self.inner.insert(table, record)
    }

    fn query(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        self.inner.query(table, query)
    }
}

/// Holds every insert until the test releases it.
/// Holds the first insert between two barriers; later inserts pass straight through.
pub(super) struct GateStore {
    pub(super) entered: Barrier,
    pub(super) release: Barrier,
    pub(super) inner: MemoryStore,
    gated: AtomicBool,
}

impl Default for GateStore {
    fn default() -> Self {
        Self {
            entered: Barrier::new(2),
            release: Barrier::new(2),
            inner: MemoryStore::default(),
            gated: AtomicBool::new(false),
        }
    }
}

impl RecordStore for GateStore {
    fn insert(
        &self,
        table: &str,
        record: NewAssessmentRecord,
    ) -> Result<InsertedRecord, StoreError> {
        if !self.gated.swap(true, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
        self.inner.insert(table, record)
    }

    fn query(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        self.inner.query(table, query)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
