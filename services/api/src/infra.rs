use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use recovery_assess::assessments::{
    Answers, AssessmentRecord, AssessmentVariant, InsertedRecord, NewAssessmentRecord, RecordId,
    RecordQuery, RecordStore, StoreError,
};
use recovery_assess::error::AppError;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreRows {
    tables: HashMap<String, Vec<AssessmentRecord>>,
    next_id: u64,
    last_created_at: Option<DateTime<Utc>>,
}

/// Process-local record store; every insert gets a strictly later timestamp.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    rows: Arc<Mutex<StoreRows>>,
}

impl InMemoryRecordStore {
    fn lock(&self) -> Result<MutexGuard<'_, StoreRows>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(
        &self,
        table: &str,
        record: NewAssessmentRecord,
    ) -> Result<InsertedRecord, StoreError> {
        let mut rows = self.lock()?;
        rows.next_id += 1;
        let now = Utc::now();
        let created_at = match rows.last_created_at {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        };
        rows.last_created_at = Some(created_at);

        let inserted = InsertedRecord {
            id: RecordId(format!("asm-{:06}", rows.next_id)),
            created_at,
        };
        rows.tables
            .entry(table.to_string())
            .or_default()
            .push(AssessmentRecord::from_insert(record, inserted.clone()));
        Ok(inserted)
    }

    fn query(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        let rows = self.lock()?;
        let mut records: Vec<AssessmentRecord> = rows
            .tables
            .get(table)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.user_id == query.user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        Ok(records)
    }
}

pub(crate) fn parse_variant(raw: &str) -> Result<AssessmentVariant, String> {
    AssessmentVariant::parse(raw)
        .ok_or_else(|| format!("unknown assessment '{raw}' (expected risk or stress)"))
}

/// Reads a JSON answers object from disk.
pub(crate) fn read_answers(path: &Path, variant: AssessmentVariant) -> Result<Answers, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let responses: Value = serde_json::from_str(&raw)?;
    Ok(Answers::from_responses(variant, &responses)?)
}
