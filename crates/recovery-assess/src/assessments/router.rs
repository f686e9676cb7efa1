use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::crisis_plan;
use super::domain::{Answers, AssessmentVariant};
use super::records::{AssessmentRecord, RecordStore};
use super::session::{AssessmentService, SessionError};
use crate::identity::{IdentityProvider, RequestIdentity, UserId};

/// Router builder exposing the assessment endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/api/v1/assessments/:variant", post(submit_handler::<S>))
        .route(
            "/api/v1/assessments/:variant/latest",
            get(latest_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:variant/history",
            get(history_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:variant/score",
            post(preview_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .route("/api/v1/crisis-plan", get(crisis_plan_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryParams {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(variant): Path<String>,
    headers: HeaderMap,
    axum::Json(responses): axum::Json<Value>,
) -> Response
where
    S: RecordStore + 'static,
{
    let user_id = match authenticated(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let answers = match decode_answers(&variant, &responses) {
        Ok(answers) => answers,
        Err(response) => return response,
    };

    match service.submit(&user_id, &answers) {
        Ok(receipt) => {
            let payload = json!({
                "assessment": receipt.record.view(),
                "outcome": receipt.outcome,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn latest_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(variant): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let user_id = match authenticated(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let variant = match parse_variant(&variant) {
        Ok(variant) => variant,
        Err(response) => return response,
    };

    match service.load_latest(&user_id, variant) {
        Ok(Some(record)) => {
            let payload = json!({ "status": "found", "assessment": record.view() });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => {
            let payload = json!({
                "status": "none",
                "variant": variant,
                "required_fields": variant.profile().required_fields,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(variant): Path<String>,
    Query(params): Query<HistoryParams>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let user_id = match authenticated(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let variant = match parse_variant(&variant) {
        Ok(variant) => variant,
        Err(response) => return response,
    };

    match service.history(&user_id, variant, params.limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(AssessmentRecord::view).collect();
            let payload = json!({ "variant": variant, "assessments": views });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn preview_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(variant): Path<String>,
    axum::Json(responses): axum::Json<Value>,
) -> Response
where
    S: RecordStore + 'static,
{
    match decode_answers(&variant, &responses) {
        Ok(answers) => {
            let outcome = service.preview(&answers);
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let user_id = match authenticated(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    match service.dashboard(&user_id) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn crisis_plan_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let user_id = match authenticated(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let record = match service.load_latest(&user_id, AssessmentVariant::Stress) {
        Ok(Some(record)) => record,
        Ok(None) => {
            let payload = json!({ "error": "no stress assessment on file" });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
        Err(error) => return session_error_response(error),
    };

    let today = Utc::now().date_naive();
    match crisis_plan::render(&record, user_id.as_str(), today) {
        Ok(plan) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                crisis_plan::file_name(user_id.as_str(), today)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                plan,
            )
                .into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn authenticated(headers: &HeaderMap) -> Result<UserId, Response> {
    RequestIdentity::new(headers).current_user_id().ok_or_else(|| {
        let payload = json!({ "error": "sign in to use assessments" });
        (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
    })
}

fn parse_variant(raw: &str) -> Result<AssessmentVariant, Response> {
    AssessmentVariant::parse(raw).ok_or_else(|| {
        let payload = json!({ "error": format!("unknown assessment '{raw}'") });
        (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
    })
}

fn decode_answers(raw_variant: &str, responses: &Value) -> Result<Answers, Response> {
    let variant = parse_variant(raw_variant)?;
    Answers::from_responses(variant, responses).map_err(|error| {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    })
}

fn session_error_response(error: SessionError) -> Response {
    match error {
        SessionError::Validation(validation) => {
            let payload = json!({
                "error": validation.to_string(),
                "missing": validation.missing,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        SessionError::Persistence { ref pending, .. } => {
            let result = pending.as_ref().map(|pending| &pending.outcome);
            let payload = json!({
                "error": error.to_string(),
                "retryable": true,
                "result": result,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
