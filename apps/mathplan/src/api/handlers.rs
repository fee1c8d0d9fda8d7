//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! The core is synchronous; handlers call it directly. Every call either
//! returns quickly from the cache or blocks briefly on backing-store I/O
//! under the service lock, which is the concurrency model the core is
//! built for.

use super::{
    AppState,
    types::{
        DeleteResponsesResponse, ErrorResponse, HealthResponse, LiveResetResponse,
        MajorDetailResponse, MajorJson, MajorsResponse, PlacementResponse, PlanResponse,
        PrereqJson, PrereqsResponse, StatusResponse, StoreResponsesRequest,
        StoreResponsesResponse, TiersResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use mathplan_core::{MathPlanError, StudentId};
use std::collections::BTreeMap;

/// Map a core error onto an HTTP error response.
fn error_status(e: &MathPlanError) -> StatusCode {
    match e {
        MathPlanError::DataAccess(_) | MathPlanError::Io(_) | MathPlanError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        MathPlanError::LiveSystemUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Session tag for unauthenticated API sessions; survey writes record it
/// alongside responses.
fn session_tag(now: chrono::DateTime<Utc>) -> i64 {
    now.timestamp()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get service status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.service.catalog();

    let response = StatusResponse {
        major_count: catalog.majors().len(),
        cached_students: state.service.cached_students(),
        live_system_down: state.service.live_system_down(),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// MAJORS HANDLERS
// =============================================================================

/// List every major with its resolved tier.
pub async fn majors_handler(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.service.catalog();

    let majors = catalog
        .majors()
        .keys()
        .map(|m| MajorJson::from_major(m, catalog.tier_for_program(&m.program_code)))
        .collect();

    (StatusCode::OK, Json(MajorsResponse { majors }))
}

/// Fetch one major with its requirement.
pub async fn major_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let catalog = state.service.catalog();

    match (catalog.major(&code), catalog.requirement(&code)) {
        (Some(major), Some(requirement)) => {
            let response = MajorDetailResponse {
                major: MajorJson::from_major(major, catalog.tier_for_program(&code)),
                requirement: requirement.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("no major matches {code}"))),
        )
            .into_response(),
    }
}

/// The four tier lists.
pub async fn tiers_handler(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.service.catalog();
    let to_json = |majors: &[mathplan_core::Major]| -> Vec<MajorJson> {
        majors
            .iter()
            .map(|m| MajorJson::from_major(m, catalog.tier_for_program(&m.program_code)))
            .collect()
    };

    let response = TiersResponse {
        core_only: to_json(catalog.majors_requiring_core_only()),
        precalc: to_json(catalog.majors_requiring_precalc()),
        calc1: to_json(catalog.majors_requiring_calc1()),
        beyond_calc1: to_json(catalog.majors_requiring_beyond_calc1()),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// PREREQS HANDLER
// =============================================================================

/// The full course → prerequisite-rules map.
pub async fn prereqs_handler(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.service.required_prereqs();

    let prereqs: BTreeMap<String, Vec<PrereqJson>> = index
        .prereqs()
        .iter()
        .map(|(course, rules)| {
            (
                course.as_str().to_string(),
                rules.iter().map(PrereqJson::from).collect(),
            )
        })
        .collect();

    (StatusCode::OK, Json(PrereqsResponse { prereqs }))
}

// =============================================================================
// PLACEMENT HANDLER
// =============================================================================

/// Resolve placement status for one student.
pub async fn placement_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    let id = StudentId::new(&student_id);
    match state.service.math_placement_status(&id) {
        Ok(status) => (
            StatusCode::OK,
            Json(PlacementResponse::new(&student_id, &status)),
        )
            .into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse::new(format!("placement lookup failed: {e}"))),
        )
            .into_response(),
    }
}

// =============================================================================
// PLAN HANDLER
// =============================================================================

/// Fetch the cached plan data for one student.
pub async fn plan_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    let id = StudentId::new(&student_id);
    let now = Utc::now();

    match state.service.student_data(&id, now, session_tag(now), true) {
        Ok(Some(data)) => (StatusCode::OK, Json(PlanResponse::from_data(&data))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "no student record for {student_id}"
            ))),
        )
            .into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse::new(format!("plan lookup failed: {e}"))),
        )
            .into_response(),
    }
}

// =============================================================================
// SURVEY RESPONSE HANDLERS
// =============================================================================

/// Store survey answers for a student (write-through).
pub async fn store_responses_handler(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<StoreResponsesRequest>,
) -> impl IntoResponse {
    let id = StudentId::new(&student_id);
    let now = Utc::now();
    let tag = session_tag(now);

    // The write needs the student record; go through the cache.
    let student = match state.service.student_data(&id, now, tag, false) {
        Ok(Some(data)) => data.student.clone(),
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(StoreResponsesResponse::error(format!(
                    "no student record for {student_id}"
                ))),
            );
        }
        Err(e) => {
            return (
                error_status(&e),
                Json(StoreResponsesResponse::error(format!(
                    "student lookup failed: {e}"
                ))),
            );
        }
    };

    match state.service.store_math_plan_responses(
        &student,
        &request.page_id,
        &request.questions,
        &request.answers,
        now,
        tag,
    ) {
        Ok(()) => (StatusCode::OK, Json(StoreResponsesResponse::ok())),
        Err(e) => (
            error_status(&e),
            Json(StoreResponsesResponse::error(format!("store failed: {e}"))),
        ),
    }
}

/// Delete every response on one survey page for a student.
pub async fn delete_responses_handler(
    State(state): State<AppState>,
    Path((student_id, page_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let id = StudentId::new(&student_id);
    let now = Utc::now();

    let student = match state.service.student_data(&id, now, session_tag(now), false) {
        Ok(Some(data)) => data.student.clone(),
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!(
                    "no student record for {student_id}"
                ))),
            )
                .into_response();
        }
        Err(e) => {
            return (
                error_status(&e),
                Json(ErrorResponse::new(format!("student lookup failed: {e}"))),
            )
                .into_response();
        }
    };

    match state
        .service
        .delete_math_plan_responses(&student, &page_id, now)
    {
        Ok(deleted) => {
            (StatusCode::OK, Json(DeleteResponsesResponse { deleted })).into_response()
        }
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse::new(format!("delete failed: {e}"))),
        )
            .into_response(),
    }
}

// =============================================================================
// LIVE SYSTEM HANDLER
// =============================================================================

/// Clear the live-system down flag (the external reset).
pub async fn live_reset_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.service.reset_live_system();
    (
        StatusCode::OK,
        Json(LiveResetResponse {
            live_system_down: state.service.live_system_down(),
        }),
    )
}
