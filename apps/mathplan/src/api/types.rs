//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use mathplan_core::{
    CourseOption, Major, MajorMathRequirement, MathPlanPlacementStatus, MathPlanStudentData,
    MathTier, RequiredPrereq,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Service status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub major_count: usize,
    pub cached_students: usize,
    pub live_system_down: bool,
}

// =============================================================================
// MAJORS
// =============================================================================

/// One catalog major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorJson {
    pub number: u16,
    pub program_code: String,
    pub major_name: String,
    pub concentration_name: Option<String>,
    pub active: bool,
    pub placeholder: bool,
    pub catalog_url: String,
    pub tier: Option<String>,
}

impl MajorJson {
    /// Convert a catalog major, attaching its resolved tier when known.
    pub fn from_major(major: &Major, tier: Option<MathTier>) -> Self {
        Self {
            number: major.number,
            program_code: major.program_code.clone(),
            major_name: major.major_name.clone(),
            concentration_name: major.concentration_name.clone(),
            active: major.active,
            placeholder: major.placeholder,
            catalog_url: major.catalog_url.clone(),
            tier: tier.map(|t| t.as_str().to_string()),
        }
    }
}

/// One option within a semester slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionJson {
    pub key: String,
    pub critical: bool,
    pub recommended: bool,
}

impl From<&CourseOption> for OptionJson {
    fn from(opt: &CourseOption) -> Self {
        Self {
            key: opt.key.clone(),
            critical: opt.critical,
            recommended: opt.recommended,
        }
    }
}

/// A three-semester requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementJson {
    pub program_code: String,
    pub semesters: Vec<Vec<OptionJson>>,
}

impl From<&MajorMathRequirement> for RequirementJson {
    fn from(req: &MajorMathRequirement) -> Self {
        Self {
            program_code: req.program_code.clone(),
            semesters: req
                .semesters
                .iter()
                .map(|slot| slot.iter().map(OptionJson::from).collect())
                .collect(),
        }
    }
}

/// Full majors listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorsResponse {
    pub majors: Vec<MajorJson>,
}

/// One major with its requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorDetailResponse {
    pub major: MajorJson,
    pub requirement: RequirementJson,
}

/// The four tier lists, ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiersResponse {
    pub core_only: Vec<MajorJson>,
    pub precalc: Vec<MajorJson>,
    pub calc1: Vec<MajorJson>,
    pub beyond_calc1: Vec<MajorJson>,
}

// =============================================================================
// PREREQUISITES
// =============================================================================

/// One prerequisite rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrereqJson {
    pub course: String,
    pub tag: bool,
    pub alternatives: Vec<String>,
}

impl From<&RequiredPrereq> for PrereqJson {
    fn from(rule: &RequiredPrereq) -> Self {
        Self {
            course: rule.course.as_str().to_string(),
            tag: rule.tag,
            alternatives: rule
                .alternatives
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
        }
    }
}

/// The full course → rules map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrereqsResponse {
    pub prereqs: BTreeMap<String, Vec<PrereqJson>>,
}

// =============================================================================
// PLACEMENT & PLAN
// =============================================================================

/// Resolved placement status for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementResponse {
    pub student_id: String,
    pub placement_needed: bool,
    pub placement_complete: bool,
    pub how_satisfied: String,
}

impl PlacementResponse {
    pub fn new(student_id: &str, status: &MathPlanPlacementStatus) -> Self {
        Self {
            student_id: student_id.to_string(),
            placement_needed: status.placement_needed,
            placement_complete: status.placement_complete,
            how_satisfied: status.how_satisfied.as_str().to_string(),
        }
    }
}

/// Cached plan data for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub student_id: String,
    pub program_code: Option<String>,
    pub majors_of_interest: Vec<MajorJson>,
    pub recommended_tier: String,
    pub placement: PlacementResponse,
    pub created: String,
}

impl PlanResponse {
    pub fn from_data(data: &MathPlanStudentData) -> Self {
        let student_id = data.student.student_id.as_str();
        Self {
            student_id: student_id.to_string(),
            program_code: data.student.program_code.clone(),
            majors_of_interest: data
                .majors_of_interest
                .iter()
                .map(|m| MajorJson::from_major(m, None))
                .collect(),
            recommended_tier: data.recommended_tier.as_str().to_string(),
            placement: PlacementResponse::new(student_id, &data.placement),
            created: data.created.to_rfc3339(),
        }
    }
}

// =============================================================================
// SURVEY RESPONSES
// =============================================================================

/// Survey answers submission. `answers[i]` pairs with `questions[i]`; a
/// null answer retracts a same-minute response to that question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponsesRequest {
    pub page_id: String,
    pub questions: Vec<u32>,
    pub answers: Vec<Option<String>>,
}

/// Acknowledgement of a survey write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponsesResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl StoreResponsesResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Acknowledgement of a survey page deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponsesResponse {
    pub deleted: bool,
}

// =============================================================================
// LIVE SYSTEM
// =============================================================================

/// State of the live-system gate after a reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveResetResponse {
    pub live_system_down: bool,
}

/// Generic error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
