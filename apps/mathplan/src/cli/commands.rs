//! # CLI Command Implementations

use crate::api;
use crate::config::AppConfig;
use chrono::Duration;
use mathplan_core::{
    BackingStores, MajorMathRequirement, MathPlanError, MathPlanService, MathTier, MemoryStore,
    NullLiveCreditStore, RedbStore, StudentId,
};
use std::path::Path;
use std::sync::Arc;

/// Build the advising service over the selected backend.
fn build_service(
    database: &Path,
    backend: &str,
    ttl_minutes: i64,
) -> Result<Arc<MathPlanService>, MathPlanError> {
    let ttl = Duration::minutes(ttl_minutes);
    match backend {
        "memory" => {
            let store = Arc::new(MemoryStore::new());
            Ok(Arc::new(MathPlanService::with_ttl(
                BackingStores::shared(store.clone()),
                store,
                ttl,
            )))
        }
        _ => {
            let store = Arc::new(RedbStore::open(database)?);
            Ok(Arc::new(MathPlanService::with_ttl(
                BackingStores::shared(store),
                Arc::new(NullLiveCreditStore),
                ttl,
            )))
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), MathPlanError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| MathPlanError::Serialization(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn parse_tier(tier: &str) -> Option<MathTier> {
    match tier {
        "core-only" => Some(MathTier::CoreOnly),
        "precalc" => Some(MathTier::Precalc),
        "calc1" => Some(MathTier::Calc1),
        "beyond-calc1" => Some(MathTier::BeyondCalc1),
        _ => None,
    }
}

fn format_requirement(req: &MajorMathRequirement) -> String {
    let mut out = String::new();
    for (i, slot) in req.semesters.iter().enumerate() {
        let rendered = if slot.is_empty() {
            "(none)".to_string()
        } else {
            slot.iter()
                .map(|opt| {
                    let mark = if opt.critical {
                        "!"
                    } else if opt.recommended {
                        "."
                    } else {
                        ""
                    };
                    format!("{}{}", opt.key, mark)
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.push_str(&format!("  semester {}: {}\n", i + 1, rendered));
    }
    out
}

// =============================================================================
// SERVE
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(
    database: &Path,
    backend: &str,
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<(), MathPlanError> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = build_service(database, backend, config.cache.ttl_minutes)?;
    api::run_server(&config.bind_addr(), service, config.limits.rate_limit).await
}

// =============================================================================
// STATUS
// =============================================================================

/// Show catalog and cache status.
pub fn cmd_status(database: &Path, backend: &str, json_mode: bool) -> Result<(), MathPlanError> {
    let service = build_service(database, backend, mathplan_core::DEFAULT_TTL_MINUTES)?;
    let catalog = service.catalog();

    if json_mode {
        return print_json(&serde_json::json!({
            "majors": catalog.majors().len(),
            "course_groups": catalog.course_groups().len(),
            "courses": catalog.courses().len(),
            "cached_students": service.cached_students(),
            "live_system_down": service.live_system_down(),
        }));
    }

    println!("Catalog:");
    println!("  majors:         {}", catalog.majors().len());
    println!("  course groups:  {}", catalog.course_groups().len());
    println!("  courses:        {}", catalog.courses().len());
    println!("Cache:");
    println!("  students:       {}", service.cached_students());
    println!("Live system:");
    println!(
        "  state:          {}",
        if service.live_system_down() { "down" } else { "up" }
    );
    Ok(())
}

// =============================================================================
// MAJORS
// =============================================================================

/// List majors, optionally filtered by tier.
pub fn cmd_majors(
    database: &Path,
    backend: &str,
    json_mode: bool,
    tier: Option<&str>,
) -> Result<(), MathPlanError> {
    let service = build_service(database, backend, mathplan_core::DEFAULT_TTL_MINUTES)?;
    let catalog = service.catalog();

    let filter = match tier {
        Some(t) => match parse_tier(t) {
            Some(tier) => Some(tier),
            None => {
                return Err(MathPlanError::DataAccess(format!(
                    "unknown tier: {t} (expected core-only, precalc, calc1, beyond-calc1)"
                )));
            }
        },
        None => None,
    };

    let majors: Vec<_> = catalog
        .majors()
        .keys()
        .filter(|m| {
            filter.is_none_or(|tier| catalog.tier_for_program(&m.program_code) == Some(tier))
        })
        .collect();

    if json_mode {
        let list: Vec<_> = majors
            .iter()
            .map(|m| {
                serde_json::json!({
                    "program_code": m.program_code,
                    "major_name": m.major_name,
                    "concentration_name": m.concentration_name,
                    "tier": catalog.tier_for_program(&m.program_code).map(MathTier::as_str),
                })
            })
            .collect();
        return print_json(&serde_json::Value::Array(list));
    }

    for major in majors {
        let tier = catalog
            .tier_for_program(&major.program_code)
            .map_or("?", MathTier::as_str);
        match &major.concentration_name {
            Some(conc) => {
                println!("{:<14} {} - {} [{}]", major.program_code, major.major_name, conc, tier);
            }
            None => println!("{:<14} {} [{}]", major.program_code, major.major_name, tier),
        }
    }
    Ok(())
}

/// Show one major and its three-semester requirement.
pub fn cmd_major(
    database: &Path,
    backend: &str,
    json_mode: bool,
    code: &str,
) -> Result<(), MathPlanError> {
    let service = build_service(database, backend, mathplan_core::DEFAULT_TTL_MINUTES)?;
    let catalog = service.catalog();

    let (Some(major), Some(req)) = (catalog.major(code), catalog.requirement(code)) else {
        println!("No major matches program code {code}");
        return Ok(());
    };

    if json_mode {
        return print_json(&serde_json::json!({
            "program_code": major.program_code,
            "major_name": major.major_name,
            "concentration_name": major.concentration_name,
            "active": major.active,
            "placeholder": major.placeholder,
            "catalog_url": major.catalog_url,
            "tier": catalog.tier_for_program(code).map(MathTier::as_str),
            "semesters": req.semesters,
        }));
    }

    println!("{} - {}", major.program_code, major.major_name);
    if let Some(conc) = &major.concentration_name {
        println!("  concentration: {conc}");
    }
    println!(
        "  tier: {}",
        catalog.tier_for_program(code).map_or("?", MathTier::as_str)
    );
    println!("  catalog: {}", major.catalog_url);
    print!("{}", format_requirement(req));
    Ok(())
}

/// Show the four tier lists.
pub fn cmd_tiers(database: &Path, backend: &str, json_mode: bool) -> Result<(), MathPlanError> {
    let service = build_service(database, backend, mathplan_core::DEFAULT_TTL_MINUTES)?;
    let catalog = service.catalog();

    if json_mode {
        let lists: serde_json::Map<String, serde_json::Value> = catalog
            .tier_lists()
            .iter()
            .map(|(tier, majors)| {
                (
                    tier.as_str().to_string(),
                    serde_json::Value::Array(
                        majors
                            .iter()
                            .map(|m| serde_json::Value::String(m.program_code.clone()))
                            .collect(),
                    ),
                )
            })
            .collect();
        return print_json(&serde_json::Value::Object(lists));
    }

    for (tier, majors) in catalog.tier_lists() {
        println!("{} ({}):", tier.as_str(), majors.len());
        for major in majors {
            match &major.concentration_name {
                Some(conc) => println!("  {:<14} {} - {}", major.program_code, major.major_name, conc),
                None => println!("  {:<14} {}", major.program_code, major.major_name),
            }
        }
        println!();
    }
    Ok(())
}

// =============================================================================
// PLACEMENT
// =============================================================================

/// Resolve a student's placement status.
pub fn cmd_placement(
    database: &Path,
    backend: &str,
    json_mode: bool,
    student_id: &str,
) -> Result<(), MathPlanError> {
    let service = build_service(database, backend, mathplan_core::DEFAULT_TTL_MINUTES)?;
    let status = service.math_placement_status(&StudentId::new(student_id))?;

    if json_mode {
        return print_json(&serde_json::json!({
            "student_id": student_id,
            "placement_needed": status.placement_needed,
            "placement_complete": status.placement_complete,
            "how_satisfied": status.how_satisfied.as_str(),
        }));
    }

    println!("Student {student_id}:");
    println!("  placement needed:   {}", status.placement_needed);
    println!("  placement complete: {}", status.placement_complete);
    println!("  how satisfied:      {}", status.how_satisfied.as_str());
    Ok(())
}
