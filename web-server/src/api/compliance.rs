// web-server/src/api/compliance.rs
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use common::models::compliance::{
    ComplianceStatus, DriftDetection, MinionCompliance, MinionFailedState,
};
use serde_json::json;

use super::run_audited;
use crate::auth::{AdminOrOperator, Authorized, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::salt::{Command, Verb};
use crate::state::AppState;
use crate::store::audit::AuditEvent;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(status)
        .service(minion_compliance)
        .service(failed_states)
        .service(drift)
        .service(remediate);
}

/// Overall figures derived from the per-minion records
pub fn summarize(minions: &[MinionCompliance]) -> ComplianceStatus {
    let total = minions.len();
    let compliant = minions.iter().filter(|m| m.is_compliant).count();
    let percentage = if total == 0 {
        100.0
    } else {
        // one decimal place
        (compliant as f64 * 1000.0 / total as f64).round() / 10.0
    };

    ComplianceStatus {
        total_minions: total,
        compliant_minions: compliant,
        non_compliant_minions: total - compliant,
        compliance_percentage: percentage,
        last_check: minions
            .iter()
            .filter_map(|m| m.last_highstate.clone())
            .max()
            .unwrap_or_default(),
    }
}

#[get("/status")]
pub async fn status(state: web::Data<AppState>, _user: CurrentUser) -> web::Json<ComplianceStatus> {
    web::Json(summarize(&state.compliance.list()))
}

#[get("/minions/{minion_id}")]
pub async fn minion_compliance(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MinionCompliance>> {
    state
        .compliance
        .get(&path)
        .map(web::Json)
        .ok_or_else(|| ApiError::not_found("Minion"))
}

#[get("/failed-states")]
pub async fn failed_states(state: web::Data<AppState>, _user: CurrentUser) -> web::Json<Vec<MinionFailedState>> {
    let failed = state
        .compliance
        .list()
        .into_iter()
        .flat_map(|minion| {
            let minion_id = minion.minion_id;
            minion
                .failed_states
                .into_iter()
                .map(move |state| MinionFailedState { minion_id: minion_id.clone(), state })
        })
        .collect();

    web::Json(failed)
}

#[get("/drift")]
pub async fn drift(state: web::Data<AppState>, _user: CurrentUser) -> web::Json<Vec<DriftDetection>> {
    web::Json(state.drift.list())
}

/// Highstate a non-compliant minion back into shape
#[post("/remediate/{minion_id}")]
pub async fn remediate(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: Authorized<AdminOrOperator>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let minion_id = path.into_inner();
    let compliance = state
        .compliance
        .get(&minion_id)
        .ok_or_else(|| ApiError::not_found("Minion"))?;

    if compliance.is_compliant {
        return Ok(HttpResponse::Ok().json(json!({
            "message": "Minion is already compliant",
            "minion_id": minion_id,
        })));
    }

    let event = AuditEvent::new("compliance.remediate", "minion", minion_id.clone());
    let command = Command::new(Verb::Highstate).target(minion_id.as_str()).kwarg("test", false);
    let job_result = run_audited(&state, &user, &req, event, command).await?;

    let failed: Vec<&str> = compliance.failed_states.iter().map(|f| f.state_name.as_str()).collect();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Remediation initiated",
        "minion_id": minion_id,
        "failed_states": failed,
        "action": "Running highstate to restore compliance",
        "job_result": job_result,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    #[test]
    fn test_summary_of_seeded_minions() {
        let minions: Vec<MinionCompliance> = seed::compliance().into_iter().map(|(_, m)| m).collect();
        let summary = summarize(&minions);

        assert_eq!(summary.total_minions, 3);
        assert_eq!(summary.compliant_minions, 2);
        assert_eq!(summary.non_compliant_minions, 1);
        assert_eq!(summary.compliance_percentage, 66.7);
        assert_eq!(summary.last_check, "2024-01-13T07:00:00");
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_minions, 0);
        assert_eq!(summary.compliance_percentage, 100.0);
    }
}
