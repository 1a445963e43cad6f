// web-server/src/api/jobs.rs
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use common::models::salt::{JobExecuteRequest, JobList, JobResult, JobStatus};
use common::Envelope;
use serde_json::{Map, Value};

use super::{run, run_audited};
use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::salt::{first_return, Command, Verb};
use crate::state::AppState;
use crate::store::audit::AuditEvent;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(execute_job).service(list_jobs).service(get_job);
}

fn job_status(jid: &str, data: &Value) -> JobStatus {
    JobStatus {
        jid: jid.to_string(),
        function: data.get("function").and_then(Value::as_str).unwrap_or_default().to_string(),
        minions: data
            .get("minions")
            .and_then(Value::as_array)
            .map(|minions| {
                minions
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        start_time: data.get("start_time").and_then(Value::as_str).map(str::to_string),
        status: data.get("status").and_then(Value::as_str).unwrap_or("unknown").to_string(),
    }
}

#[get("/jobs")]
pub async fn list_jobs(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let response = run(&state, Command::new(Verb::ListJobs)).await?;

    let jobs: Vec<JobStatus> = first_return(&response)
        .as_object()
        .map(|jobs| jobs.iter().map(|(jid, data)| job_status(jid, data)).collect())
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(JobList { total: jobs.len(), jobs }))
}

#[get("/jobs/{jid}")]
pub async fn get_job(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let jid = path.into_inner();
    let response = run(&state, Command::new(Verb::GetJob).resource_id(&jid)).await?;

    let data = first_return(&response);
    if data.as_object().map_or(true, Map::is_empty) {
        return Err(ApiError::not_found("Job"));
    }

    Ok(HttpResponse::Ok().json(JobResult {
        status: job_status(&jid, data),
        end_time: data.get("end_time").and_then(Value::as_str).map(str::to_string),
        result: data.get("result").cloned(),
    }))
}

#[post("/jobs/execute")]
pub async fn execute_job(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    job: web::Json<JobExecuteRequest>,
) -> ApiResult<HttpResponse> {
    let job = job.into_inner();
    tracing::info!("{} executing {} on {}", user.username, job.function, job.target);

    let event = AuditEvent::new("job.execute", "job", job.target.clone())
        .detail("function", job.function.clone())
        .detail("target", job.target.clone());
    let command = Command::new(Verb::Execute)
        .target(job.target)
        .function(job.function)
        .args(job.args)
        .kwargs(job.kwargs);

    let data = run_audited(&state, &user, &req, event, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message("Job submitted successfully")))
}
