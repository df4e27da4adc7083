use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use jobboard_core::{Company, JobId, JobOpportunity, JobQuery, ServiceError};

use crate::form::{JobForm, JobView};
use crate::problem::ProblemResponse;
use crate::router::AppState;
use crate::telemetry::{record_mutation, record_query};

/// Query string accepted by the job listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    search_term: Option<String>,
    company: Option<String>,
    location: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

impl ListParams {
    fn into_query(self) -> JobQuery {
        JobQuery::from_params(
            self.search_term,
            self.company,
            self.location,
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
        )
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<JobView>>, ProblemResponse> {
    record_query("filtered");
    let query = params.into_query();
    let jobs = state.service().find_filtered(&query).await?;
    Ok(Json(state.views(jobs)))
}

pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobView>>, ProblemResponse> {
    record_query("all");
    let jobs = state.service().list_all().await?;
    Ok(Json(state.views(jobs)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> Result<Json<JobView>, ProblemResponse> {
    record_query("by_id");
    let job = state.service().get_by_id(id).await?;
    Ok(Json(state.view(job)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<JobForm>, JsonRejection>,
) -> Result<impl IntoResponse, ProblemResponse> {
    let Json(form) = payload.map_err(invalid_body)?;
    let company = resolve_company(&state, &form)
        .await
        .map_err(|err| mutation_failed("create", None, err))?;

    let result = match form.into_details(company.as_ref(), state.today()) {
        Ok(details) => state.service().create(details).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match result {
        Ok(job) => {
            record_mutation("create", "ok");
            info!(
                stage = "jobs",
                id = job.id,
                title = %job.details.title,
                "job opportunity created"
            );
            let location = format!("/jobs/{}", job.id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(state.view(job)),
            ))
        }
        Err(err) => Err(mutation_failed("create", None, err)),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
    payload: Result<Json<JobForm>, JsonRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let Json(form) = payload.map_err(invalid_body)?;
    let company = resolve_company(&state, &form)
        .await
        .map_err(|err| mutation_failed("update", Some(id), err))?;

    let result = match form.into_details(company.as_ref(), state.today()) {
        Ok(details) => state.service().update(&JobOpportunity::new(id, details)).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };

    match result {
        Ok(()) => {
            record_mutation("update", "ok");
            info!(stage = "jobs", id, "job opportunity updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(ServiceError::Conflict(stale_id)) => {
            let reread = state.service().get_by_id(stale_id).await;
            Err(mutation_failed("update", Some(id), stale_update(stale_id, reread)))
        }
        Err(err) => Err(mutation_failed("update", Some(id), err)),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> Result<StatusCode, ProblemResponse> {
    match state.service().delete(id).await {
        Ok(()) => {
            record_mutation("delete", "ok");
            info!(stage = "jobs", id, "job opportunity deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => Err(mutation_failed("delete", Some(id), err)),
    }
}

/// Looks up the company named by the form. An unknown id is an error; a
/// missing one is left to validation.
async fn resolve_company(
    state: &AppState,
    form: &JobForm,
) -> Result<Option<Company>, ServiceError> {
    match form.company_id {
        Some(company_id) => state.service().get_company_by_id(company_id).await.map(Some),
        None => Ok(None),
    }
}

/// Resolves a stale update against a fresh read: a vanished record is missing,
/// a present one is a conflict, and a failed read is passed through.
fn stale_update(id: JobId, reread: Result<JobOpportunity, ServiceError>) -> ServiceError {
    match reread {
        Ok(_) => ServiceError::Conflict(id),
        Err(err) => err,
    }
}

fn mutation_failed(op: &'static str, id: Option<JobId>, err: ServiceError) -> ProblemResponse {
    let result = match &err {
        ServiceError::Validation(_) => "invalid",
        ServiceError::JobNotFound(_) | ServiceError::CompanyNotFound(_) => "not_found",
        ServiceError::Conflict(_) => "conflict",
        ServiceError::Repository(_) => "error",
    };
    record_mutation(op, result);
    match &err {
        ServiceError::Validation(errors) => {
            let field = errors.first().map(|e| e.field.as_str()).unwrap_or_default();
            warn!(stage = "jobs", op, ?id, field, error = %err, "job opportunity rejected");
        }
        _ => warn!(stage = "jobs", op, ?id, error = %err, "job opportunity mutation failed"),
    }
    err.into()
}

fn invalid_body(rejection: JsonRejection) -> ProblemResponse {
    ProblemResponse::new(rejection.status(), "invalid_body", rejection.body_text())
}
