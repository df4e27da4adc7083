use axum::{
    extract::{Path, State},
    Json,
};

use jobboard_core::{Company, CompanyId, CompanyOption};

use crate::problem::ProblemResponse;
use crate::router::AppState;
use crate::telemetry::record_query;

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyOption>>, ProblemResponse> {
    record_query("companies");
    Ok(Json(state.service().list_companies().await?))
}

pub async fn names(State(state): State<AppState>) -> Result<Json<Vec<String>>, ProblemResponse> {
    record_query("company_names");
    Ok(Json(state.service().list_company_names().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
) -> Result<Json<Company>, ProblemResponse> {
    record_query("company_by_id");
    Ok(Json(state.service().get_company_by_id(id).await?))
}
