use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use jobboard_core::{JobOpportunity, JobService};
use jobboard_storage::Database;

use crate::form::JobView;
use crate::{companies, jobs, telemetry};

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    service: JobService<Database>,
    currency_symbol: Arc<str>,
    clock: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, storage: Database, currency_symbol: &str) -> Self {
        Self {
            metrics,
            service: JobService::new(storage),
            currency_symbol: Arc::from(currency_symbol),
            clock: Arc::new(Utc::now),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn service(&self) -> &JobService<Database> {
        &self.service
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Calendar date used as the default posted date.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn view(&self, job: JobOpportunity) -> JobView {
        JobView::new(job, &self.currency_symbol)
    }

    pub fn views(&self, jobs: Vec<JobOpportunity>) -> Vec<JobView> {
        jobs.into_iter().map(|job| self.view(job)).collect()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route("/jobs/all", get(jobs::list_all))
        .route(
            "/jobs/:id",
            get(jobs::show).put(jobs::update).delete(jobs::delete),
        )
        .route("/companies", get(companies::list))
        .route("/companies/names", get(companies::names))
        .route("/companies/:id", get(companies::show))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
