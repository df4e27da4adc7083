use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Company, CompanyId, CompanyOption, JobDetails, JobId, JobOpportunity};
use crate::query::JobQuery;

/// Persistence port for job opportunities and their companies.
///
/// Every returned `JobOpportunity` carries its resolved `company_record`.
/// Implementations do not validate; callers go through [`crate::service::JobService`].
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Every record, in storage order.
    async fn list_all(&self) -> Result<Vec<JobOpportunity>, RepositoryError>;

    /// Records matching the filters of `query`, in the requested order.
    async fn find(&self, query: &JobQuery) -> Result<Vec<JobOpportunity>, RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<JobOpportunity>, RepositoryError>;

    /// Persists a new record and returns it with its assigned id.
    async fn add(&self, details: &JobDetails) -> Result<JobOpportunity, RepositoryError>;

    /// Replaces the stored record with the same id.
    ///
    /// Fails with [`RepositoryError::Conflict`] when no such record exists anymore.
    async fn update(&self, job: &JobOpportunity) -> Result<(), RepositoryError>;

    /// Removes the record if present. Absent ids are not an error.
    async fn delete(&self, id: JobId) -> Result<(), RepositoryError>;

    async fn list_company_names(&self) -> Result<Vec<String>, RepositoryError>;

    async fn list_companies(&self) -> Result<Vec<CompanyOption>, RepositoryError>;

    async fn get_company_by_id(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError>;
}

/// Failures surfaced by a [`JobRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("job opportunity {0} was removed or changed before the update committed")]
    Conflict(JobId),
    #[error("company {0} does not exist")]
    UnknownCompany(CompanyId),
    #[error("storage backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}
