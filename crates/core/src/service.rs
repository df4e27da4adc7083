use thiserror::Error;

use crate::model::{Company, CompanyId, CompanyOption, JobDetails, JobId, JobOpportunity};
use crate::query::JobQuery;
use crate::repository::{JobRepository, RepositoryError};
use crate::validation::{validate, ValidationErrors};

/// Validation gatekeeper in front of a [`JobRepository`].
///
/// Mutations are validated before storage is touched; everything else is
/// delegated unchanged.
#[derive(Debug, Clone)]
pub struct JobService<R> {
    repository: R,
}

impl<R: JobRepository> JobService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn list_all(&self) -> Result<Vec<JobOpportunity>, ServiceError> {
        Ok(self.repository.list_all().await?)
    }

    pub async fn get_by_id(&self, id: JobId) -> Result<JobOpportunity, ServiceError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::JobNotFound(id))
    }

    /// Validates and persists a new job opportunity.
    pub async fn create(&self, details: JobDetails) -> Result<JobOpportunity, ServiceError> {
        validate(&details)?;
        Ok(self.repository.add(&details).await?)
    }

    /// Validates and fully replaces an existing job opportunity.
    pub async fn update(&self, job: &JobOpportunity) -> Result<(), ServiceError> {
        validate(&job.details)?;
        Ok(self.repository.update(job).await?)
    }

    pub async fn delete(&self, id: JobId) -> Result<(), ServiceError> {
        Ok(self.repository.delete(id).await?)
    }

    pub async fn find_filtered(
        &self,
        query: &JobQuery,
    ) -> Result<Vec<JobOpportunity>, ServiceError> {
        Ok(self.repository.find(query).await?)
    }

    pub async fn list_company_names(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.repository.list_company_names().await?)
    }

    pub async fn list_companies(&self) -> Result<Vec<CompanyOption>, ServiceError> {
        Ok(self.repository.list_companies().await?)
    }

    pub async fn get_company_by_id(&self, id: CompanyId) -> Result<Company, ServiceError> {
        self.repository
            .get_company_by_id(id)
            .await?
            .ok_or(ServiceError::CompanyNotFound(id))
    }
}

/// Errors returned by [`JobService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("job opportunity {0} not found")]
    JobNotFound(JobId),
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    #[error("job opportunity {0} was modified concurrently")]
    Conflict(JobId),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(id) => Self::Conflict(id),
            RepositoryError::UnknownCompany(id) => Self::CompanyNotFound(id),
            other => Self::Repository(other),
        }
    }
}
