//! Domain layer of the job board: records, validation, listing queries and the
//! service that guards the persistence port.

pub mod currency;
pub mod model;
pub mod query;
pub mod repository;
pub mod service;
pub mod validation;

pub use model::{Company, CompanyId, CompanyOption, JobDetails, JobId, JobOpportunity};
pub use query::{JobQuery, SortField, SortOrder};
pub use repository::{JobRepository, RepositoryError};
pub use service::{JobService, ServiceError};
pub use validation::{validate, FieldError, JobField, ValidationErrors};
