mod companies;
mod jobs;

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};
use thiserror::Error;

use jobboard_core::{
    Company, CompanyId, CompanyOption, JobDetails, JobId, JobOpportunity, JobQuery,
    JobRepository, RepositoryError,
};

pub use companies::{CompanyError, CompanyRepository};
pub use jobs::{JobOpportunityError, JobOpportunityRepository};

/// Top-level database handle that owns the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens a SQLite connection pool for the provided connection string,
    /// creating the database file when it does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StorageError::Connect)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`, including the seed data.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    /// Returns a handle to interact with job opportunities.
    pub fn jobs(&self) -> JobOpportunityRepository {
        JobOpportunityRepository {
            pool: self.pool.clone(),
        }
    }

    /// Returns a handle for reading company reference data.
    pub fn companies(&self) -> CompanyRepository {
        CompanyRepository {
            pool: self.pool.clone(),
        }
    }
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to sqlite: {0}")]
    Connect(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(MigrateError),
}

impl From<JobOpportunityError> for RepositoryError {
    fn from(err: JobOpportunityError) -> Self {
        match err {
            JobOpportunityError::Stale(id) => Self::Conflict(id),
            JobOpportunityError::UnknownCompany(id) => Self::UnknownCompany(id),
            other => Self::backend(other),
        }
    }
}

impl From<CompanyError> for RepositoryError {
    fn from(err: CompanyError) -> Self {
        Self::backend(err)
    }
}

#[async_trait]
impl JobRepository for Database {
    async fn list_all(&self) -> Result<Vec<JobOpportunity>, RepositoryError> {
        Ok(self.jobs().list_all().await?)
    }

    async fn find(&self, query: &JobQuery) -> Result<Vec<JobOpportunity>, RepositoryError> {
        Ok(self.jobs().find(query).await?)
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<JobOpportunity>, RepositoryError> {
        Ok(self.jobs().fetch(id).await?)
    }

    async fn add(&self, details: &JobDetails) -> Result<JobOpportunity, RepositoryError> {
        Ok(self.jobs().insert(details).await?)
    }

    async fn update(&self, job: &JobOpportunity) -> Result<(), RepositoryError> {
        Ok(self.jobs().replace(job).await?)
    }

    async fn delete(&self, id: JobId) -> Result<(), RepositoryError> {
        self.jobs().remove(id).await?;
        Ok(())
    }

    async fn list_company_names(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.companies().list_names().await?)
    }

    async fn list_companies(&self) -> Result<Vec<CompanyOption>, RepositoryError> {
        Ok(self.companies().list_options().await?)
    }

    async fn get_company_by_id(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.companies().fetch(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use jobboard_core::{SortField, SortOrder};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    async fn setup_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("jobs.db").display());
        let db = Database::connect(&url).await.expect("connect");
        db.run_migrations().await.expect("migrations");
        (dir, db)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_details() -> JobDetails {
        JobDetails {
            title: "Platform Engineer".into(),
            description: "Run the deployment platform.".into(),
            company: "Vision Bionics Ltd.".into(),
            location: "Manchester".into(),
            salary: Decimal::new(7_250_050, 2),
            posted_date: date(2024, 3, 1),
            closing_date: date(2024, 4, 1),
            is_active: true,
            company_id: 3,
        }
    }

    fn ids(jobs: &[JobOpportunity]) -> Vec<JobId> {
        jobs.iter().map(|job| job.id).collect()
    }

    #[tokio::test]
    async fn migrations_seed_reference_data() {
        let (_dir, db) = setup_db().await;

        let jobs = db.list_all().await.expect("list");
        assert_eq!(ids(&jobs), vec![1, 2, 3, 4, 5]);
        assert!(jobs.iter().all(|job| job.company_record.is_some()));

        let names = db.list_company_names().await.expect("names");
        assert_eq!(
            names,
            vec![
                "Tech Solutions Inc.".to_string(),
                "Data Insights Ltd.".to_string(),
                "Vision Bionics Ltd.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn search_term_matches_title_substring_case_sensitively() {
        let (_dir, db) = setup_db().await;

        let jobs = db
            .find(&JobQuery::new().search("Software"))
            .await
            .expect("find");
        assert_eq!(ids(&jobs), vec![1, 3, 5]);
        assert!(jobs.iter().all(|job| {
            job.details.title == "Software Engineer"
                || job.details.title == "Senior Software Engineer"
        }));

        let jobs = db
            .find(&JobQuery::new().search("software"))
            .await
            .expect("find");
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn company_filter_matches_joined_name_exactly() {
        let (_dir, db) = setup_db().await;

        let jobs = db
            .find(&JobQuery::new().company("Tech Solutions Inc."))
            .await
            .expect("find");
        assert_eq!(ids(&jobs), vec![1, 3]);
        assert!(jobs
            .iter()
            .all(|job| job.company_name() == Some("Tech Solutions Inc.")));

        let jobs = db
            .find(&JobQuery::new().company("Tech Solutions"))
            .await
            .expect("find");
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn location_filter_is_exact() {
        let (_dir, db) = setup_db().await;

        let jobs = db
            .find(&JobQuery::new().location("New York"))
            .await
            .expect("find");
        assert_eq!(ids(&jobs), vec![2, 4]);
    }

    #[tokio::test]
    async fn sorts_by_title_in_both_directions() {
        let (_dir, db) = setup_db().await;

        let asc = db
            .find(&JobQuery::new().sort_by(SortField::Title, SortOrder::Asc))
            .await
            .expect("find");
        let titles: Vec<&str> = asc.iter().map(|job| job.details.title.as_str()).collect();
        assert!(titles.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(titles.first(), Some(&"Data Analyst"));

        let desc = db
            .find(&JobQuery::new().sort_by(SortField::Title, SortOrder::Desc))
            .await
            .expect("find");
        let titles: Vec<&str> = desc.iter().map(|job| job.details.title.as_str()).collect();
        assert!(titles.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(titles.first(), Some(&"Software Engineer"));
    }

    #[tokio::test]
    async fn sorts_by_closing_date_descending() {
        let (_dir, db) = setup_db().await;

        let jobs = db
            .find(&JobQuery::new().sort_by(SortField::ClosingDate, SortOrder::Desc))
            .await
            .expect("find");
        let dates: Vec<NaiveDate> = jobs.iter().map(|job| job.details.closing_date).collect();
        assert!(dates.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(dates.first(), Some(&date(2023, 12, 1)));
        assert_eq!(dates.last(), Some(&date(2023, 11, 25)));
    }

    #[tokio::test]
    async fn sorts_by_company_name_and_active_flag() {
        let (_dir, db) = setup_db().await;

        let jobs = db
            .find(&JobQuery::new().sort_by(SortField::Company, SortOrder::Asc))
            .await
            .expect("find");
        let names: Vec<&str> = jobs.iter().filter_map(|job| job.company_name()).collect();
        assert!(names.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(names.first(), Some(&"Data Insights Ltd."));

        let jobs = db
            .find(&JobQuery::new().sort_by(SortField::IsActive, SortOrder::Asc))
            .await
            .expect("find");
        assert_eq!(jobs.first().map(|job| job.id), Some(2));
        assert!(!jobs[0].details.is_active);
        assert!(jobs[1..].iter().all(|job| job.details.is_active));
    }

    #[tokio::test]
    async fn default_order_is_posted_date_ascending() {
        let (_dir, db) = setup_db().await;

        let jobs = db
            .find(&JobQuery::from_params(None, None, None, Some("unknown"), Some("desc")))
            .await
            .expect("find");
        let dates: Vec<NaiveDate> = jobs.iter().map(|job| job.details.posted_date).collect();
        assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(ids(&jobs), vec![2, 4, 1, 3, 5]);
    }

    #[tokio::test]
    async fn filter_then_sort_by_salary_descending() {
        let (_dir, db) = setup_db().await;

        let query = JobQuery::new()
            .search("Software")
            .sort_by(SortField::Salary, SortOrder::Desc);
        let jobs = db.find(&query).await.expect("find");

        assert_eq!(ids(&jobs), vec![3, 5, 1]);
        let salaries: Vec<Decimal> = jobs.iter().map(|job| job.details.salary).collect();
        assert!(salaries.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[tokio::test]
    async fn salary_sort_is_numeric() {
        let (_dir, db) = setup_db().await;

        let mut details = new_details();
        details.salary = Decimal::new(9_500, 0);
        db.add(&details).await.expect("add");

        let jobs = db
            .find(&JobQuery::new().sort_by(SortField::Salary, SortOrder::Asc))
            .await
            .expect("find");
        assert_eq!(jobs.first().map(|job| job.details.salary), Some(Decimal::new(9_500, 0)));
    }

    #[tokio::test]
    async fn add_then_get_round_trips_every_field() {
        let (_dir, db) = setup_db().await;

        let created = db.add(&new_details()).await.expect("add");
        assert_eq!(created.id, 6);
        assert_eq!(created.details, new_details());

        let fetched = db
            .get_by_id(created.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(fetched, created);
        assert_eq!(
            fetched.company_record,
            Some(Company {
                id: 3,
                name: "Vision Bionics Ltd.".into(),
                address: "Manchester UK".into(),
            })
        );
        assert_eq!(fetched.details.salary.to_string(), "72500.50");
    }

    #[tokio::test]
    async fn add_with_unknown_company_is_rejected() {
        let (_dir, db) = setup_db().await;

        let mut details = new_details();
        details.company_id = 99;
        let err = db.add(&details).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownCompany(99)));
    }

    #[tokio::test]
    async fn update_replaces_stored_fields() {
        let (_dir, db) = setup_db().await;

        let mut job = db.get_by_id(2).await.expect("get").expect("present");
        job.details.title = "Lead Data Analyst".into();
        job.details.is_active = true;
        job.details.company_id = 1;
        job.details.company = "Tech Solutions Inc.".into();
        db.update(&job).await.expect("update");

        let stored = db.get_by_id(2).await.expect("get").expect("present");
        assert_eq!(stored.details.title, "Lead Data Analyst");
        assert!(stored.details.is_active);
        assert_eq!(stored.company_name(), Some("Tech Solutions Inc."));
    }

    #[tokio::test]
    async fn update_of_deleted_record_is_a_conflict() {
        let (_dir, db) = setup_db().await;

        let job = db.get_by_id(4).await.expect("get").expect("present");
        db.delete(4).await.expect("delete");

        let err = db.update(&job).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(4)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, db) = setup_db().await;

        assert!(db.jobs().remove(1).await.expect("delete"));
        assert!(!db.jobs().remove(1).await.expect("delete again"));
        db.delete(404).await.expect("missing id is not an error");

        let jobs = db.list_all().await.expect("list");
        assert_eq!(ids(&jobs), vec![2, 3, 4, 5]);
        assert!(db.get_by_id(1).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn company_lookups() {
        let (_dir, db) = setup_db().await;

        let options = db.list_companies().await.expect("options");
        assert_eq!(
            options,
            vec![
                CompanyOption {
                    id: 1,
                    name: "Tech Solutions Inc.".into(),
                },
                CompanyOption {
                    id: 2,
                    name: "Data Insights Ltd.".into(),
                },
                CompanyOption {
                    id: 3,
                    name: "Vision Bionics Ltd.".into(),
                },
            ]
        );

        let company = db.get_company_by_id(2).await.expect("get").expect("present");
        assert_eq!(company.address, "New York USA");
        assert!(db.get_company_by_id(9).await.expect("get").is_none());
    }
}
