use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use thiserror::Error;

use jobboard_core::{Company, CompanyId, JobDetails, JobId, JobOpportunity, JobQuery, SortField};

/// Column list shared by every read; each job is joined with its company.
const SELECT_JOINED: &str = "SELECT j.id, j.title, j.description, j.company, j.location, \
     j.salary, j.posted_date, j.closing_date, j.is_active, j.company_id, \
     c.name AS company_name, c.address AS company_address \
     FROM job_opportunities AS j \
     INNER JOIN companies AS c ON c.id = j.company_id";

/// SQLite extended result code for a failed foreign key constraint.
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";

/// Repository responsible for the `job_opportunities` table.
#[derive(Clone)]
pub struct JobOpportunityRepository {
    pub(crate) pool: SqlitePool,
}

impl JobOpportunityRepository {
    /// Lists every job in storage order.
    pub async fn list_all(&self) -> Result<Vec<JobOpportunity>, JobOpportunityError> {
        let sql = format!("{SELECT_JOINED} ORDER BY j.id");
        let rows = sqlx::query_as::<_, JobOpportunityRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(JobOpportunityRow::into_domain).collect()
    }

    /// Lists jobs matching the filters of `query`, ordered as requested.
    pub async fn find(
        &self,
        query: &JobQuery,
    ) -> Result<Vec<JobOpportunity>, JobOpportunityError> {
        let mut builder = build_find_query(query);
        let rows = builder
            .build_query_as::<JobOpportunityRow>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(JobOpportunityRow::into_domain).collect()
    }

    /// Loads a single job with its company.
    pub async fn fetch(&self, id: JobId) -> Result<Option<JobOpportunity>, JobOpportunityError> {
        let sql = format!("{SELECT_JOINED} WHERE j.id = ?");
        let row = sqlx::query_as::<_, JobOpportunityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(JobOpportunityRow::into_domain).transpose()
    }

    /// Inserts a job and returns it, re-read with its company, in one transaction.
    pub async fn insert(
        &self,
        details: &JobDetails,
    ) -> Result<JobOpportunity, JobOpportunityError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO job_opportunities \
             (title, description, company, location, salary, posted_date, closing_date, \
              is_active, company_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING id",
        )
        .bind(&details.title)
        .bind(&details.description)
        .bind(&details.company)
        .bind(&details.location)
        .bind(details.salary.to_string())
        .bind(details.posted_date)
        .bind(details.closing_date)
        .bind(details.is_active)
        .bind(details.company_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| map_write_error(err, details.company_id))?;
        let id: i64 = row.get("id");

        let sql = format!("{SELECT_JOINED} WHERE j.id = ?");
        let created = sqlx::query_as::<_, JobOpportunityRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?
            .into_domain()?;

        tx.commit().await?;
        Ok(created)
    }

    /// Replaces every business field of the job with the same id.
    pub async fn replace(&self, job: &JobOpportunity) -> Result<(), JobOpportunityError> {
        let details = &job.details;
        let result = sqlx::query(
            "UPDATE job_opportunities \
             SET title = ?, description = ?, company = ?, location = ?, salary = ?, \
                 posted_date = ?, closing_date = ?, is_active = ?, company_id = ? \
             WHERE id = ?",
        )
        .bind(&details.title)
        .bind(&details.description)
        .bind(&details.company)
        .bind(&details.location)
        .bind(details.salary.to_string())
        .bind(details.posted_date)
        .bind(details.closing_date)
        .bind(details.is_active)
        .bind(details.company_id)
        .bind(job.id)
        .execute(&self.pool)
        .await
        .map_err(|err| map_write_error(err, details.company_id))?;

        if result.rows_affected() == 0 {
            return Err(JobOpportunityError::Stale(job.id));
        }
        Ok(())
    }

    /// Deletes the job if present, returning whether a row was removed.
    pub async fn remove(&self, id: JobId) -> Result<bool, JobOpportunityError> {
        let result = sqlx::query("DELETE FROM job_opportunities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn build_find_query(query: &JobQuery) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::<Sqlite>::new(SELECT_JOINED);
    let mut conditions = 0;
    let mut next_condition = |builder: &mut QueryBuilder<'static, Sqlite>| {
        builder.push(if conditions == 0 { " WHERE " } else { " AND " });
        conditions += 1;
    };

    if let Some(term) = &query.search_term {
        // instr() keeps the match case-sensitive; LIKE would not.
        next_condition(&mut builder);
        builder
            .push("instr(j.title, ")
            .push_bind(term.clone())
            .push(") > 0");
    }
    if let Some(company) = &query.company {
        next_condition(&mut builder);
        builder.push("c.name = ").push_bind(company.clone());
    }
    if let Some(location) = &query.location {
        next_condition(&mut builder);
        builder.push("j.location = ").push_bind(location.clone());
    }

    let direction = if query.effective_order().is_descending() {
        "DESC"
    } else {
        "ASC"
    };
    builder.push(format!(
        " ORDER BY {} {direction}, j.id ASC",
        sort_column(query.sort)
    ));
    builder
}

fn sort_column(field: Option<SortField>) -> &'static str {
    match field {
        Some(SortField::Title) => "j.title",
        Some(SortField::Company) => "c.name",
        Some(SortField::Location) => "j.location",
        Some(SortField::Salary) => "CAST(j.salary AS REAL)",
        Some(SortField::ClosingDate) => "j.closing_date",
        Some(SortField::IsActive) => "j.is_active",
        None => "j.posted_date",
    }
}

fn map_write_error(err: sqlx::Error, company_id: CompanyId) -> JobOpportunityError {
    match err {
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_FOREIGNKEY) =>
        {
            JobOpportunityError::UnknownCompany(company_id)
        }
        other => JobOpportunityError::Database(other),
    }
}

/// Row shape of the joined job/company select.
#[derive(Debug, sqlx::FromRow)]
pub struct JobOpportunityRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub posted_date: NaiveDate,
    pub closing_date: NaiveDate,
    pub is_active: bool,
    pub company_id: i64,
    pub company_name: String,
    pub company_address: String,
}

impl JobOpportunityRow {
    /// Converts the database row into a domain job with its resolved company.
    pub fn into_domain(self) -> Result<JobOpportunity, JobOpportunityError> {
        let salary =
            Decimal::from_str(&self.salary).map_err(|_| JobOpportunityError::InvalidSalary {
                id: self.id,
                value: self.salary.clone(),
            })?;
        let company = Company {
            id: self.company_id,
            name: self.company_name,
            address: self.company_address,
        };
        let details = JobDetails {
            title: self.title,
            description: self.description,
            company: self.company,
            location: self.location,
            salary,
            posted_date: self.posted_date,
            closing_date: self.closing_date,
            is_active: self.is_active,
            company_id: self.company_id,
        };
        Ok(JobOpportunity::new(self.id, details).with_company(company))
    }
}

/// Errors that can occur while reading or mutating job opportunities.
#[derive(Debug, Error)]
pub enum JobOpportunityError {
    #[error("job opportunity {0} no longer exists")]
    Stale(JobId),
    #[error("company {0} does not exist")]
    UnknownCompany(CompanyId),
    #[error("job opportunity {id} has a malformed salary: {value}")]
    InvalidSalary { id: JobId, value: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
