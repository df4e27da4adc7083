use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use jobboard_core::{
    currency::format_currency, validate, Company, CompanyId, FieldError, JobDetails, JobField,
    JobOpportunity, ValidationErrors,
};

/// Request body for creating or replacing a job opportunity.
///
/// The company display name is never accepted from callers; it is taken from
/// the company resolved through `company_id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company_id: Option<CompanyId>,
    pub location: Option<String>,
    pub salary: Option<Decimal>,
    pub posted_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl JobForm {
    /// Binds the form to [`JobDetails`].
    ///
    /// Missing values are reported together with every other constraint
    /// failure. `posted_date` defaults to `today`, `is_active` to `true`.
    pub fn into_details(
        self,
        company: Option<&Company>,
        today: NaiveDate,
    ) -> Result<JobDetails, ValidationErrors> {
        let mut missing = ValidationErrors::new();

        let salary = self.salary.unwrap_or_else(|| {
            missing.push(FieldError::required(JobField::Salary));
            Decimal::ZERO
        });
        let posted_date = self.posted_date.unwrap_or(today);
        let closing_date = self.closing_date.unwrap_or_else(|| {
            missing.push(FieldError::required(JobField::ClosingDate));
            posted_date
        });

        let details = JobDetails {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            company: company.map(|c| c.name.clone()).unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            salary,
            posted_date,
            closing_date,
            is_active: self.is_active.unwrap_or(true),
            company_id: company.map(|c| c.id).unwrap_or_default(),
        };

        if let Err(errors) = validate(&details) {
            missing.merge(errors);
        }
        missing.into_result().map(|()| details)
    }
}

/// Job opportunity as returned to callers, with the salary formatted for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: JobOpportunity,
    pub salary_display: String,
}

impl JobView {
    pub fn new(job: JobOpportunity, currency_symbol: &str) -> Self {
        let salary_display = format_currency(job.details.salary, currency_symbol);
        Self {
            job,
            salary_display,
        }
    }
}
