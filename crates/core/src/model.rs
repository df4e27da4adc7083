use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier assigned to job opportunities by the persistence layer.
pub type JobId = i64;

/// Identifier of a company row.
pub type CompanyId = i64;

/// Company reference data. Read-only for this application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub address: String,
}

/// `(id, name)` pair used to populate company pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOption {
    pub id: CompanyId,
    pub name: String,
}

impl From<Company> for CompanyOption {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
        }
    }
}

/// Business fields of a job opportunity.
///
/// This is the shape validation runs on, both for new records and for full
/// replacements of existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub title: String,
    pub description: String,
    /// Denormalized display name of the owning company.
    pub company: String,
    pub location: String,
    pub salary: Decimal,
    pub posted_date: NaiveDate,
    pub closing_date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub company_id: CompanyId,
}

fn default_active() -> bool {
    true
}

/// A persisted job opportunity.
///
/// `company_record` is filled by the join performed in every read path; it is
/// `None` only for values built by callers before they reach storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOpportunity {
    pub id: JobId,
    #[serde(flatten)]
    pub details: JobDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_record: Option<Company>,
}

impl JobOpportunity {
    pub fn new(id: JobId, details: JobDetails) -> Self {
        Self {
            id,
            details,
            company_record: None,
        }
    }

    /// Attaches the resolved company.
    pub fn with_company(mut self, company: Company) -> Self {
        self.company_record = Some(company);
        self
    }

    /// Name of the joined company, when resolved.
    pub fn company_name(&self) -> Option<&str> {
        self.company_record.as_ref().map(|company| company.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details() -> JobDetails {
        JobDetails {
            title: "Software Engineer".into(),
            description: "Develop and maintain software applications.".into(),
            company: "Tech Solutions Inc.".into(),
            location: "London".into(),
            salary: Decimal::new(50_000, 0),
            posted_date: NaiveDate::from_ymd_opt(2023, 10, 26).unwrap(),
            closing_date: NaiveDate::from_ymd_opt(2023, 11, 25).unwrap(),
            is_active: true,
            company_id: 1,
        }
    }

    #[test]
    fn serializes_dates_as_calendar_days() {
        let job = JobOpportunity::new(7, details());
        let value = serde_json::to_value(&job).expect("serialize");
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["postedDate"], json!("2023-10-26"));
        assert_eq!(value["closingDate"], json!("2023-11-25"));
        assert_eq!(value["companyId"], json!(1));
        assert!(value.get("companyRecord").is_none());
    }

    #[test]
    fn is_active_defaults_to_true() {
        let value = json!({
            "title": "Data Analyst",
            "description": "Analyze data.",
            "company": "Data Insights Ltd.",
            "location": "New York",
            "salary": "60000",
            "postedDate": "2023-10-20",
            "closingDate": "2023-12-01",
            "companyId": 2
        });
        let details: JobDetails = serde_json::from_value(value).expect("deserialize");
        assert!(details.is_active);
        assert_eq!(details.salary, Decimal::new(60_000, 0));
    }

    #[test]
    fn company_name_reads_joined_record() {
        let job = JobOpportunity::new(1, details()).with_company(Company {
            id: 1,
            name: "Tech Solutions Inc.".into(),
            address: "London UK".into(),
        });
        assert_eq!(job.company_name(), Some("Tech Solutions Inc."));
    }
}
