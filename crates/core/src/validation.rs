use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::JobDetails;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const COMPANY_MAX_CHARS: usize = 100;
pub const LOCATION_MAX_CHARS: usize = 100;

/// Dates are exchanged and stored as `yyyy-MM-dd`, so only four-digit years fit.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Fields of a job opportunity that carry constraints, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum JobField {
    Title,
    Description,
    Company,
    Location,
    Salary,
    PostedDate,
    ClosingDate,
}

impl JobField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Company => "company",
            Self::Location => "location",
            Self::Salary => "salary",
            Self::PostedDate => "postedDate",
            Self::ClosingDate => "closingDate",
        }
    }

    /// Message reported when a required value is missing.
    pub fn required_message(self) -> &'static str {
        match self {
            Self::Title => "Title is required.",
            Self::Description => "Description is required.",
            Self::Company => "Company is required.",
            Self::Location => "Location is required.",
            Self::Salary => "Salary is required.",
            Self::PostedDate => "Posted Date is required.",
            Self::ClosingDate => "Closing Date is required.",
        }
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: JobField,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: JobField, message: &'static str) -> Self {
        Self { field, message }
    }

    pub fn required(field: JobField) -> Self {
        Self::new(field, field.required_message())
    }
}

/// Ordered list of field failures. Displays as the first message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Returns the failure recorded for `field`, if any.
    pub fn for_field(&self, field: JobField) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Adds the failures of `other` for fields not already reported, then
    /// restores field order.
    pub fn merge(&mut self, other: ValidationErrors) {
        for error in other.errors {
            if self.for_field(error.field).is_none() {
                self.errors.push(error);
            }
        }
        self.errors.sort_by_key(|error| error.field);
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(error) => f.write_str(error.message),
            None => f.write_str("no validation errors"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks every constraint of a job opportunity.
///
/// All fields are inspected; at most one failure is reported per field and
/// failures appear in field order.
pub fn validate(details: &JobDetails) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let checks = [
        check_text(JobField::Title, &details.title, TITLE_MAX_CHARS),
        check_text(
            JobField::Description,
            &details.description,
            DESCRIPTION_MAX_CHARS,
        ),
        check_text(JobField::Company, &details.company, COMPANY_MAX_CHARS),
        check_text(JobField::Location, &details.location, LOCATION_MAX_CHARS),
        check_salary(details.salary),
        check_date_range(JobField::PostedDate, details.posted_date),
        check_date_range(JobField::ClosingDate, details.closing_date)
            .or_else(|| check_date_order(details.posted_date, details.closing_date)),
    ];
    for error in checks.into_iter().flatten() {
        errors.push(error);
    }

    errors.into_result()
}

fn check_text(field: JobField, value: &str, max_chars: usize) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::required(field));
    }
    if value.chars().count() > max_chars {
        return Some(FieldError::new(field, too_long_message(field)));
    }
    None
}

fn too_long_message(field: JobField) -> &'static str {
    match field {
        JobField::Title => "Title cannot be longer than 100 characters.",
        JobField::Description => "Description cannot be longer than 1000 characters.",
        JobField::Company => "Company cannot be longer than 100 characters.",
        JobField::Location => "Location cannot be longer than 100 characters.",
        _ => "Value is too long.",
    }
}

fn check_salary(salary: Decimal) -> Option<FieldError> {
    if salary < Decimal::ZERO {
        return Some(FieldError::new(
            JobField::Salary,
            "Salary must be a non-negative value.",
        ));
    }
    None
}

fn check_date_range(field: JobField, date: NaiveDate) -> Option<FieldError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return None;
    }
    let message = match field {
        JobField::PostedDate => "Posted Date must be between 0001-01-01 and 9999-12-31.",
        _ => "Closing Date must be between 0001-01-01 and 9999-12-31.",
    };
    Some(FieldError::new(field, message))
}

/// The closing date must fall strictly after the posted date.
pub fn check_date_order(posted: NaiveDate, closing: NaiveDate) -> Option<FieldError> {
    if closing <= posted {
        return Some(FieldError::new(
            JobField::ClosingDate,
            "Closing Date must be after Posted Date.",
        ));
    }
    None
}
