use std::fmt;

use url::Url;

use crate::{JobDraft, JobPatch};

pub const COMPANY_REQUIRED: &str = "Company name is required";
pub const ROLE_REQUIRED: &str = "Job role is required";
pub const INVALID_URL: &str = "Please enter a valid URL";

/// A single rejected input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Field-level feedback for a draft or patch that must not reach the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl JobDraft {
    /// Checks the constraints a record must satisfy before it is submitted.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if is_blank(&self.company) {
            errors.push("company", COMPANY_REQUIRED);
        }
        if is_blank(&self.role) {
            errors.push("role", ROLE_REQUIRED);
        }
        if let Some(link) = &self.link {
            if !is_valid_link(link) {
                errors.push("link", INVALID_URL);
            }
        }
        errors.into_result()
    }
}

impl JobPatch {
    /// Same rules as [`JobDraft::validate`], limited to the fields present.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.company.as_deref().is_some_and(is_blank) {
            errors.push("company", COMPANY_REQUIRED);
        }
        if self.role.as_deref().is_some_and(is_blank) {
            errors.push("role", ROLE_REQUIRED);
        }
        if let Some(link) = &self.link {
            if !is_valid_link(link) {
                errors.push("link", INVALID_URL);
            }
        }
        errors.into_result()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Blank links count as absent; anything else must be an absolute URL.
fn is_valid_link(link: &str) -> bool {
    is_blank(link) || Url::parse(link).is_ok()
}
