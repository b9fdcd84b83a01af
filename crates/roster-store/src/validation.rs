//! Attribute format checks applied by callers that want them.
//!
//! The store never calls these itself; a record with an odd contact string
//! or course code is still a valid tree entry.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid contact address: {0:?}")]
    Contact(String),

    #[error("invalid course code: {0:?} (expected 2-4 capital letters then 3 digits, e.g. CS123)")]
    CourseCode(String),
}

fn contact_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("contact regex must compile")
    })
}

fn course_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2,4}\d{3}$").expect("course-code regex must compile"))
}

pub fn normalize_course_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

pub fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    if contact_re().is_match(contact.trim()) {
        Ok(())
    } else {
        Err(ValidationError::Contact(contact.to_string()))
    }
}

/// Normalise then check a course code, returning the normalised form.
pub fn validate_course_code(raw: &str) -> Result<String, ValidationError> {
    let code = normalize_course_code(raw);
    if course_code_re().is_match(&code) {
        Ok(code)
    } else {
        Err(ValidationError::CourseCode(raw.to_string()))
    }
}
