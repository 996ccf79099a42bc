use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Key under which errors that span several fields are reported.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

static INTERNATIONAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{10,15}$").expect("static regex"));

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));

/// `+` followed by 10 to 15 digits.
pub fn is_international_phone(value: &str) -> bool {
    INTERNATIONAL_PHONE.is_match(value)
}

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value.trim())
}

/// Field name to the list of messages for that field.
///
/// Serializes as a plain JSON object, e.g.
/// `{"phone_number": ["Phone number must be in international format like +11234567890."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_international_phone() {
        assert!(is_international_phone("+11234567890"));
        assert!(is_international_phone("+123456789012345"));
        assert!(!is_international_phone("1234567890"));
        assert!(!is_international_phone("+123456789"));
        assert!(!is_international_phone("+1234567890123456"));
        assert!(!is_international_phone("+1 234 567 8901"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("jsmith@docmail.com"));
        assert!(!is_email_shaped("jsmith@docmail"));
        assert!(!is_email_shaped("jsmith docmail.com"));
        assert!(!is_email_shaped(""));
    }

    #[test]
    fn test_field_errors_accumulate_and_serialize() {
        let mut errors = FieldErrors::new();
        errors.add("email", "required");
        errors.add("email", "invalid");
        errors.add(NON_FIELD_ERRORS, "slot taken");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email").unwrap().len(), 2);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["email"][1], "invalid");
        assert_eq!(json["non_field_errors"][0], "slot taken");
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(FieldErrors::single("a", "b").into_result().is_err());
    }
}
