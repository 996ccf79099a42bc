//! Practitioner records held in the directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::validation::{FieldErrors, is_email_shaped};

pub const MAX_PRACTITIONER_ID_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_SPECIALIZATION_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MIN_PHONE_LEN: usize = 10;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_ADDRESS_LEN: usize = 255;
pub const MAX_LOCALITY_LEN: usize = 100;
pub const MAX_ZIP_LEN: usize = 20;

const REQUIRED_MESSAGE: &str = "This field is required.";

/// A practitioner in the directory.
///
/// Required fields are plain strings rather than `Option` because records can
/// arrive through bulk import with blank cells. Completeness is enforced when
/// the record is converted to a Practitioner resource, not when it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub practitioner_id: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Doctor payload as received on create. Keys left out of the body are
/// reported as required rather than blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorRequest {
    #[serde(default)]
    pub practitioner_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl DoctorRequest {
    /// Runs the create rules and returns the normalized record or every error.
    pub fn validate(self) -> Result<Doctor, FieldErrors> {
        let missing: Vec<&'static str> = [
            ("practitioner_id", self.practitioner_id.is_none()),
            ("first_name", self.first_name.is_none()),
            ("last_name", self.last_name.is_none()),
            ("specialization", self.specialization.is_none()),
            ("phone", self.phone.is_none()),
            ("email", self.email.is_none()),
            ("address", self.address.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        let doctor = Doctor {
            practitioner_id: self.practitioner_id.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            specialization: self.specialization.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
        }
        .normalized();

        let mut errors = doctor.validate_for_create().err().unwrap_or_default();
        for field in missing {
            errors.remove(field);
            errors.add(field, REQUIRED_MESSAGE);
        }
        if errors.is_empty() { Ok(doctor) } else { Err(errors) }
    }
}

impl Doctor {
    pub fn new(practitioner_id: impl Into<String>) -> Self {
        Self {
            practitioner_id: practitioner_id.into(),
            first_name: String::new(),
            last_name: String::new(),
            specialization: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            city: None,
            state: None,
            zip_code: None,
        }
    }

    /// `first last`, space-joined.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the value of a column, `None` when the column is unset.
    pub fn field(&self, field: DoctorField) -> Option<&str> {
        match field {
            DoctorField::PractitionerId => Some(self.practitioner_id.as_str()),
            DoctorField::FirstName => Some(self.first_name.as_str()),
            DoctorField::LastName => Some(self.last_name.as_str()),
            DoctorField::Specialization => Some(self.specialization.as_str()),
            DoctorField::Phone => Some(self.phone.as_str()),
            DoctorField::Email => Some(self.email.as_str()),
            DoctorField::Address => Some(self.address.as_str()),
            DoctorField::City => self.city.as_deref(),
            DoctorField::State => self.state.as_deref(),
            DoctorField::ZipCode => self.zip_code.as_deref(),
        }
    }

    /// Field validation applied when a doctor is created through the API.
    ///
    /// Every violated rule is reported; nothing short-circuits.
    pub fn validate_for_create(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        check_required(&mut errors, "practitioner_id", &self.practitioner_id, MAX_PRACTITIONER_ID_LEN);
        check_required(&mut errors, "first_name", &self.first_name, MAX_NAME_LEN);
        check_required(&mut errors, "last_name", &self.last_name, MAX_NAME_LEN);
        check_required(&mut errors, "specialization", &self.specialization, MAX_SPECIALIZATION_LEN);
        check_required(&mut errors, "phone", &self.phone, MAX_PHONE_LEN);
        if !self.phone.trim().is_empty() && self.phone.chars().count() < MIN_PHONE_LEN {
            errors.add(
                "phone",
                format!("Ensure this field has at least {MIN_PHONE_LEN} characters."),
            );
        }
        check_required(&mut errors, "email", &self.email, MAX_EMAIL_LEN);
        check_required(&mut errors, "address", &self.address, MAX_ADDRESS_LEN);

        if !self.email.trim().is_empty() && !is_email_shaped(&self.email) {
            errors.add("email", "Enter a valid email address.");
        }

        check_optional(&mut errors, "city", self.city.as_deref(), MAX_LOCALITY_LEN);
        check_optional(&mut errors, "state", self.state.as_deref(), MAX_LOCALITY_LEN);
        check_optional(&mut errors, "zip_code", self.zip_code.as_deref(), MAX_ZIP_LEN);

        errors.into_result()
    }

    /// Blank optional columns are stored as `None`.
    pub fn normalized(mut self) -> Self {
        self.city = non_blank(self.city);
        self.state = non_blank(self.state);
        self.zip_code = non_blank(self.zip_code);
        self
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.first_name, self.last_name, self.specialization
        )
    }
}

fn check_required(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
    } else if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_len} characters."),
        );
    }
}

fn check_optional(errors: &mut FieldErrors, field: &str, value: Option<&str>, max_len: usize) {
    if let Some(value) = value
        && value.chars().count() > max_len
    {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_len} characters."),
        );
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Columns of the doctor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorField {
    PractitionerId,
    FirstName,
    LastName,
    Specialization,
    Phone,
    Email,
    Address,
    City,
    State,
    ZipCode,
}

impl DoctorField {
    pub const ALL: [DoctorField; 10] = [
        DoctorField::PractitionerId,
        DoctorField::FirstName,
        DoctorField::LastName,
        DoctorField::Specialization,
        DoctorField::Phone,
        DoctorField::Email,
        DoctorField::Address,
        DoctorField::City,
        DoctorField::State,
        DoctorField::ZipCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DoctorField::PractitionerId => "practitioner_id",
            DoctorField::FirstName => "first_name",
            DoctorField::LastName => "last_name",
            DoctorField::Specialization => "specialization",
            DoctorField::Phone => "phone",
            DoctorField::Email => "email",
            DoctorField::Address => "address",
            DoctorField::City => "city",
            DoctorField::State => "state",
            DoctorField::ZipCode => "zip_code",
        }
    }
}

impl fmt::Display for DoctorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoctorField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DoctorField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::unknown_field(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Doctor {
        Doctor {
            practitioner_id: "1003000126".into(),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            specialization: "Cardiology".into(),
            phone: "5125550100".into(),
            email: "jsmith@docmail.com".into(),
            address: "100 Congress Ave".into(),
            city: Some("Austin".into()),
            state: Some("TX".into()),
            zip_code: Some("78701".into()),
        }
    }

    #[test]
    fn test_complete_doctor_passes_create_validation() {
        assert!(complete().validate_for_create().is_ok());
    }

    #[test]
    fn test_create_validation_reports_every_field() {
        let doctor = Doctor::new("42");
        let errors = doctor.validate_for_create().unwrap_err();
        for field in [
            "first_name",
            "last_name",
            "specialization",
            "phone",
            "email",
            "address",
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains("practitioner_id"));
        assert!(!errors.contains("city"));
    }

    #[test]
    fn test_create_validation_rejects_bad_email_and_long_values() {
        let mut doctor = complete();
        doctor.email = "not-an-email".into();
        doctor.zip_code = Some("1".repeat(MAX_ZIP_LEN + 1));
        let errors = doctor.validate_for_create().unwrap_err();
        assert!(errors.contains("email"));
        assert!(errors.contains("zip_code"));
    }

    #[test]
    fn test_create_validation_rejects_short_phone() {
        let mut doctor = complete();
        doctor.phone = "12345".into();
        let errors = doctor.validate_for_create().unwrap_err();
        assert_eq!(
            errors.get("phone").unwrap(),
            ["Ensure this field has at least 10 characters."]
        );

        doctor.phone = "1".repeat(MIN_PHONE_LEN);
        assert!(doctor.validate_for_create().is_ok());
    }

    #[test]
    fn test_request_reports_missing_keys_as_required() {
        let request = DoctorRequest {
            first_name: Some("".into()),
            email: Some("nope".into()),
            ..DoctorRequest::default()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.get("practitioner_id").unwrap(), ["This field is required."]);
        assert_eq!(errors.get("last_name").unwrap(), ["This field is required."]);
        assert_eq!(errors.get("first_name").unwrap(), ["This field may not be blank."]);
        assert_eq!(errors.get("email").unwrap(), ["Enter a valid email address."]);
        assert!(!errors.contains("city"));
    }

    #[test]
    fn test_request_builds_normalized_doctor() {
        let doctor = DoctorRequest {
            practitioner_id: Some("1003000126".into()),
            first_name: Some("Jane".into()),
            last_name: Some("Smith".into()),
            specialization: Some("Cardiology".into()),
            phone: Some("5125550100".into()),
            email: Some("jsmith@docmail.com".into()),
            address: Some("100 Congress Ave".into()),
            city: Some(" ".into()),
            ..DoctorRequest::default()
        }
        .validate()
        .unwrap();
        assert_eq!(doctor.city, None);
        assert_eq!(doctor.full_name(), "Jane Smith");
    }

    #[test]
    fn test_field_lookup_and_parse() {
        let doctor = complete();
        assert_eq!(doctor.field(DoctorField::City), Some("Austin"));
        assert_eq!(doctor.field(DoctorField::LastName), Some("Smith"));
        assert_eq!("zip_code".parse::<DoctorField>().unwrap(), DoctorField::ZipCode);
        assert!("gender".parse::<DoctorField>().is_err());
    }

    #[test]
    fn test_normalized_drops_blank_optionals() {
        let mut doctor = complete();
        doctor.city = Some("  ".into());
        let doctor = doctor.normalized();
        assert_eq!(doctor.city, None);
        assert_eq!(doctor.state.as_deref(), Some("TX"));
    }

    #[test]
    fn test_display_and_full_name() {
        let doctor = complete();
        assert_eq!(doctor.full_name(), "Jane Smith");
        assert_eq!(doctor.to_string(), "Jane Smith (Cardiology)");
    }
}
