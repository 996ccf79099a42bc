//! Query parameters to doctor predicates.

use std::str::FromStr;

use docfinder_core::DoctorField;
use docfinder_storage::{DoctorQuery, Predicate, SortOrder};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported sort direction '{0}', expected 'asc' or 'desc'")]
pub struct InvalidSortDirection(pub String);

/// Parsed `sort` parameter. Case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = InvalidSortDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(InvalidSortDirection(s.to_string()))
        }
    }
}

impl From<SortDirection> for SortOrder {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortOrder::Asc,
            SortDirection::Desc => SortOrder::Desc,
        }
    }
}

/// The recognised filter parameters of a doctor search.
///
/// Every field is optional; blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    pub id: Option<String>,
    pub specialization: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sort: SortDirection,
}

impl DoctorFilter {
    /// Builds a filter from raw query pairs. Unknown keys are ignored; when a
    /// key repeats the last value wins. An unrecognised `sort` value falls
    /// back to ascending.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = DoctorFilter::default();
        for (key, value) in pairs {
            let value = value.trim();
            let slot = match key {
                "id" => &mut filter.id,
                "specialization" => &mut filter.specialization,
                "city" => &mut filter.city,
                "state" => &mut filter.state,
                "zip_code" => &mut filter.zip_code,
                "first_name" => &mut filter.first_name,
                "last_name" => &mut filter.last_name,
                "sort" => {
                    filter.sort = value.parse().unwrap_or_else(|e: InvalidSortDirection| {
                        tracing::debug!(error = %e, "ignoring sort parameter");
                        SortDirection::Asc
                    });
                    continue;
                }
                _ => continue,
            };
            *slot = (!value.is_empty()).then(|| value.to_string());
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Single-field predicates AND-ed together, followed by the name group
    /// when a first or last name was supplied.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(id) = &self.id {
            predicates.push(Predicate::iexact(DoctorField::PractitionerId, id));
        }

        let substring_fields = [
            (DoctorField::Specialization, &self.specialization),
            (DoctorField::City, &self.city),
            (DoctorField::State, &self.state),
            (DoctorField::ZipCode, &self.zip_code),
        ];
        for (field, value) in substring_fields {
            if let Some(value) = value {
                predicates.push(Predicate::icontains(field, value));
            }
        }

        let mut names = Vec::new();
        if let Some(first) = &self.first_name {
            names.push(Predicate::icontains(DoctorField::FirstName, first));
        }
        if let Some(last) = &self.last_name {
            names.push(Predicate::icontains(DoctorField::LastName, last));
        }
        if !names.is_empty() {
            predicates.push(Predicate::AnyOf(names));
        }

        predicates
    }

    /// The unpaginated store query for this filter.
    pub fn to_query(&self) -> DoctorQuery {
        DoctorQuery {
            predicates: self.predicates(),
            order: self.sort.into(),
            offset: 0,
            limit: None,
        }
    }
}
