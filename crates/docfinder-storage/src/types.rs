//! Query and result types shared by record store backends.

use docfinder_core::{Doctor, DoctorField};
use serde::{Deserialize, Serialize};

/// How a predicate compares a column against its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOp {
    /// Whole-value equality, ignoring case.
    IExact,
    /// Substring containment, ignoring case.
    IContains,
}

/// A filter over doctor records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    Match {
        field: DoctorField,
        op: MatchOp,
        value: String,
    },
    /// Matches when any member matches. An empty group matches nothing.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn iexact(field: DoctorField, value: impl Into<String>) -> Self {
        Self::Match {
            field,
            op: MatchOp::IExact,
            value: value.into(),
        }
    }

    pub fn icontains(field: DoctorField, value: impl Into<String>) -> Self {
        Self::Match {
            field,
            op: MatchOp::IContains,
            value: value.into(),
        }
    }

    /// Evaluates the predicate against a record. Unset columns never match.
    pub fn matches(&self, doctor: &Doctor) -> bool {
        match self {
            Predicate::Match { field, op, value } => {
                let Some(actual) = doctor.field(*field) else {
                    return false;
                };
                let actual = actual.to_lowercase();
                let wanted = value.to_lowercase();
                match op {
                    MatchOp::IExact => actual == wanted,
                    MatchOp::IContains => actual.contains(&wanted),
                }
            }
            Predicate::AnyOf(members) => members.iter().any(|p| p.matches(doctor)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A doctor search: predicates are AND-ed, results are ordered by
/// (first_name, last_name, practitioner_id) in `order`, then sliced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorQuery {
    pub predicates: Vec<Predicate>,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl DoctorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, doctor: &Doctor) -> bool {
        self.predicates.iter().all(|p| p.matches(doctor))
    }
}

/// One slice of a doctor search plus the size of the whole match set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorPage {
    pub total: usize,
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
