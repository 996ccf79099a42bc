use std::cmp::Ordering;

use docfinder_core::Doctor;
use docfinder_storage::{DoctorPage, DoctorQuery, SortOrder};

/// Name ordering with practitioner_id as the final tie-breaker.
pub(crate) fn compare_by_name(a: &Doctor, b: &Doctor) -> Ordering {
    a.first_name
        .cmp(&b.first_name)
        .then_with(|| a.last_name.cmp(&b.last_name))
        .then_with(|| a.practitioner_id.cmp(&b.practitioner_id))
}

/// Filters, orders and slices an unordered set of records.
pub(crate) fn execute<'a>(
    query: &DoctorQuery,
    records: impl Iterator<Item = &'a Doctor>,
) -> DoctorPage {
    let mut matched: Vec<&Doctor> = records.filter(|d| query.matches(d)).collect();
    matched.sort_by(|a, b| match query.order {
        SortOrder::Asc => compare_by_name(a, b),
        SortOrder::Desc => compare_by_name(b, a),
    });

    let total = matched.len();
    let limit = query.limit.unwrap_or(usize::MAX);
    let doctors = matched
        .into_iter()
        .skip(query.offset)
        .take(limit)
        .cloned()
        .collect();

    DoctorPage { total, doctors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfinder_core::DoctorField;
    use docfinder_storage::Predicate;

    fn doctor(id: &str, first: &str, last: &str) -> Doctor {
        let mut d = Doctor::new(id);
        d.first_name = first.into();
        d.last_name = last.into();
        d
    }

    fn ids(page: &DoctorPage) -> Vec<&str> {
        page.doctors
            .iter()
            .map(|d| d.practitioner_id.as_str())
            .collect()
    }

    fn sample() -> Vec<Doctor> {
        vec![
            doctor("3", "Jane", "Smith"),
            doctor("1", "Adam", "Young"),
            doctor("2", "Jane", "Doe"),
            doctor("4", "Jane", "Doe"),
        ]
    }

    #[test]
    fn test_orders_by_first_then_last_then_id() {
        let records = sample();
        let page = execute(&DoctorQuery::new(), records.iter());
        assert_eq!(ids(&page), ["1", "2", "4", "3"]);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_desc_is_exact_reverse() {
        let records = sample();
        let asc = execute(&DoctorQuery::new(), records.iter());
        let desc = execute(&DoctorQuery::new().with_order(SortOrder::Desc), records.iter());
        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn test_slice_keeps_total() {
        let records = sample();
        let query = DoctorQuery::new()
            .with_predicate(Predicate::icontains(DoctorField::FirstName, "jane"))
            .with_offset(1)
            .with_limit(1);
        let page = execute(&query, records.iter());
        assert_eq!(page.total, 3);
        assert_eq!(ids(&page), ["4"]);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let records = sample();
        let page = execute(&DoctorQuery::new().with_offset(10), records.iter());
        assert!(page.doctors.is_empty());
        assert_eq!(page.total, 4);
    }
}
