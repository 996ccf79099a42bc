//! Structural check of serialized Practitioner resources.
//!
//! This is not profile validation. It confirms the resource type, that every
//! top-level key is an element Practitioner defines, and that the handful of
//! elements this service writes have the right JSON shape.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::practitioner::RESOURCE_TYPE;

/// Top-level elements of Practitioner (R4 base resource plus domain resource
/// elements). `specialty` belongs to PractitionerRole and is deliberately absent.
pub const PRACTITIONER_ELEMENTS: &[&str] = &[
    "resourceType",
    "id",
    "meta",
    "implicitRules",
    "language",
    "text",
    "contained",
    "extension",
    "modifierExtension",
    "identifier",
    "active",
    "name",
    "telecom",
    "address",
    "gender",
    "birthDate",
    "photo",
    "qualification",
    "communication",
];

/// Primitive elements that may carry a `_element` sibling for extensions.
const PRIMITIVE_ELEMENTS: &[&str] = &["id", "implicitRules", "language", "active", "gender", "birthDate"];

const ARRAY_ELEMENTS: &[&str] = &[
    "contained",
    "extension",
    "modifierExtension",
    "identifier",
    "name",
    "telecom",
    "address",
    "photo",
    "qualification",
    "communication",
];

pub fn is_legal_element(key: &str) -> bool {
    if PRACTITIONER_ELEMENTS.contains(&key) {
        return true;
    }
    key.strip_prefix('_')
        .is_some_and(|primitive| PRIMITIVE_ELEMENTS.contains(&primitive))
}

/// Checks a serialized resource, reporting every issue found.
pub fn check_practitioner(resource: &Value) -> Result<(), SchemaError> {
    let Some(object) = resource.as_object() else {
        return Err(SchemaError {
            issues: vec!["resource must be a JSON object".to_string()],
        });
    };

    let mut issues = Vec::new();

    match object.get("resourceType").and_then(Value::as_str) {
        Some(RESOURCE_TYPE) => {}
        Some(other) => issues.push(format!("resourceType must be '{RESOURCE_TYPE}', got '{other}'")),
        None => issues.push("resourceType is missing".to_string()),
    }

    for key in object.keys() {
        if !is_legal_element(key) {
            issues.push(format!("'{key}' is not a Practitioner element"));
        }
    }

    for key in ARRAY_ELEMENTS {
        if let Some(value) = object.get(*key)
            && !value.is_array()
        {
            issues.push(format!("'{key}' must be an array"));
        }
    }

    check_extensions(object, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { issues })
    }
}

fn check_extensions(object: &Map<String, Value>, issues: &mut Vec<String>) {
    let Some(extensions) = object.get("extension").and_then(Value::as_array) else {
        return;
    };
    for (i, extension) in extensions.iter().enumerate() {
        let has_url = extension
            .get("url")
            .and_then(Value::as_str)
            .is_some_and(|url| !url.is_empty());
        if !has_url {
            issues.push(format!("extension[{i}].url is required"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_practitioner_passes() {
        let resource = json!({"resourceType": "Practitioner", "id": "1"});
        assert!(check_practitioner(&resource).is_ok());
    }

    #[test]
    fn test_specialty_is_rejected() {
        let resource = json!({
            "resourceType": "Practitioner",
            "id": "1",
            "specialty": [{"coding": [{"system": "http://hl7.org/fhir/specialty", "code": "Cardiology"}]}]
        });
        let err = check_practitioner(&resource).unwrap_err();
        assert_eq!(err.issues, ["'specialty' is not a Practitioner element"]);
    }

    #[test]
    fn test_wrong_type_and_shapes_are_all_reported() {
        let resource = json!({
            "resourceType": "Patient",
            "name": {"family": "Smith"},
            "extension": [{"valueString": "x"}]
        });
        let err = check_practitioner(&resource).unwrap_err();
        assert_eq!(err.issues.len(), 3);
        assert!(err.to_string().contains("resourceType must be 'Practitioner'"));
        assert!(err.to_string().contains("'name' must be an array"));

        let resource = json!({"resourceType": "Practitioner", "extension": [{"valueString": "x"}]});
        let err = check_practitioner(&resource).unwrap_err();
        assert_eq!(err.issues, ["extension[0].url is required"]);
    }

    #[test]
    fn test_primitive_extension_keys() {
        assert!(is_legal_element("_gender"));
        assert!(!is_legal_element("_note"));
        assert!(!is_legal_element("_name"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(check_practitioner(&json!([1, 2])).is_err());
    }
}
