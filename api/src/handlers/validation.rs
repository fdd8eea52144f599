//! `validator` integration: run DTO checks and collect field messages.

use std::collections::BTreeMap;

use sh_shared::validation::FieldErrors;
use validator::{Validate, ValidationErrors};

use super::error::ApiError;

/// Validate a request DTO, mapping failures to a 400 with a field map
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|errors| ApiError::Validation(field_messages(&errors)))
}

/// Field name (as sent on the wire) to human-readable messages
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut fields = FieldErrors::new();
    for (field, failures) in errors.field_errors() {
        let name = camel_case(&field);
        for failure in failures {
            let message = failure
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid ({})", name, failure.code));
            fields.add(name.clone(), message);
        }
    }
    fields.into_map()
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
