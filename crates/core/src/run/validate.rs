//! Input validation against runtime-provided JSON schemas

use serde_json::Value;

use crate::{Error, FieldError, Result};

/// Validate `input` against `schema`, returning every violation found.
///
/// An empty list means the input is valid. A schema the validator cannot
/// compile is reported as an agent error.
pub fn validate_input(schema: &Value, input: &Value) -> Result<Vec<FieldError>> {
    let validator = jsonschema::Validator::new(schema)
        .map_err(|e| Error::Agent(format!("Invalid input schema: {}", e)))?;

    if validator.is_valid(input) {
        return Ok(Vec::new());
    }

    let errors = validator
        .iter_errors(input)
        .map(|e| FieldError {
            loc: e.instance_path.to_string(),
            msg: e.to_string(),
            kind: "value_error".to_string(),
        })
        .collect();
    Ok(errors)
}
