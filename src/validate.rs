//! Field-level checks for the JSON bodies accepted by the POST routes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{NewCategory, NewTodo};

pub const MISSING: &str = "Missing data for required field.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_INTEGER: &str = "Not a valid integer.";
pub const BLANK: &str = "Field may not be blank.";
pub const NOT_AN_OBJECT: &str = "Invalid input type.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        FieldError { field, message }
    }
}

/// A record shape that can be built from an untyped JSON body.
///
/// Implementations check every field and report all problems at once
/// rather than stopping at the first one.
pub trait Validate: Sized {
    fn validate(body: &Value) -> Result<Self, Vec<FieldError>>;
}

impl Validate for NewCategory {
    fn validate(body: &Value) -> Result<Self, Vec<FieldError>> {
        let fields = object(body)?;
        let mut errors = Vec::new();
        let name = required_string(fields, "name", &mut errors);

        match name {
            Some(name) if errors.is_empty() => Ok(NewCategory { name }),
            _ => Err(errors),
        }
    }
}

impl Validate for NewTodo {
    fn validate(body: &Value) -> Result<Self, Vec<FieldError>> {
        let fields = object(body)?;
        let mut errors = Vec::new();
        let task = required_string(fields, "task", &mut errors);
        let category_id = required_integer(fields, "category_id", &mut errors);

        match (task, category_id) {
            (Some(task), Some(category_id)) if errors.is_empty() => {
                Ok(NewTodo { task, category_id })
            }
            _ => Err(errors),
        }
    }
}

fn object(body: &Value) -> Result<&Map<String, Value>, Vec<FieldError>> {
    body.as_object()
        .ok_or_else(|| vec![FieldError::new("_schema", NOT_AN_OBJECT)])
}

fn required_string(
    fields: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, MISSING));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new(field, BLANK));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, NOT_A_STRING));
            None
        }
    }
}

fn required_integer(
    fields: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, MISSING));
            None
        }
        Some(value) => match value.as_i64() {
            Some(n) => Some(n),
            None => {
                errors.push(FieldError::new(field, NOT_AN_INTEGER));
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn category_requires_name() {
        let errors = NewCategory::validate(&json!({})).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("name", MISSING)]);
    }

    #[test]
    fn category_accepts_name() {
        let category = NewCategory::validate(&json!({"name": "Work"})).unwrap();
        assert_eq!(category.name, "Work");
    }

    #[test]
    fn category_rejects_non_string_name() {
        let errors = NewCategory::validate(&json!({"name": 7})).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("name", NOT_A_STRING)]);
    }

    #[test]
    fn todo_reports_every_missing_field() {
        let errors = NewTodo::validate(&json!({})).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("task", MISSING),
                FieldError::new("category_id", MISSING),
            ]
        );
    }

    #[test]
    fn todo_rejects_mistyped_category_id() {
        for bad in [json!("1"), json!(1.5), json!(true), json!([1])] {
            let errors =
                NewTodo::validate(&json!({"task": "Write", "category_id": bad})).unwrap_err();
            assert_eq!(errors, vec![FieldError::new("category_id", NOT_AN_INTEGER)]);
        }
    }

    #[test]
    fn todo_rejects_blank_task() {
        let errors = NewTodo::validate(&json!({"task": "   ", "category_id": 1})).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("task", BLANK)]);
    }

    #[test]
    fn todo_accepts_valid_body_and_ignores_extra_fields() {
        let todo =
            NewTodo::validate(&json!({"task": "New Task", "category_id": 1, "done": true}))
                .unwrap();
        assert_eq!(
            todo,
            NewTodo {
                task: "New Task".to_string(),
                category_id: 1,
            }
        );
    }

    #[test]
    fn non_object_body_is_a_schema_error() {
        let errors = NewTodo::validate(&json!([1, 2])).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("_schema", NOT_AN_OBJECT)]);
    }
}
