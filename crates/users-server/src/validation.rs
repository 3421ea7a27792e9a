//! Payload checks for the `/users` resource.
//!
//! Bodies are inspected as raw JSON so that a missing field, a field of the
//! wrong type and an unparseable body all produce the same 400 response
//! instead of the extractor's own rejection.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use users_shared::api::{CreateUserRequest, UpdateUserRequest};

/// Field name to reason, ordered by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.insert(field.into(), reason.into());
    }

    /// A body that could not be read as JSON at all.
    pub fn body(reason: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add("body", reason);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// Validates a create payload. `password` is required only when
/// `require_password` is set, but must be a string whenever it is present.
pub fn validate_create(
    body: &Value,
    require_password: bool,
) -> Result<CreateUserRequest, ValidationErrors> {
    let obj = as_object(body)?;
    let mut errors = ValidationErrors::default();

    let username = required_string(obj, "username", &mut errors);
    let email = required_string(obj, "email", &mut errors);
    let password = if require_password {
        required_string(obj, "password", &mut errors)
    } else {
        optional_string(obj, "password", &mut errors)
    };

    errors.into_result(|| CreateUserRequest {
        username: username.unwrap_or_default(),
        email: email.unwrap_or_default(),
        password,
    })
}

/// Validates an update payload. Any `password` key is ignored.
pub fn validate_update(body: &Value) -> Result<UpdateUserRequest, ValidationErrors> {
    let obj = as_object(body)?;
    let mut errors = ValidationErrors::default();

    let username = required_string(obj, "username", &mut errors);
    let email = required_string(obj, "email", &mut errors);

    errors.into_result(|| UpdateUserRequest {
        username: username.unwrap_or_default(),
        email: email.unwrap_or_default(),
    })
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    match body {
        Value::Object(obj) => Ok(obj),
        other => Err(ValidationErrors::body(format!(
            "{} is not of type 'object'",
            type_name(other)
        ))),
    }
}

fn required_string(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, format!("'{field}' is a required property"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, format!("'{field}' must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.add(field, format!("{} is not of type 'string'", type_name(other)));
            None
        }
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.add(field, format!("{} is not of type 'string'", type_name(other)));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_accepts_username_and_email() {
        let req = validate_create(
            &json!({"username": "testuser", "email": "testuser@xyz.com"}),
            false,
        )
        .unwrap();
        assert_eq!(req.username, "testuser");
        assert_eq!(req.email, "testuser@xyz.com");
        assert!(req.password.is_none());
    }

    #[test]
    fn create_rejects_empty_object() {
        let errors = validate_create(&json!({}), false).unwrap_err();
        assert_eq!(errors.get("username"), Some("'username' is a required property"));
        assert_eq!(errors.get("email"), Some("'email' is a required property"));
        assert!(errors.get("password").is_none());
    }

    #[test]
    fn create_rejects_missing_username() {
        let errors = validate_create(&json!({"email": "test@test.com"}), false).unwrap_err();
        assert!(errors.get("username").is_some());
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn create_rejects_wrong_types() {
        let errors =
            validate_create(&json!({"username": 42, "email": ["a@b.c"]}), false).unwrap_err();
        assert_eq!(errors.get("username"), Some("number is not of type 'string'"));
        assert_eq!(errors.get("email"), Some("array is not of type 'string'"));
    }

    #[test]
    fn create_rejects_blank_strings() {
        let errors =
            validate_create(&json!({"username": "  ", "email": "me@me.com"}), false).unwrap_err();
        assert_eq!(errors.get("username"), Some("'username' must not be empty"));
    }

    #[test]
    fn create_rejects_non_object_bodies() {
        for body in [json!(null), json!([]), json!("users"), json!(3)] {
            let errors = validate_create(&body, false).unwrap_err();
            assert!(errors.get("body").is_some(), "{body} should be rejected");
        }
    }

    #[test]
    fn password_required_only_in_strict_schema() {
        let body = json!({"username": "test", "email": "test@test.com"});
        assert!(validate_create(&body, false).is_ok());

        let errors = validate_create(&body, true).unwrap_err();
        assert_eq!(errors.get("password"), Some("'password' is a required property"));

        let with_password = json!({
            "username": "test",
            "email": "test@test.com",
            "password": "greaterthaneight"
        });
        let req = validate_create(&with_password, true).unwrap();
        assert_eq!(req.password.as_deref(), Some("greaterthaneight"));
    }

    #[test]
    fn optional_password_must_still_be_a_string() {
        let body = json!({"username": "test", "email": "test@test.com", "password": 12345678});
        let errors = validate_create(&body, false).unwrap_err();
        assert_eq!(errors.get("password"), Some("number is not of type 'string'"));
    }

    #[test]
    fn update_ignores_password() {
        let req = validate_update(&json!({
            "username": "me",
            "email": "foo@foo.com",
            "password": "somethingdifferent"
        }))
        .unwrap();
        assert_eq!(req.username, "me");
        assert_eq!(req.email, "foo@foo.com");
    }

    #[test]
    fn update_rejects_missing_fields() {
        assert!(validate_update(&json!({})).is_err());
        let errors = validate_update(&json!({"email": "me@me.com"})).unwrap_err();
        assert!(errors.get("username").is_some());
    }
}
