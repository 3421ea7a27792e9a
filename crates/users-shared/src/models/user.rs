use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user record.
///
/// The password hash is loaded with the row but is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    #[serde(rename = "created_date")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: 7,
            username: "musa".to_string(),
            email: "musa@musa.com".to_string(),
            password_hash: Some("$argon2id$v=19$secret".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn serialized_user_never_carries_password() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("password_hash"));
        assert_eq!(obj["id"], 7);
        assert_eq!(obj["username"], "musa");
        assert_eq!(obj["email"], "musa@musa.com");
        assert!(obj.contains_key("created_date"));
    }

    #[test]
    fn deserializes_from_api_shape() {
        let json = r#"{
            "id": 2,
            "username": "musaali",
            "email": "musa@mali.org",
            "created_date": "2024-03-01T10:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, 2);
        assert_eq!(user.username, "musaali");
        assert!(user.password_hash.is_none());
    }
}
