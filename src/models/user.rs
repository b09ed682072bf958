use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored directory entry.
///
/// Serialized in camelCase with the identifier exposed as `_id`, the shape the
/// frontend consumes.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create/update payload as received from a client.
///
/// Every field is optional so that a missing field is reported as a
/// validation message instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl UserInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            address: Some(address.into()),
        }
    }
}

/// Validated, normalized field set ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Search predicate for the list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Matched case-insensitively as a substring of name or email.
    pub search: Option<String>,
}

impl UserFilter {
    /// Only an absent or empty term disables filtering; whitespace is part of
    /// the term.
    pub fn from_search(search: Option<&str>) -> Self {
        let search = search.filter(|s| !s.is_empty()).map(str::to_string);
        Self { search }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_means_no_filter() {
        assert_eq!(UserFilter::from_search(None).search, None);
        assert_eq!(UserFilter::from_search(Some("")).search, None);
    }

    #[test]
    fn search_term_is_kept_verbatim() {
        assert_eq!(
            UserFilter::from_search(Some("   ")).search.as_deref(),
            Some("   ")
        );
        assert_eq!(
            UserFilter::from_search(Some(" Lovelace")).search.as_deref(),
            Some(" Lovelace")
        );
    }

    #[test]
    fn user_serializes_with_frontend_field_names() {
        let now = Utc::now();
        let user = User {
            id: "abc".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+442071234567".to_string(),
            address: "12 Babbage St, London".to_string(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["_id"], "abc");
        assert_eq!(value["name"], "Ada Lovelace");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn missing_input_fields_deserialize_as_none() {
        let input: UserInput = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Ada"));
        assert!(input.email.is_none());
        assert!(input.phone.is_none());
        assert!(input.address.is_none());
    }
}
