//! List entity, its validated name, and allow-listed request parameters

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for list names
const MAX_LIST_NAME_LEN: usize = 255;

/// Top-level parameter key that wraps list attributes (`list[name]`, `{"list": {...}}`)
pub const PARAM_KEY: &str = "list";

/// List record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct List {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated list name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListName(String);

impl ListName {
    /// Create a list name, rejecting blank or oversized input.
    ///
    /// The value is stored as given; whitespace only matters for the blank check.
    ///
    /// # Example
    /// ```
    /// use listkeep_server::models::ListName;
    ///
    /// assert!(ListName::new("Groceries").is_ok());
    /// assert!(ListName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if s.chars().count() > MAX_LIST_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_LIST_NAME_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ListName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Permitted list attributes from a create/update request.
///
/// Only `name` survives; every other attribute is dropped on the floor.
/// `name: None` means the request carried the `list` key but no name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub name: Option<String>,
}

impl ListParams {
    /// Build from decoded form pairs (`list[name]=...`).
    ///
    /// Returns `None` when no `list[...]` key was submitted at all.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = format!("{}[", PARAM_KEY);
        let mut seen = false;
        let mut params = Self::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let Some(attr) = key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_suffix(']'))
            else {
                continue;
            };
            if attr.is_empty() {
                continue;
            }
            seen = true;
            if attr == "name" {
                params.name = Some(value.into());
            }
        }

        seen.then_some(params)
    }

    /// Build from a JSON body shaped `{"list": {"name": ...}}`.
    ///
    /// Returns `None` when `list` is absent, not an object, or empty.
    pub fn from_json(body: &Value) -> Option<Self> {
        let attrs = body
            .get(PARAM_KEY)?
            .as_object()
            .filter(|attrs| !attrs.is_empty())?;
        let name = attrs.get("name").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Some(Self { name })
    }
}
