//! User record types shared by the server, the client and the grid.

use crate::{error::Result, Error, RowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A persisted user as returned by the record service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Server-assigned primary key
    pub id: RowId,
    pub name: String,
    pub age: i32,
    pub email: String,
    /// Refreshed on every insert and update
    pub last_updated: DateTime<Utc>,
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, age: i32, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            email: email.into(),
        }
    }

    /// The default row the grid page inserts when "add" is pressed.
    ///
    /// The timestamp suffix keeps generated names distinct.
    pub fn placeholder(timestamp_ms: i64) -> Self {
        Self::new(format!("New User_{timestamp_ms}"), 25, "new@example.com")
    }
}

/// Body of an update request. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub id: RowId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    /// A patch that touches nothing but the target id.
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// A patch setting exactly one field.
    pub fn single(id: RowId, field: UserField, value: &FieldValue) -> Self {
        let mut patch = Self::new(id);
        match (field, value) {
            (UserField::Name, FieldValue::Text(v)) => patch.name = Some(v.clone()),
            (UserField::Email, FieldValue::Text(v)) => patch.email = Some(v.clone()),
            (UserField::Age, FieldValue::Int(v)) => patch.age = Some(*v),
            // Mismatched pairs cannot come out of UserField::parse.
            _ => {}
        }
        patch
    }

    /// True if the patch changes no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.email.is_none()
    }

    /// Merge this patch into a record, leaving absent fields alone.
    pub fn apply_to(&self, record: &mut UserRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
    }
}

/// Body of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUser {
    pub id: RowId,
}

/// An editable column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserField {
    Name,
    Age,
    Email,
}

impl UserField {
    /// Column order used by the grid.
    pub const ALL: [UserField; 3] = [UserField::Name, UserField::Age, UserField::Email];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Name => "name",
            UserField::Age => "age",
            UserField::Email => "email",
        }
    }

    /// Parse an edit buffer into this field's typed value.
    pub fn parse(self, input: &str) -> Result<FieldValue> {
        match self {
            UserField::Name | UserField::Email => Ok(FieldValue::Text(input.to_string())),
            UserField::Age => input
                .trim()
                .parse()
                .map(FieldValue::Int)
                .map_err(|_| Error::InvalidValue {
                    field: self,
                    value: input.to_string(),
                }),
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(UserField::Name),
            "age" => Ok(UserField::Age),
            "email" => Ok(UserField::Email),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }
}

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Int(i32),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{n}"),
        }
    }
}
