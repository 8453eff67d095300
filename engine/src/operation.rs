//! Operation keys and outbound requests.
//!
//! The grid never talks to the network itself. Every mutation it starts is
//! expressed as a [`Request`] for the host to execute, tagged with the
//! [`OpKey`] the host hands back when the round trip completes.

use crate::{error::Result, Error, NewUser, RowId, UserField, UserPatch};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies an in-flight mutation.
///
/// Rendered as `"<id>-<field>"` for edits, `"delete-<id>"` for deletes and
/// `"create-<tempId>"` for creates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum OpKey {
    Edit { id: RowId, field: UserField },
    Delete(RowId),
    Create(RowId),
}

impl OpKey {
    /// Get the row this operation targets.
    pub fn row_id(&self) -> RowId {
        match self {
            OpKey::Edit { id, .. } => *id,
            OpKey::Delete(id) => *id,
            OpKey::Create(temp_id) => *temp_id,
        }
    }
}

impl fmt::Display for OpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKey::Edit { id, field } => write!(f, "{id}-{field}"),
            OpKey::Delete(id) => write!(f, "delete-{id}"),
            OpKey::Create(temp_id) => write!(f, "create-{temp_id}"),
        }
    }
}

impl FromStr for OpKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidOpKey(s.to_string());

        if let Some(rest) = s.strip_prefix("delete-") {
            return rest.parse().map(OpKey::Delete).map_err(|_| invalid());
        }
        if let Some(rest) = s.strip_prefix("create-") {
            return rest.parse().map(OpKey::Create).map_err(|_| invalid());
        }

        // Split from the right: placeholder ids are negative ("-1-name").
        let (id, field) = s.rsplit_once('-').ok_or_else(invalid)?;
        Ok(OpKey::Edit {
            id: id.parse().map_err(|_| invalid())?,
            field: field.parse().map_err(|_| invalid())?,
        })
    }
}

impl From<OpKey> for String {
    fn from(key: OpKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for OpKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A round trip the host must perform against the record service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Request {
    /// Fetch the full user list and feed it to `receive_snapshot`.
    List,
    /// Insert a user; report through `finish_create`.
    Create { key: OpKey, user: NewUser },
    /// Apply a partial update; report through `finish_update`.
    Update { key: OpKey, patch: UserPatch },
    /// Delete a user; report through `finish_delete`.
    Delete { key: OpKey, id: RowId },
}

impl Request {
    /// Get the pending key this request completes, if it is a mutation.
    pub fn key(&self) -> Option<&OpKey> {
        match self {
            Request::List => None,
            Request::Create { key, .. } => Some(key),
            Request::Update { key, .. } => Some(key),
            Request::Delete { key, .. } => Some(key),
        }
    }

    /// HTTP method used for this request.
    pub fn method(&self) -> &'static str {
        match self {
            Request::List => "GET",
            Request::Create { .. } => "POST",
            Request::Update { .. } => "PUT",
            Request::Delete { .. } => "DELETE",
        }
    }
}
