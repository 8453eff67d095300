//! Grid controller - the optimistic local mirror behind the data grid.
//!
//! The controller holds a local copy of every row, an edit cursor and the set
//! of in-flight mutations. Each mutation is applied locally first and handed
//! to the host as a [`Request`]; the host reports the outcome through the
//! matching `finish_*` call, which either commits the optimistic value or
//! rolls it back and raises a [`Notice`].
//!
//! Server snapshots are only accepted while nothing is in flight. A snapshot
//! that arrives during any pending mutation is dropped whole, so a stale read
//! can never clobber an optimistic edit.

use crate::{
    error::Result, Error, FieldValue, NewUser, OpKey, PendingSet, Request, RowId, UserField,
    UserPatch, UserRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// A row as the grid displays it.
///
/// Rows created locally carry a negative placeholder id until the server
/// confirms them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: RowId,
    pub name: String,
    pub age: i32,
    pub email: String,
    /// Unknown for unconfirmed rows
    pub last_updated: Option<DateTime<Utc>>,
}

impl RowView {
    fn placeholder(temp_id: RowId, user: &NewUser) -> Self {
        Self {
            id: temp_id,
            name: user.name.clone(),
            age: user.age,
            email: user.email.clone(),
            last_updated: None,
        }
    }

    /// True if the row has not been confirmed by the server yet.
    pub fn is_placeholder(&self) -> bool {
        self.id < 0
    }

    /// Read one cell.
    pub fn get(&self, field: UserField) -> FieldValue {
        match field {
            UserField::Name => FieldValue::Text(self.name.clone()),
            UserField::Age => FieldValue::Int(self.age),
            UserField::Email => FieldValue::Text(self.email.clone()),
        }
    }

    /// Write one cell. Values of the wrong shape are ignored.
    pub fn set(&mut self, field: UserField, value: FieldValue) {
        match (field, value) {
            (UserField::Name, FieldValue::Text(v)) => self.name = v,
            (UserField::Age, FieldValue::Int(v)) => self.age = v,
            (UserField::Email, FieldValue::Text(v)) => self.email = v,
            _ => {}
        }
    }
}

impl From<&UserRecord> for RowView {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            age: record.age,
            email: record.email.clone(),
            last_updated: Some(record.last_updated),
        }
    }
}

/// The cell currently in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCursor {
    pub id: RowId,
    pub field: UserField,
    /// Raw text typed so far
    pub buffer: String,
}

/// What raised a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    UpdateFailed,
    DeleteFailed,
    CreateFailed,
    InvalidInput,
}

/// A user-visible failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    /// Headline shown to the user
    pub message: String,
    /// Underlying error text
    pub detail: String,
}

impl Notice {
    fn new(kind: NoticeKind, detail: impl Into<String>) -> Self {
        let message = match kind {
            NoticeKind::UpdateFailed => "Failed to update cell",
            NoticeKind::DeleteFailed => "Failed to delete row",
            NoticeKind::CreateFailed => "Failed to create row",
            NoticeKind::InvalidInput => "Invalid cell value",
        };
        Self {
            kind,
            message: message.to_string(),
            detail: detail.into(),
        }
    }
}

/// Whether a server snapshot replaced the local mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Applied,
    /// Mirror kept because mutations were in flight; the snapshot is still
    /// recorded
    Discarded,
}

/// Client-side state manager for the user grid.
#[derive(Debug, Clone)]
pub struct GridController {
    /// Local mirror, in display order
    rows: Vec<RowView>,
    /// Last server-sourced list
    snapshot: Vec<UserRecord>,
    /// Cell in edit mode
    edit: Option<EditCursor>,
    /// Mutations awaiting a response
    pending: PendingSet,
    /// Pre-edit values for rows missing from the snapshot
    edit_fallbacks: BTreeMap<OpKey, FieldValue>,
    /// Values sent per in-flight edit key, oldest first
    sent_values: BTreeMap<OpKey, VecDeque<FieldValue>>,
    /// Next placeholder id (always negative)
    next_temp_id: RowId,
    /// Undelivered notices
    notices: Vec<Notice>,
}

impl Default for GridController {
    fn default() -> Self {
        Self::new()
    }
}

impl GridController {
    /// Create an empty controller.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            snapshot: Vec::new(),
            edit: None,
            pending: PendingSet::new(),
            edit_fallbacks: BTreeMap::new(),
            sent_values: BTreeMap::new(),
            next_temp_id: -1,
            notices: Vec::new(),
        }
    }

    /// Create a controller seeded with a server list.
    pub fn with_snapshot(records: Vec<UserRecord>) -> Self {
        let mut grid = Self::new();
        grid.receive_snapshot(records);
        grid
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[RowView] {
        &self.rows
    }

    /// Get a row by id.
    pub fn row(&self, id: RowId) -> Option<&RowView> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// The last accepted server list.
    pub fn snapshot(&self) -> &[UserRecord] {
        &self.snapshot
    }

    /// Columns shown by the grid (the id column is hidden).
    pub fn columns(&self) -> &'static [UserField] {
        &UserField::ALL
    }

    /// The cell in edit mode, if any.
    pub fn editing(&self) -> Option<&EditCursor> {
        self.edit.as_ref()
    }

    /// In-flight mutations.
    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    /// True when no mutation is in flight.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Offer a fresh server list.
    ///
    /// The list always becomes the new snapshot. The mirror is replaced
    /// wholesale only when nothing is in flight.
    pub fn receive_snapshot(&mut self, records: Vec<UserRecord>) -> SnapshotOutcome {
        if !self.pending.is_empty() {
            self.snapshot = records;
            return SnapshotOutcome::Discarded;
        }

        self.rows = records.iter().map(RowView::from).collect();
        self.snapshot = records;

        // Leave edit mode if the edited row is gone
        if let Some(cursor) = &self.edit {
            if self.row(cursor.id).is_none() {
                self.edit = None;
            }
        }

        SnapshotOutcome::Applied
    }

    /// Enter edit mode on a cell.
    ///
    /// A cell already being edited elsewhere is committed first; its update
    /// request is returned.
    pub fn begin_edit(&mut self, id: RowId, field: UserField) -> Result<Option<Request>> {
        let row = self.row(id).ok_or(Error::RowNotFound(id))?;
        if row.is_placeholder() {
            return Err(Error::Unconfirmed(id));
        }
        let buffer = row.get(field).to_string();

        if let Some(cursor) = &self.edit {
            if cursor.id == id && cursor.field == field {
                return Ok(None);
            }
        }

        let previous = self.commit_edit();
        self.edit = Some(EditCursor { id, field, buffer });
        Ok(previous)
    }

    /// Replace the edit buffer.
    pub fn set_edit_value(&mut self, text: impl Into<String>) {
        if let Some(cursor) = &mut self.edit {
            cursor.buffer = text.into();
        }
    }

    /// Commit the cell in edit mode (on blur or Enter).
    ///
    /// Applies the value locally, marks `<id>-<field>` pending and returns
    /// the update to send. Returns `None` without a cursor, when the edited
    /// row has vanished, or when the buffer is not a valid value for the
    /// field (an `InvalidInput` notice is raised in that case).
    pub fn commit_edit(&mut self) -> Option<Request> {
        let EditCursor { id, field, buffer } = self.edit.take()?;

        let value = match field.parse(&buffer) {
            Ok(value) => value,
            Err(e) => {
                self.notices
                    .push(Notice::new(NoticeKind::InvalidInput, e.to_string()));
                return None;
            }
        };

        let row = self.rows.iter_mut().find(|r| r.id == id)?;
        let previous = row.get(field);
        row.set(field, value.clone());

        let key = OpKey::Edit { id, field };
        self.edit_fallbacks.entry(key.clone()).or_insert(previous);
        self.sent_values
            .entry(key.clone())
            .or_default()
            .push_back(value.clone());
        self.pending.insert(key.clone());

        Some(Request::Update {
            key,
            patch: UserPatch::single(id, field, &value),
        })
    }

    /// Report the outcome of an update.
    ///
    /// On success the optimistic value stands, the snapshot records it and a
    /// refresh is requested.
    /// On failure the cell reverts to its server-confirmed value.
    pub fn finish_update(
        &mut self,
        key: &OpKey,
        outcome: std::result::Result<(), String>,
    ) -> Result<Option<Request>> {
        let OpKey::Edit { id, field } = *key else {
            return Err(Error::InvalidOpKey(key.to_string()));
        };
        if !self.pending.release(key) {
            return Err(Error::NotPending(key.clone()));
        }

        let fallback = if self.pending.contains(key) {
            self.edit_fallbacks.get(key).cloned()
        } else {
            self.edit_fallbacks.remove(key)
        };
        let sent = self.sent_values.get_mut(key).and_then(VecDeque::pop_front);
        if !self.pending.contains(key) {
            self.sent_values.remove(key);
        }

        match outcome {
            Ok(()) => {
                if let (Some(value), Some(record)) =
                    (sent, self.snapshot.iter_mut().find(|r| r.id == id))
                {
                    UserPatch::single(id, field, &value).apply_to(record);
                }
                Ok(Some(Request::List))
            }
            Err(detail) => {
                let confirmed = self
                    .snapshot
                    .iter()
                    .find(|r| r.id == id)
                    .map(|r| RowView::from(r).get(field))
                    .or(fallback);

                if let (Some(value), Some(row)) =
                    (confirmed, self.rows.iter_mut().find(|r| r.id == id))
                {
                    row.set(field, value);
                }
                self.notices
                    .push(Notice::new(NoticeKind::UpdateFailed, detail));
                Ok(None)
            }
        }
    }

    /// Remove a row optimistically and return the delete to send.
    pub fn delete_row(&mut self, id: RowId) -> Result<Request> {
        let row = self.row(id).ok_or(Error::RowNotFound(id))?;
        if row.is_placeholder() {
            return Err(Error::Unconfirmed(id));
        }

        if self.edit.as_ref().is_some_and(|c| c.id == id) {
            self.edit = None;
        }
        self.rows.retain(|r| r.id != id);

        let key = OpKey::Delete(id);
        self.pending.insert(key.clone());
        Ok(Request::Delete { key, id })
    }

    /// Report the outcome of a delete.
    ///
    /// On success the row also leaves the snapshot. On failure the whole
    /// mirror is reset to the last snapshot.
    pub fn finish_delete(
        &mut self,
        key: &OpKey,
        outcome: std::result::Result<(), String>,
    ) -> Result<Option<Request>> {
        let OpKey::Delete(id) = *key else {
            return Err(Error::InvalidOpKey(key.to_string()));
        };
        if !self.pending.release(key) {
            return Err(Error::NotPending(key.clone()));
        }

        match outcome {
            Ok(()) => {
                self.snapshot.retain(|r| r.id != id);
                Ok(Some(Request::List))
            }
            Err(detail) => {
                self.rows = self.snapshot.iter().map(RowView::from).collect();
                self.notices
                    .push(Notice::new(NoticeKind::DeleteFailed, detail));
                Ok(None)
            }
        }
    }

    /// Append a placeholder row and return the create to send.
    pub fn create_row(&mut self, user: NewUser) -> Request {
        let temp_id = self.next_temp_id;
        self.next_temp_id -= 1;

        self.rows.push(RowView::placeholder(temp_id, &user));

        let key = OpKey::Create(temp_id);
        self.pending.insert(key.clone());
        Request::Create { key, user }
    }

    /// Report the outcome of a create.
    ///
    /// On success the placeholder is swapped in place for the server record
    /// (appended if a delete rollback already dropped the placeholder). On
    /// failure the placeholder is removed.
    pub fn finish_create(
        &mut self,
        key: &OpKey,
        outcome: std::result::Result<UserRecord, String>,
    ) -> Result<()> {
        let OpKey::Create(temp_id) = *key else {
            return Err(Error::InvalidOpKey(key.to_string()));
        };
        if !self.pending.release(key) {
            return Err(Error::NotPending(key.clone()));
        }

        match outcome {
            Ok(record) => {
                let view = RowView::from(&record);
                match self.rows.iter_mut().find(|r| r.id == temp_id) {
                    Some(row) => *row = view,
                    None => self.rows.push(view),
                }
                self.snapshot.push(record);
            }
            Err(detail) => {
                self.rows.retain(|r| r.id != temp_id);
                self.notices
                    .push(Notice::new(NoticeKind::CreateFailed, detail));
            }
        }
        Ok(())
    }
}
