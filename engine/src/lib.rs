//! # Roster Engine
//!
//! The client-side core of the roster user grid.
//!
//! This crate holds the user record types shared with the record service and
//! the [`GridController`], the state machine that keeps a local mirror of the
//! user table in step with the server while edits are applied optimistically.
//!
//! ## Design Principles
//!
//! - **No IO**: The controller returns [`Request`]s; the host performs them
//! - **Explicit state**: Pending operations live in the controller, never in globals
//! - **Testable**: Pure logic, every outcome can be driven from a unit test
//!
//! ## Lifecycle of a mutation
//!
//! Every mutation moves through `Idle -> Optimistic -> {Committed | RolledBack}`:
//!
//! 1. The controller changes its local rows and records an [`OpKey`] in the
//!    [`PendingSet`]
//! 2. The host sends the returned [`Request`] to the record service
//! 3. The host reports the result with `finish_update`, `finish_delete` or
//!    `finish_create`; failures revert the local rows and queue a [`Notice`]
//!
//! While any key is pending, server snapshots are discarded rather than merged.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use roster_engine::{GridController, Request, UserField, UserRecord};
//!
//! let mut grid = GridController::with_snapshot(vec![UserRecord {
//!     id: 1,
//!     name: "John".into(),
//!     age: 28,
//!     email: "john@example.com".into(),
//!     last_updated: Utc::now(),
//! }]);
//!
//! grid.begin_edit(1, UserField::Age).unwrap();
//! grid.set_edit_value("29");
//! let request = grid.commit_edit().unwrap();
//! assert!(matches!(request, Request::Update { .. }));
//! assert_eq!(grid.row(1).unwrap().age, 29);
//!
//! // The server refused the change: the cell reverts.
//! let key = request.key().unwrap().clone();
//! grid.finish_update(&key, Err("store unavailable".into())).unwrap();
//! assert_eq!(grid.row(1).unwrap().age, 28);
//! assert_eq!(grid.take_notices().len(), 1);
//! ```

pub mod error;
pub mod grid;
pub mod operation;
pub mod pending;
pub mod user;

// Re-export main types at crate root
pub use error::Error;
pub use grid::{EditCursor, GridController, Notice, NoticeKind, RowView, SnapshotOutcome};
pub use operation::{OpKey, Request};
pub use pending::PendingSet;
pub use user::{DeleteUser, FieldValue, NewUser, UserField, UserPatch, UserRecord};

/// Primary key of a user row. Negative values are local placeholders.
pub type RowId = i64;
