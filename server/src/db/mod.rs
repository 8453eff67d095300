//! Row store for the users table.
//!
//! The record service talks to storage only through [`UserStore`]. Every call
//! holds exactly one connection (or lock) for its duration and gives it back
//! on every exit path.

mod memory;
mod postgres;

pub use memory::*;
pub use postgres::*;

use async_trait::async_trait;
use roster_engine::{NewUser, RowId, UserPatch, UserRecord};

/// Errors raised by a row store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("user not found: {0}")]
    NotFound(RowId),

    #[error("store unavailable")]
    Unavailable,
}

/// Create/read/update/delete access to the users table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every user, ordered by id.
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Insert a user and return the row as stored, with its assigned id.
    async fn insert(&self, user: &NewUser) -> Result<UserRecord, StoreError>;

    /// Set exactly the fields present in `patch` and refresh `last_updated`.
    ///
    /// Fails with [`StoreError::NotFound`] if the id does not exist.
    async fn update(&self, patch: &UserPatch) -> Result<(), StoreError>;

    /// Delete a user, returning the number of rows removed (0 or 1).
    async fn delete(&self, id: RowId) -> Result<u64, StoreError>;
}

/// Users inserted by [`seed_demo_users`].
pub const DEMO_USERS: [(&str, i32, &str); 5] = [
    ("John", 28, "john@example.com"),
    ("Jane", 32, "jane@example.com"),
    ("Jack", 25, "jack@example.com"),
    ("Jill", 24, "jill@example.com"),
    ("James", 30, "james@example.com"),
];

/// Insert the demo users if the table is empty.
///
/// Returns how many rows were inserted.
pub async fn seed_demo_users(store: &dyn UserStore) -> Result<usize, StoreError> {
    if !store.list().await?.is_empty() {
        return Ok(0);
    }

    for (name, age, email) in DEMO_USERS {
        store.insert(&NewUser::new(name, age, email)).await?;
    }

    Ok(DEMO_USERS.len())
}
