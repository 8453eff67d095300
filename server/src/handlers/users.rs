//! User handlers - list, create, update and delete against the row store.
//!
//! Handlers are stateless: each call borrows the store for one operation
//! and converts store failures into the endpoint's generic error.

use crate::db::UserStore;
use crate::error::{AppError, Result};
use roster_engine::{DeleteUser, NewUser, UserPatch, UserRecord};
use serde::{Deserialize, Serialize};

/// Body returned by mutations.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Body returned by a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: UserRecord,
}

/// Return every user.
pub async fn handle_list(store: &dyn UserStore) -> Result<Vec<UserRecord>> {
    let users = store
        .list()
        .await
        .map_err(AppError::store("Failed to fetch users"))?;

    tracing::debug!("Listed {} users", users.len());
    Ok(users)
}

/// Insert a user and return it with its assigned id.
pub async fn handle_create(store: &dyn UserStore, user: NewUser) -> Result<CreateUserResponse> {
    let created = store
        .insert(&user)
        .await
        .map_err(AppError::store("Failed to create user"))?;

    tracing::info!("Created user {} ({})", created.id, created.name);
    Ok(CreateUserResponse {
        message: "User created".to_string(),
        user: created,
    })
}

/// Apply a partial update to an existing user.
pub async fn handle_update(store: &dyn UserStore, patch: UserPatch) -> Result<MessageResponse> {
    store
        .update(&patch)
        .await
        .map_err(AppError::store("Failed to update user"))?;

    tracing::info!("Updated user {}", patch.id);
    Ok(MessageResponse::new("User updated"))
}

/// Delete a user. Deleting an id that does not exist succeeds.
pub async fn handle_delete(store: &dyn UserStore, request: DeleteUser) -> Result<MessageResponse> {
    let removed = store
        .delete(request.id)
        .await
        .map_err(AppError::store("Failed to delete user"))?;

    if removed == 0 {
        tracing::debug!("Delete of user {} matched no rows", request.id);
    } else {
        tracing::info!("Deleted user {}", request.id);
    }
    Ok(MessageResponse::new("User deleted"))
}
