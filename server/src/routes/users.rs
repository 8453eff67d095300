//! User endpoint routes.

use axum::{extract::State, routing::get, Json, Router};
use roster_engine::{DeleteUser, NewUser, UserPatch, UserRecord};

use crate::error::Result;
use crate::handlers::{
    handle_create, handle_delete, handle_list, handle_update, CreateUserResponse, MessageResponse,
};
use crate::AppState;

/// Create user routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/users",
        get(list_handler)
            .post(create_handler)
            .put(update_handler)
            .delete(delete_handler),
    )
}

/// GET /api/users - List every user.
async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<UserRecord>>> {
    let users = handle_list(state.store.as_ref()).await?;
    Ok(Json(users))
}

/// POST /api/users - Create a user.
async fn create_handler(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<Json<CreateUserResponse>> {
    let response = handle_create(state.store.as_ref(), user).await?;
    Ok(Json(response))
}

/// PUT /api/users - Update the supplied fields of a user.
async fn update_handler(
    State(state): State<AppState>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<MessageResponse>> {
    let response = handle_update(state.store.as_ref(), patch).await?;
    Ok(Json(response))
}

/// DELETE /api/users - Delete a user by id.
async fn delete_handler(
    State(state): State<AppState>,
    Json(request): Json<DeleteUser>,
) -> Result<Json<MessageResponse>> {
    let response = handle_delete(state.store.as_ref(), request).await?;
    Ok(Json(response))
}
