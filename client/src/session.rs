//! Grid session - runs the grid controller's requests against the service.

use crate::client::RecordClient;
use crate::error::Result;
use roster_engine::{
    GridController, NewUser, Notice, Request, RowId, SnapshotOutcome, UserField,
};

/// A grid controller wired to a live record service.
///
/// Each user action applies locally, performs the round trip and feeds the
/// outcome back. Follow-up refreshes requested by the controller run before
/// the action returns.
#[derive(Debug)]
pub struct GridSession {
    client: RecordClient,
    grid: GridController,
}

impl GridSession {
    /// Create a session with an empty grid.
    pub fn new(client: RecordClient) -> Self {
        Self {
            client,
            grid: GridController::new(),
        }
    }

    /// The controller's current state.
    pub fn grid(&self) -> &GridController {
        &self.grid
    }

    /// Direct access for hosts that interleave round trips themselves.
    pub fn grid_mut(&mut self) -> &mut GridController {
        &mut self.grid
    }

    /// Drain failure notices raised so far.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.grid.take_notices()
    }

    /// Fetch the user list and offer it to the grid.
    pub async fn refresh(&mut self) -> Result<SnapshotOutcome> {
        let users = self.client.list().await?;
        let outcome = self.grid.receive_snapshot(users);
        tracing::debug!("Refresh {:?}", outcome);
        Ok(outcome)
    }

    /// Edit one cell and commit it, as a double-click, type and Enter would.
    pub async fn edit_cell(&mut self, id: RowId, field: UserField, text: &str) -> Result<()> {
        if let Some(previous) = self.grid.begin_edit(id, field)? {
            self.execute(previous).await?;
        }
        self.grid.set_edit_value(text);

        match self.grid.commit_edit() {
            Some(request) => self.execute(request).await,
            None => Ok(()),
        }
    }

    /// Delete a row.
    pub async fn delete_row(&mut self, id: RowId) -> Result<()> {
        let request = self.grid.delete_row(id)?;
        self.execute(request).await
    }

    /// Create a row.
    pub async fn create_row(&mut self, user: NewUser) -> Result<()> {
        let request = self.grid.create_row(user);
        self.execute(request).await
    }

    /// Perform a request and every follow-up the grid asks for.
    ///
    /// Mutation failures are reported to the grid, which rolls back and
    /// raises a notice; they are not returned as errors. A failed follow-up
    /// refresh is logged and leaves the grid as it is.
    pub async fn execute(&mut self, request: Request) -> Result<()> {
        let mut next = Some(request);
        let mut follow_up = false;

        while let Some(request) = next.take() {
            tracing::debug!("{} /api/users {:?}", request.method(), request.key());

            next = match request {
                Request::List if follow_up => {
                    if let Err(e) = self.refresh().await {
                        tracing::warn!("Follow-up refresh failed: {}", e);
                    }
                    None
                }
                Request::List => {
                    self.refresh().await?;
                    None
                }
                Request::Create { key, user } => {
                    let outcome = self.client.create(&user).await.map_err(|e| e.to_string());
                    if let Err(e) = &outcome {
                        tracing::warn!("Create {} failed: {}", key, e);
                    }
                    self.grid.finish_create(&key, outcome)?;
                    None
                }
                Request::Update { key, patch } => {
                    let outcome = self.client.update(&patch).await.map_err(|e| e.to_string());
                    if let Err(e) = &outcome {
                        tracing::warn!("Update {} failed, rolling back: {}", key, e);
                    }
                    self.grid.finish_update(&key, outcome)?
                }
                Request::Delete { key, id } => {
                    let outcome = self.client.delete(id).await.map_err(|e| e.to_string());
                    if let Err(e) = &outcome {
                        tracing::warn!("Delete {} failed, restoring snapshot: {}", key, e);
                    }
                    self.grid.finish_delete(&key, outcome)?
                }
            };
            follow_up = true;
        }

        Ok(())
    }
}
