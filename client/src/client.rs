//! HTTP client for the `/api/users` endpoints.

use crate::error::{ClientError, Result};
use reqwest::{Method, Response};
use roster_engine::{DeleteUser, NewUser, RowId, UserPatch, UserRecord};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct CreatedBody {
    user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin typed wrapper over the record service.
#[derive(Debug, Clone)]
pub struct RecordClient {
    http: reqwest::Client,
    users_url: String,
}

impl RecordClient {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// Every call is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            users_url: format!("{}/api/users", base_url.trim_end_matches('/')),
        })
    }

    /// GET /api/users
    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        let response = self.http.get(&self.users_url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// POST /api/users
    pub async fn create(&self, user: &NewUser) -> Result<UserRecord> {
        let response = self.send(Method::POST, user).await?;
        let body: CreatedBody = response.json().await?;
        Ok(body.user)
    }

    /// PUT /api/users
    pub async fn update(&self, patch: &UserPatch) -> Result<()> {
        self.send(Method::PUT, patch).await?;
        Ok(())
    }

    /// DELETE /api/users
    pub async fn delete(&self, id: RowId) -> Result<()> {
        self.send(Method::DELETE, &DeleteUser { id }).await?;
        Ok(())
    }

    async fn send<T: serde::Serialize + ?Sized>(&self, method: Method, body: &T) -> Result<Response> {
        let response = self
            .http
            .request(method, &self.users_url)
            .json(body)
            .send()
            .await?;
        check(response).await
    }
}

/// Turn a non-2xx response into [`ClientError::Status`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
