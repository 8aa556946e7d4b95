//! REST directory client.
//!
//! Neither call retries or times out on its own; the caller decides what a
//! failure means.

use huddle_proto::{LoginRequest, Room, User};

use crate::error::ApiError;

/// Client for the chat server's REST directory.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// Client rooted at `base_url` (e.g. `http://localhost:4000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Client reusing an existing HTTP client.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url }
    }

    /// `GET /rooms`.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` on a non-2xx response
    /// - `ApiError::Request` on network or decode failure
    pub async fn fetch_rooms(&self) -> Result<Vec<Room>, ApiError> {
        let response = self.http.get(format!("{}/rooms", self.base_url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { operation: "fetch rooms", status: status.as_u16() });
        }

        Ok(response.json().await?)
    }

    /// `POST /users`: log in and receive the server-assigned user record.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` on a non-2xx response
    /// - `ApiError::Request` on network or decode failure
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let response = self.http.post(format!("{}/users", self.base_url)).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { operation: "login", status: status.as_u16() });
        }

        Ok(response.json().await?)
    }
}
