// SPDX-License-Identifier: MIT

//! Remote access layer: the typed API surface and its HTTP implementation.
//!
//! `ActivityApi` is the seam between the sync/cache layer and the network, so
//! tests can substitute an in-process fake. `RemoteClient` implements it with
//! reqwest against a base URL, translating transport failures and error
//! bodies into the `ApiError` taxonomy.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{ApiError, ErrorBody, Result};
use crate::models::{
    Activity, ActivityPage, ActivityStats, BulkDeleteRequest, BulkDeleteResponse,
    CreateActivityRequest, CreateGoalRequest, Goal, ListParams, StatsParams,
    UpdateActivityRequest, UpdateGoalRequest,
};

/// Upper bound on any remote call; past this the call counts as a network
/// failure and becomes eligible for the retry policy.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The full HTTP-shaped contract the client layer depends on.
#[async_trait]
pub trait ActivityApi: Send + Sync {
    async fn list_activities(&self, params: &ListParams) -> Result<ActivityPage>;
    async fn get_activity(&self, id: &str) -> Result<Activity>;
    async fn create_activity(&self, req: &CreateActivityRequest) -> Result<Activity>;
    /// Merge the provided fields over the stored record. The server accepts
    /// PUT and PATCH with identical merge semantics; this client standardizes
    /// on PATCH.
    async fn update_activity(&self, id: &str, req: &UpdateActivityRequest) -> Result<Activity>;
    async fn delete_activity(&self, id: &str) -> Result<()>;
    async fn bulk_delete_activities(&self, ids: &[String]) -> Result<BulkDeleteResponse>;
    async fn get_stats(&self, params: &StatsParams) -> Result<ActivityStats>;
    async fn get_goal(&self, user_id: &str) -> Result<Goal>;
    async fn create_goal(&self, req: &CreateGoalRequest) -> Result<Goal>;
    async fn update_goal(&self, user_id: &str, req: &UpdateGoalRequest) -> Result<Goal>;
    async fn reset_goal(&self, user_id: &str) -> Result<Goal>;
}

/// HTTP client for the activities API.
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Unknown {
                status: None,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        response.json().await.map_err(|e| ApiError::Unknown {
            status: None,
            message: format!("JSON parse error: {}", e),
        })
    }

    /// Check response status for bodiless endpoints (delete).
    async fn check_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::response_error(response).await)
    }

    /// Translate a non-success response into the error taxonomy, preferring
    /// the structured `{ message, code }` body when the server sent one.
    async fn response_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        match response.json::<ErrorBody>().await {
            Ok(body) => body.into_error(status),
            Err(_) => match status {
                400 => ApiError::validation("bad request"),
                401 => ApiError::Unauthorized,
                403 => ApiError::Forbidden,
                404 => ApiError::NotFound {
                    resource: "activity",
                    id: String::new(),
                },
                _ => ApiError::Unknown {
                    status: Some(status),
                    message: format!("HTTP {}", status),
                },
            },
        }
    }

    /// No response received: offline, DNS failure, or timeout.
    fn transport_error(e: reqwest::Error) -> ApiError {
        ApiError::Network(e.to_string())
    }
}

#[async_trait]
impl ActivityApi for RemoteClient {
    async fn list_activities(&self, params: &ListParams) -> Result<ActivityPage> {
        let response = self
            .http
            .get(self.url("/activities"))
            .query(params)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn get_activity(&self, id: &str) -> Result<Activity> {
        let response = self
            .http
            .get(self.url(&format!("/activities/{}", id)))
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn create_activity(&self, req: &CreateActivityRequest) -> Result<Activity> {
        let response = self
            .http
            .post(self.url("/activities"))
            .json(req)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn update_activity(&self, id: &str, req: &UpdateActivityRequest) -> Result<Activity> {
        let response = self
            .http
            .patch(self.url(&format!("/activities/{}", id)))
            .json(req)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/activities/{}", id)))
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response(response).await
    }

    async fn bulk_delete_activities(&self, ids: &[String]) -> Result<BulkDeleteResponse> {
        let body = BulkDeleteRequest { ids: ids.to_vec() };
        let response = self
            .http
            .post(self.url("/activities/bulk-delete"))
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn get_stats(&self, params: &StatsParams) -> Result<ActivityStats> {
        let response = self
            .http
            .get(self.url("/activities-stats"))
            .query(params)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn get_goal(&self, user_id: &str) -> Result<Goal> {
        let response = self
            .http
            .get(self.url(&format!("/goals/{}", user_id)))
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn create_goal(&self, req: &CreateGoalRequest) -> Result<Goal> {
        let response = self
            .http
            .post(self.url("/goals"))
            .json(req)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn update_goal(&self, user_id: &str, req: &UpdateGoalRequest) -> Result<Goal> {
        let response = self
            .http
            .patch(self.url(&format!("/goals/{}", user_id)))
            .json(req)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }

    async fn reset_goal(&self, user_id: &str) -> Result<Goal> {
        let response = self
            .http
            .delete(self.url(&format!("/goals/{}", user_id)))
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.check_response_json(response).await
    }
}
