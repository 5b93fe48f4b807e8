//! HTTP client for the placement API and the trait the UI layers talk to.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{PlacementRecord, RecordInput, Stats};

/// Header carrying the admin token on privileged requests.
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Base URL used when neither config, env nor flags provide one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("admin authorization failed (HTTP {status})")]
    Unauthorized { status: u16 },
    #[error("record {id} not found")]
    NotFound { id: u32 },
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
}

impl ApiError {
    /// True when the server rejected the admin token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Operations offered by the placement API.
///
/// Privileged calls take the admin token explicitly: the server authorizes
/// every mutation on its own, whatever the client believes about the token.
pub trait PlacementApi: Send + Sync {
    /// `GET /companies`
    fn list_companies(&self) -> ApiFuture<'_, Vec<PlacementRecord>>;

    /// `GET /companies/{id}`
    fn get_company(&self, id: u32) -> ApiFuture<'_, PlacementRecord>;

    /// `GET /stats`
    fn fetch_stats(&self) -> ApiFuture<'_, Stats>;

    /// `GET /auth/check`; `Ok(())` when the token is accepted.
    fn check_auth<'a>(&'a self, token: &'a str) -> ApiFuture<'a, ()>;

    /// `POST /companies`
    fn create_company<'a>(
        &'a self,
        token: &'a str,
        input: &'a RecordInput,
    ) -> ApiFuture<'a, PlacementRecord>;

    /// `PUT /companies/{id}`
    fn update_company<'a>(
        &'a self,
        token: &'a str,
        id: u32,
        input: &'a RecordInput,
    ) -> ApiFuture<'a, PlacementRecord>;

    /// `DELETE /companies/{id}`
    fn delete_company<'a>(&'a self, token: &'a str, id: u32) -> ApiFuture<'a, ()>;
}

/// reqwest-backed [`PlacementApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("placement-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        id: Option<u32>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        let resp = check_status(resp, id).await?;
        Ok(resp.json().await?)
    }
}

/// Map a non-success response onto the error taxonomy.
async fn check_status(
    resp: reqwest::Response,
    id: Option<u32>,
) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let code = status.as_u16();
    match (code, id) {
        (401 | 403, _) => Err(ApiError::Unauthorized { status: code }),
        (404, Some(id)) => Err(ApiError::NotFound { id }),
        _ => {
            let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
            let detail = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("detail").map(|d| match d.as_str() {
                        Some(s) => s.to_string(),
                        None => d.to_string(),
                    })
                })
                .unwrap_or(fallback);
            Err(ApiError::Status {
                status: code,
                detail,
            })
        }
    }
}

impl PlacementApi for ApiClient {
    fn list_companies(&self) -> ApiFuture<'_, Vec<PlacementRecord>> {
        Box::pin(async move { self.get_json("/companies", None).await })
    }

    fn get_company(&self, id: u32) -> ApiFuture<'_, PlacementRecord> {
        Box::pin(async move { self.get_json(&format!("/companies/{id}"), Some(id)).await })
    }

    fn fetch_stats(&self) -> ApiFuture<'_, Stats> {
        Box::pin(async move { self.get_json("/stats", None).await })
    }

    fn check_auth<'a>(&'a self, token: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let url = self.url("/auth/check");
            tracing::debug!(%url, "checking admin token");
            let resp = self
                .http
                .get(&url)
                .header(ADMIN_TOKEN_HEADER, token)
                .send()
                .await?;
            check_status(resp, None).await?;
            Ok(())
        })
    }

    fn create_company<'a>(
        &'a self,
        token: &'a str,
        input: &'a RecordInput,
    ) -> ApiFuture<'a, PlacementRecord> {
        Box::pin(async move {
            let url = self.url("/companies");
            tracing::debug!(%url, company = %input.company_name, "POST");
            let resp = self
                .http
                .post(&url)
                .header(ADMIN_TOKEN_HEADER, token)
                .json(input)
                .send()
                .await?;
            let resp = check_status(resp, None).await?;
            Ok(resp.json().await?)
        })
    }

    fn update_company<'a>(
        &'a self,
        token: &'a str,
        id: u32,
        input: &'a RecordInput,
    ) -> ApiFuture<'a, PlacementRecord> {
        Box::pin(async move {
            let url = self.url(&format!("/companies/{id}"));
            tracing::debug!(%url, "PUT");
            let resp = self
                .http
                .put(&url)
                .header(ADMIN_TOKEN_HEADER, token)
                .json(input)
                .send()
                .await?;
            let resp = check_status(resp, Some(id)).await?;
            Ok(resp.json().await?)
        })
    }

    fn delete_company<'a>(&'a self, token: &'a str, id: u32) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let url = self.url(&format!("/companies/{id}"));
            tracing::debug!(%url, "DELETE");
            let resp = self
                .http
                .delete(&url)
                .header(ADMIN_TOKEN_HEADER, token)
                .send()
                .await?;
            check_status(resp, Some(id)).await?;
            Ok(())
        })
    }
}
