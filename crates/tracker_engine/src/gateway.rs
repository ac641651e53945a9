use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracker_core::{JobDraft, JobId, JobPatch, JobRecord};
use tracker_logging::{tracker_debug, tracker_trace};

use crate::{FailureKind, GatewayError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GatewaySettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Remote store of job applications.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn list(&self) -> Result<Vec<JobRecord>, GatewayError>;

    /// Stores a draft and returns it with the server-assigned id.
    async fn create(&self, draft: &JobDraft) -> Result<JobRecord, GatewayError>;

    /// Applies a partial edit. The server may or may not echo the record.
    async fn update(&self, id: &JobId, patch: &JobPatch)
        -> Result<Option<JobRecord>, GatewayError>;

    async fn delete(&self, id: &JobId) -> Result<(), GatewayError>;
}

/// JSON-over-HTTP gateway rooted at `{base_url}/jobs`.
#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    jobs_url: Url,
}

impl ReqwestGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let base = settings.base_url.trim().trim_end_matches('/');
        let jobs_url = Url::parse(&format!("{base}/jobs"))
            .map_err(|err| GatewayError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if jobs_url.cannot_be_a_base() {
            return Err(GatewayError::new(
                FailureKind::InvalidUrl,
                format!("{base} cannot be used as a base address"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GatewayError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, jobs_url })
    }

    pub fn jobs_url(&self) -> &Url {
        &self.jobs_url
    }

    fn job_url(&self, id: &JobId) -> Result<Url, GatewayError> {
        let mut url = self.jobs_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::new(FailureKind::InvalidUrl, "base address has no path"))?
            .push(id.as_str());
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let response = request
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        tracker_trace!("Received {} byte response", body.len());
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl Gateway for ReqwestGateway {
    async fn list(&self) -> Result<Vec<JobRecord>, GatewayError> {
        tracker_debug!("GET {}", self.jobs_url);
        let body = self.execute(self.client.get(self.jobs_url.clone())).await?;
        decode(&body)
    }

    async fn create(&self, draft: &JobDraft) -> Result<JobRecord, GatewayError> {
        tracker_debug!("POST {}", self.jobs_url);
        let request = self
            .client
            .post(self.jobs_url.clone())
            .header(CONTENT_TYPE, JSON)
            .body(encode(draft)?);
        let body = self.execute(request).await?;
        decode(&body)
    }

    async fn update(
        &self,
        id: &JobId,
        patch: &JobPatch,
    ) -> Result<Option<JobRecord>, GatewayError> {
        let url = self.job_url(id)?;
        tracker_debug!("PUT {}", url);
        let request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, JSON)
            .body(encode(patch)?);
        let body = self.execute(request).await?;
        // Acknowledgement bodies vary between backends; only a full record is kept.
        Ok(serde_json::from_slice(&body).ok())
    }

    async fn delete(&self, id: &JobId) -> Result<(), GatewayError> {
        let url = self.job_url(id)?;
        tracker_debug!("DELETE {}", url);
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, GatewayError> {
    serde_json::to_vec(value).map_err(|err| GatewayError::new(FailureKind::Encode, err.to_string()))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|err| GatewayError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return GatewayError::new(FailureKind::InvalidUrl, err.to_string());
    }
    GatewayError::new(FailureKind::Network, err.to_string())
}
