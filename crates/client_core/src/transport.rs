//! Backend seams for the two request/response contracts, plus the reqwest
//! implementation used against a live server.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::protocol::{
    ExplainRequest, ExplainResponse, RankTargetPairsRequest, RankTargetPairsResponse,
};

use crate::error::{BackendError, Result};

#[async_trait]
pub trait RankingBackend: Send + Sync {
    async fn rank_target_pairs(
        &self,
        request: &RankTargetPairsRequest,
    ) -> Result<RankTargetPairsResponse>;
}

#[async_trait]
pub trait ExplanationBackend: Send + Sync {
    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse>;
}

pub struct MissingRankingBackend;

#[async_trait]
impl RankingBackend for MissingRankingBackend {
    async fn rank_target_pairs(
        &self,
        _request: &RankTargetPairsRequest,
    ) -> Result<RankTargetPairsResponse> {
        Err(BackendError::Unavailable(
            "ranking backend is not configured".to_string(),
        ))
    }
}

pub struct MissingExplanationBackend;

#[async_trait]
impl ExplanationBackend for MissingExplanationBackend {
    async fn explain(&self, _request: &ExplainRequest) -> Result<ExplainResponse> {
        Err(BackendError::Unavailable(
            "explanation backend is not configured".to_string(),
        ))
    }
}

/// HTTP implementation of both backend contracts against a single server.
pub struct HttpApiBackend {
    http: Client,
    server_url: String,
}

impl HttpApiBackend {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into(),
        }
    }

    async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let server_url = &self.server_url;
        let response = self
            .http
            .post(format!("{server_url}{path}"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        // Decode from the raw body so an unexpected shape maps to
        // BackendError::Malformed rather than a transport error.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RankingBackend for HttpApiBackend {
    async fn rank_target_pairs(
        &self,
        request: &RankTargetPairsRequest,
    ) -> Result<RankTargetPairsResponse> {
        self.post_json("/api/rank_target_pairs", request).await
    }
}

#[async_trait]
impl ExplanationBackend for HttpApiBackend {
    async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse> {
        self.post_json("/api/explain", request).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
