use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::RiddleParameters,
    protocol::{decode, decode_error, Payload, HEALTH_PATH, RIDDLE_PATH},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod error;
pub mod resolution;
pub mod view;

pub use config::{load_settings, Settings};
pub use error::SolveError;
pub use resolution::{
    Commit, FailureKind, RequestGeneration, ResolutionFailure, ResolutionMachine, ResolutionState,
};
pub use view::{render, ResolutionView};

/// The remote solver as seen by the client.
#[async_trait]
pub trait RiddleService: Send + Sync {
    async fn solve(&self, params: &RiddleParameters) -> Result<Payload, SolveError>;
    async fn health(&self) -> Result<(), SolveError>;
}

#[derive(Clone)]
pub struct RiddleClient {
    http: Client,
    endpoint: Url,
}

impl RiddleClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let endpoint = settings.endpoint_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `GET {endpoint}/api/v1/riddle?x=..&y=..&z=..` with the values as typed.
    pub fn riddle_url(&self, params: &RiddleParameters) -> Result<Url, SolveError> {
        let mut url = self.api_url(&RIDDLE_PATH)?;
        url.query_pairs_mut().extend_pairs(params.query_pairs());
        Ok(url)
    }

    fn api_url(&self, path: &[&str]) -> Result<Url, SolveError> {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| SolveError::Endpoint(self.endpoint.to_string()))?;
            segments.pop_if_empty().extend(path);
        }
        Ok(url)
    }

    async fn error_from_body(response: reqwest::Response) -> SolveError {
        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => return SolveError::Transport(err),
        };
        match decode_error(&body) {
            Ok(error) => SolveError::Service { status, error },
            Err(source) => SolveError::Decode { status, source },
        }
    }
}

#[async_trait]
impl RiddleService for RiddleClient {
    async fn solve(&self, params: &RiddleParameters) -> Result<Payload, SolveError> {
        let url = self.riddle_url(params)?;
        debug!(%url, "requesting riddle resolution");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let err = Self::error_from_body(response).await;
            warn!(status = status.as_u16(), "solver rejected riddle: {err}");
            return Err(err);
        }

        let body = response.bytes().await?;
        let payload = decode(&body).map_err(|source| SolveError::Decode {
            status: status.as_u16(),
            source,
        })?;
        info!(
            jug = payload.jug().as_str(),
            total_steps = payload.total_steps(),
            "riddle solved"
        );
        Ok(payload)
    }

    async fn health(&self) -> Result<(), SolveError> {
        let url = self.api_url(&HEALTH_PATH)?;
        let response = self.http.get(url).send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from_body(response).await)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
