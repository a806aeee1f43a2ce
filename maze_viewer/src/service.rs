// service.rs - Client side of the generate/solve service contract
use serde::Serialize;
use std::time::Duration;

use crate::error_handling::{Result, TransportError};
use crate::protocol::{
    decode_generate, decode_solve, GenerateRequest, GenerateResponse, SolveRequest, SolveResponse,
    GENERATE_PATH, SOLVE_PATH,
};

/// The external maze/solver service. Implementations return decoded but
/// unvalidated responses; shape checks happen in `protocol`.
#[allow(async_fn_in_trait)]
pub trait MazeService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    async fn solve(&self, request: &SolveRequest<'_>) -> Result<SolveResponse>;
}

/// JSON-over-HTTP implementation talking to `POST /generate_maze` and
/// `POST /solve_maze`.
#[derive(Clone)]
pub struct HttpMazeService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMazeService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `body` as JSON and hand back the raw response bytes.
    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>> {
        let url = self.endpoint(path);
        log::debug!("POST {}", url);

        let transport_error = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout {
                    endpoint: path.to_string(),
                }
            } else {
                TransportError::Request {
                    endpoint: path.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }
}

impl MazeService for HttpMazeService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let body = self.post_json(GENERATE_PATH, request).await?;
        Ok(decode_generate(&body)?)
    }

    async fn solve(&self, request: &SolveRequest<'_>) -> Result<SolveResponse> {
        let body = self.post_json(SOLVE_PATH, request).await?;
        Ok(decode_solve(&body)?)
    }
}
