use std::time::Duration;

use async_trait::async_trait;
use ranker_logging::ranker_debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ServiceError;

/// The text-generation collaborator: one prompt in, free-form text out.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Used when no generator is configured; every request degrades.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableGenerator;

#[async_trait]
impl NarrativeGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Rejected(
            "no text generator is configured".to_string(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Posts `{"prompt": ...}` to a JSON endpoint and reads `{"text": ...}` back.
#[derive(Debug, Clone)]
pub struct HttpNarrativeGenerator {
    client: reqwest::Client,
    url: Url,
}

impl HttpNarrativeGenerator {
    pub fn new(url: &str, connect_timeout: Duration) -> Result<Self, ServiceError> {
        let url = Url::parse(url).map_err(|err| ServiceError::InvalidUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl NarrativeGenerator for HttpNarrativeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        ranker_debug!("Generating text for a {} byte prompt", prompt.len());
        let response = self
            .client
            .post(self.url.clone())
            .json(&GenerateRequest { prompt })
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ServiceError::Timeout
                } else {
                    ServiceError::Network(err.to_string())
                }
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::HttpStatus(status.as_u16()));
        }
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| ServiceError::InvalidResponse(err.to_string()))?;
        Ok(body.text)
    }
}
