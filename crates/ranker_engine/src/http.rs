use async_trait::async_trait;
use ranker_logging::{ranker_debug, ranker_info, ranker_warn};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    GenerationOutcome, ProgressRecord, ProgressService, ProgressStatus, ServiceError,
    ServiceSettings,
};

/// Header carrying the identity the host platform resolved for this user.
pub const IDENTITY_HEADER: &str = "X-Ranker-Identity";

/// `GET status` body, narrowed on its `status` tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum StatusBody {
    NotStarted {
        #[serde(default)]
        jobs: Vec<String>,
        #[serde(default)]
        traits: Option<String>,
    },
    InProgress {
        #[serde(default)]
        jobs: Vec<String>,
        #[serde(default)]
        ranking: Vec<String>,
        #[serde(default)]
        traits: Option<String>,
    },
    Completed {
        #[serde(default)]
        jobs: Vec<String>,
        #[serde(default)]
        ranking: Vec<String>,
        #[serde(default)]
        analysis: Option<String>,
        #[serde(default)]
        traits: Option<String>,
    },
}

impl From<StatusBody> for ProgressRecord {
    fn from(body: StatusBody) -> Self {
        match body {
            StatusBody::NotStarted { jobs, traits } => ProgressRecord {
                status: ProgressStatus::NotStarted,
                jobs,
                traits,
                ..ProgressRecord::default()
            },
            StatusBody::InProgress {
                jobs,
                ranking,
                traits,
            } => ProgressRecord {
                status: ProgressStatus::InProgress,
                jobs,
                ranking,
                analysis: None,
                traits,
            },
            StatusBody::Completed {
                jobs,
                ranking,
                analysis,
                traits,
            } => ProgressRecord {
                status: ProgressStatus::Completed,
                jobs,
                ranking,
                analysis,
                traits,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum SubmitBody<'a> {
    SaveInput {
        jobs: &'a [String],
        #[serde(skip_serializing_if = "Option::is_none")]
        ranking: Option<&'a [String]>,
    },
    BackToInput,
    GenerateAnalysis {
        jobs: &'a [String],
        ranking: &'a [String],
    },
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

/// Common `{ok, error?, ...}` envelope of every reply.
#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    traits: Option<String>,
    #[serde(default)]
    response: Option<String>,
}

impl Reply {
    fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "request failed".to_string())
    }
}

/// Client for the hosted persistence & narrative service.
#[derive(Debug, Clone)]
pub struct HttpProgressService {
    client: reqwest::Client,
    base: Url,
    settings: ServiceSettings,
}

impl HttpProgressService {
    pub fn new(base_url: &str, settings: ServiceSettings) -> Result<Self, ServiceError> {
        let mut base =
            Url::parse(base_url).map_err(|err| ServiceError::InvalidUrl(err.to_string()))?;
        // `join` replaces the last segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base,
            settings,
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url, ServiceError> {
        self.base
            .join(name)
            .map_err(|err| ServiceError::InvalidUrl(err.to_string()))
    }

    async fn submit(
        &self,
        identity: &str,
        body: &SubmitBody<'_>,
        bounded: bool,
    ) -> Result<(u16, Option<Reply>), ServiceError> {
        let url = self.endpoint("submit")?;
        let mut request = self
            .client
            .post(url)
            .header(IDENTITY_HEADER, identity)
            .header(ACCEPT, "application/json")
            .json(body);
        if bounded {
            request = request.timeout(self.settings.request_timeout);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;
        read_reply(response).await
    }

    async fn submit_expecting_ok(
        &self,
        identity: &str,
        body: &SubmitBody<'_>,
    ) -> Result<(), ServiceError> {
        match self.submit(identity, body, true).await? {
            (status, Some(reply)) if is_success(status) && reply.ok => Ok(()),
            (_, Some(reply)) if !reply.ok => Err(ServiceError::Rejected(reply.error_message())),
            (status, _) => Err(ServiceError::HttpStatus(status)),
        }
    }
}

#[async_trait]
impl ProgressService for HttpProgressService {
    async fn fetch_progress(&self, identity: &str) -> Result<ProgressRecord, ServiceError> {
        let url = self.endpoint("status")?;
        ranker_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(IDENTITY_HEADER, identity)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::HttpStatus(status.as_u16()));
        }
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|err| ServiceError::InvalidResponse(err.to_string()))?;
        let ok = value.get("ok").and_then(serde_json::Value::as_bool);
        if ok != Some(true) {
            let error = value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("status request failed");
            return Err(ServiceError::Rejected(error.to_string()));
        }
        let body: StatusBody = serde_json::from_value(value)
            .map_err(|err| ServiceError::InvalidResponse(err.to_string()))?;
        let record = ProgressRecord::from(body);
        ranker_info!("Fetched progress: {:?}", record.status);
        Ok(record)
    }

    async fn save_draft(
        &self,
        identity: &str,
        jobs: &[String],
        ranking: Option<&[String]>,
    ) -> Result<(), ServiceError> {
        ranker_debug!("Saving draft of {} jobs", jobs.len());
        self.submit_expecting_ok(identity, &SubmitBody::SaveInput { jobs, ranking })
            .await
    }

    async fn reset_to_input(&self, identity: &str) -> Result<(), ServiceError> {
        ranker_debug!("Resetting progress to input");
        self.submit_expecting_ok(identity, &SubmitBody::BackToInput)
            .await
    }

    async fn generate_and_complete(
        &self,
        identity: &str,
        jobs: &[String],
        ranking: &[String],
    ) -> Result<GenerationOutcome, ServiceError> {
        ranker_info!("Requesting analysis for {:?}", ranking);
        // No timeout: generation may take as long as the model needs.
        let body = SubmitBody::GenerateAnalysis { jobs, ranking };
        match self.submit(identity, &body, false).await? {
            (_, Some(reply)) if !reply.ok => {
                ranker_warn!("Analysis rejected: {:?}", reply.error);
                Ok(GenerationOutcome::Rejected {
                    error: reply.error_message(),
                })
            }
            (status, Some(reply)) if is_success(status) => Ok(GenerationOutcome::Completed {
                narrative: reply.analysis.unwrap_or_default(),
                traits: reply.traits,
            }),
            (status, _) => Err(ServiceError::HttpStatus(status)),
        }
    }

    async fn career_chat(&self, identity: &str, message: &str) -> Result<String, ServiceError> {
        let url = self.endpoint("career-chat")?;
        let response = self
            .client
            .post(url)
            .header(IDENTITY_HEADER, identity)
            .header(ACCEPT, "application/json")
            .timeout(self.settings.request_timeout)
            .json(&ChatBody { message })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match read_reply(response).await? {
            (status, Some(reply)) if is_success(status) && reply.ok => reply
                .response
                .filter(|text| !text.trim().is_empty())
                .ok_or_else(|| ServiceError::InvalidResponse("empty chat response".to_string())),
            (_, Some(reply)) if !reply.ok => Err(ServiceError::Rejected(reply.error_message())),
            (status, _) => Err(ServiceError::HttpStatus(status)),
        }
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Reads the status and, if the body parses, the reply envelope.
async fn read_reply(response: reqwest::Response) -> Result<(u16, Option<Reply>), ServiceError> {
    let status = response.status().as_u16();
    let raw = response.text().await.map_err(map_reqwest_error)?;
    let reply = match serde_json::from_str::<Reply>(&raw) {
        Ok(reply) => Some(reply),
        Err(err) => {
            let preview: String = raw.chars().take(280).collect();
            ranker_warn!("Non-JSON reply (status {}): {} ({})", status, preview, err);
            if is_success(status) {
                return Err(ServiceError::InvalidResponse(format!(
                    "server returned non-JSON: {preview}"
                )));
            }
            None
        }
    };
    Ok((status, reply))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Timeout;
    }
    ServiceError::Network(err.to_string())
}
