//! Lead conversation API HTTP client.

use lead_core::{Conversation, ConversationSubmission, QuestionDraft, QuestionSet};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Body of a question set upsert.
#[derive(Debug, Serialize)]
struct UpsertQuestionSet<'a> {
    organization_id: &'a str,
    questions: &'a [QuestionDraft],
}

/// Envelope of a successful write.
#[derive(Debug, Deserialize)]
struct Saved<T> {
    data: T,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the lead conversation API.
#[derive(Debug, Clone)]
pub struct LeadApiClient {
    http: Client,
    config: ClientConfig,
}

impl LeadApiClient {
    /// Create a client. Does not contact the server.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a health check against the server.
    pub async fn health_check(&self) -> Result<bool, ClientError> {
        let url = self.config.health_url();
        debug!("Health check: {}", url);

        let resp = self.http.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Fetch an organization's stored catalog.
    pub async fn get_question_set(&self, organization_id: &str) -> Result<QuestionSet, ClientError> {
        let resp = self
            .http
            .get(self.config.question_set_url(organization_id))
            .send()
            .await?;
        read(resp).await
    }

    /// Create or replace an organization's catalog.
    pub async fn upsert_question_set(
        &self,
        organization_id: &str,
        questions: &[QuestionDraft],
    ) -> Result<QuestionSet, ClientError> {
        let body = UpsertQuestionSet {
            organization_id,
            questions,
        };
        let resp = self
            .http
            .post(self.config.create_question_set_url())
            .json(&body)
            .send()
            .await?;

        let saved: Saved<QuestionSet> = read(resp).await?;
        info!(
            organization_id = %saved.data.organization_id,
            questions = saved.data.questions.len(),
            "Question set saved"
        );
        Ok(saved.data)
    }

    /// Fetch a lead's conversation.
    pub async fn get_conversation(&self, lead_id: &str) -> Result<Conversation, ClientError> {
        let resp = self
            .http
            .get(self.config.conversation_url(lead_id))
            .send()
            .await?;
        read(resp).await
    }

    /// List every stored conversation.
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        let resp = self.http.get(self.config.conversations_url()).send().await?;
        read(resp).await
    }

    /// Submit a conversation, appending to any existing record for the lead.
    pub async fn submit_conversation(
        &self,
        submission: &ConversationSubmission,
    ) -> Result<Conversation, ClientError> {
        let resp = self
            .http
            .post(self.config.conversations_url())
            .json(submission)
            .send()
            .await?;

        let saved: Saved<Conversation> = read(resp).await?;
        Ok(saved.data)
    }
}

/// Decode a success body, or map the status and `{error}` body to a [`ClientError`].
async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    debug!(status = status.as_u16(), %message, "Request failed");

    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(message))
    } else {
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
