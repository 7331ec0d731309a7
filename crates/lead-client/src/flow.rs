//! Caller-side conversation flow.
//!
//! Loading never fails: a missing or unreachable catalog falls back to the
//! default catalog, and a missing or unreadable conversation starts a fresh
//! wizard. Submission errors are returned and leave the wizard unsubmitted.

use lead_core::{resolve_catalog, Conversation, Question, Wizard};
use tracing::{debug, info, warn};

use crate::client::LeadApiClient;
use crate::error::ClientError;

/// Opens and submits lead conversations against the API.
#[derive(Debug, Clone)]
pub struct ConversationFlow {
    client: LeadApiClient,
}

impl ConversationFlow {
    pub fn new(client: LeadApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &LeadApiClient {
        &self.client
    }

    /// Catalog for an organization, or the default catalog.
    pub async fn load_catalog(&self, organization_id: Option<&str>) -> Vec<Question> {
        let stored = match organization_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(org) => match self.client.get_question_set(org).await {
                Ok(set) => Some(set.questions),
                Err(ClientError::NotFound(_)) => {
                    debug!(organization_id = %org, "No question set stored");
                    None
                }
                Err(err) => {
                    warn!(organization_id = %org, error = %err, "Failed to load question set");
                    None
                }
            },
            None => None,
        };

        resolve_catalog(stored)
    }

    /// Prior conversation for a lead, if one can be read.
    pub async fn load_conversation(&self, lead_id: &str) -> Option<Conversation> {
        match self.client.get_conversation(lead_id).await {
            Ok(conversation) => Some(conversation),
            Err(ClientError::NotFound(_)) => None,
            Err(err) => {
                warn!(lead_id = %lead_id, error = %err, "Failed to load conversation");
                None
            }
        }
    }

    /// Build the wizard for a lead, resuming any stored conversation.
    pub async fn open(&self, organization_id: Option<&str>, lead_id: &str) -> Wizard {
        let catalog = self.load_catalog(organization_id).await;

        match self.load_conversation(lead_id).await {
            Some(conversation) => {
                debug!(
                    lead_id = %lead_id,
                    answers = conversation.questions.len(),
                    "Resuming conversation"
                );
                Wizard::resume(catalog, &conversation)
            }
            None => Wizard::new(catalog),
        }
    }

    /// Persist the wizard's answers. Marks the wizard submitted only on success.
    pub async fn submit(
        &self,
        wizard: &mut Wizard,
        lead_id: &str,
    ) -> Result<Conversation, ClientError> {
        let submission = wizard.submission(lead_id)?;
        let conversation = self.client.submit_conversation(&submission).await?;
        wizard.mark_submitted();

        info!(
            lead_id = %conversation.lead_id,
            lead_score = conversation.overall_lead_score,
            answers = submission.questions.len(),
            "Conversation submitted"
        );
        Ok(conversation)
    }
}
