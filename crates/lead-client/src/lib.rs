//! Client for the lead conversation API.
//!
//! [`LeadApiClient`] wraps the JSON endpoints. [`ConversationFlow`] is what a
//! caller uses during a call: it opens a [`lead_core::Wizard`] with the right
//! catalog and any prior answers, then submits it.
//!
//! # Example
//!
//! ```no_run
//! use lead_client::{ClientConfig, ConversationFlow, LeadApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LeadApiClient::new(ClientConfig::default())?;
//!     let flow = ConversationFlow::new(client);
//!
//!     let mut wizard = flow.open(Some("org-1"), "lead-1").await;
//!     wizard.start();
//!     wizard.select(1, "call_continued")?;
//!     wizard.set_rating(4)?;
//!
//!     let saved = flow.submit(&mut wizard, "lead-1").await?;
//!     println!("Lead score: {}", saved.overall_lead_score);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod flow;

pub use client::LeadApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use flow::ConversationFlow;
