//! Feedback submitter: thumbs up/down on the last generation.
//!
//! The acknowledgement line is written before the request is sent and is
//! never retracted. Submission runs on a spawned task; the outcome is only
//! logged. No retry.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::backend::AudienceApi;
use crate::csrf::CsrfSource;
use crate::page::Page;
use crate::types::{FeedbackEvent, FeedbackKind, LastGeneration};

pub const FEEDBACK_ACK: &str = "Thanks for providing your feedback!";

pub struct FeedbackSubmitter {
    api: Arc<dyn AudienceApi>,
    page: Page,
    csrf: CsrfSource,
}

impl FeedbackSubmitter {
    #[must_use]
    pub fn new(api: Arc<dyn AudienceApi>, page: Page, csrf: CsrfSource) -> Self {
        Self { api, page, csrf }
    }

    #[must_use]
    pub fn csrf(&self) -> &CsrfSource {
        &self.csrf
    }

    /// Acknowledge immediately, then send `kind` for `last` in the background.
    ///
    /// Must be called from within a tokio runtime. The returned handle may be
    /// dropped; awaiting it only waits for the outcome to be logged.
    pub fn submit(&self, kind: FeedbackKind, last: &LastGeneration) -> JoinHandle<()> {
        let feedback_text = self.page.update(|state| {
            state.feedback_message = FEEDBACK_ACK.to_owned();
            state.feedback_input.clone()
        });
        let event = FeedbackEvent::new(kind, feedback_text, last);
        let token = self.csrf.resolve();
        if token.is_none() {
            warn!("no CSRF token available; feedback sent without one");
        }
        info!(feedback = kind.as_str(), goal = %event.attribute_goal, "sending feedback");

        let api = self.api.clone();
        let page = self.page.clone();
        tokio::spawn(async move {
            match api.submit_feedback(&event, token.as_deref()).await {
                Ok(receipt) => {
                    match (receipt.message, receipt.error) {
                        (Some(message), _) => info!(%message, "feedback recorded"),
                        (None, Some(err)) => warn!(error = %err, "feedback rejected by backend"),
                        (None, None) => info!("feedback submitted"),
                    }
                    page.update(|state| state.feedback_input.clear());
                }
                Err(e) => error!(feedback = event.feedback.as_str(), error = %e, "error submitting feedback"),
            }
        })
    }
}

#[cfg(test)]
#[path = "feedback_test.rs"]
mod tests;
