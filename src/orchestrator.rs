//! Generation orchestrator: one attribute-goal request, end to end.
//!
//! DESIGN
//! ======
//! `submit_goal` resets the result panes, starts the progress ticker, awaits
//! the backend, and fans the response out to every pane. Teardown is scoped
//! to guards, so every exit path (including the future being dropped) leaves
//! the page interactive.
//!
//! One generation at a time. A submission made while another is outstanding
//! is rejected without touching the page.
//!
//! `LastGeneration` lives here and is only replaced after a successful
//! generation, under the page lock and before the feedback controls are
//! revealed. A declared failure leaves the previous value in place.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::AudienceApi;
use crate::page::Page;
use crate::regions::GENERATION_FAILED;
use crate::ticker::ProgressTicker;
use crate::types::{GenerationRequest, GenerationResult, LastGeneration};

/// How a `submit_goal` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only input. Nothing happened.
    Ignored,
    /// Another generation was still in flight. Nothing happened.
    Busy,
    Generated,
    /// The backend answered with `success: false`.
    Declined { error: String },
    /// Transport or decoding failure.
    Failed { error: String },
}

pub struct GenerationOrchestrator {
    api: Arc<dyn AudienceApi>,
    page: Page,
    ticker: ProgressTicker,
    in_flight: AtomicBool,
    last: Mutex<LastGeneration>,
}

impl GenerationOrchestrator {
    #[must_use]
    pub fn new(api: Arc<dyn AudienceApi>, page: Page, ticker: ProgressTicker) -> Self {
        Self { api, page, ticker, in_flight: AtomicBool::new(false), last: Mutex::new(LastGeneration::default()) }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Snapshot of the most recently displayed successful generation.
    #[must_use]
    pub fn last_generation(&self) -> LastGeneration {
        self.last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Turn operator input into one generation request and display the result.
    pub async fn submit_goal(&self, raw_input: &str) -> SubmitOutcome {
        let Some(request) = GenerationRequest::from_input(raw_input) else {
            return SubmitOutcome::Ignored;
        };
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(goal = %request.attribute_goal, "generation already in flight; submission rejected");
            return SubmitOutcome::Busy;
        }
        let _in_flight = InFlightGuard(&self.in_flight);

        let request_id = Uuid::new_v4();
        self.page.update(|state| {
            state.regions.reset();
            state.feedback_controls_visible = false;
            state.loading = true;
        });
        let _loading = LoadingGuard(&self.page);
        let mut ticker = self.ticker.start();

        info!(%request_id, goal = %request.attribute_goal, "generation submitted");
        let response = self.api.generate(&request).await;
        ticker.stop();

        match response {
            Ok(result) => self.apply_result(request_id, &request, &result),
            Err(e) => {
                warn!(%request_id, error = %e, "generation request failed");
                let message = e.to_string();
                self.page.update(|state| state.regions.explanation.show_error(message.clone()));
                SubmitOutcome::Failed { error: message }
            }
        }
    }

    fn apply_result(&self, request_id: Uuid, request: &GenerationRequest, result: &GenerationResult) -> SubmitOutcome {
        self.page.update(|state| {
            state.regions.populate(result);
            if result.success {
                let mut last = self.last.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                *last = LastGeneration::from_result(&request.attribute_goal, result);
            }
            state.feedback_controls_visible = true;
            state.feedback_message.clear();
        });

        if result.success {
            info!(
                %request_id,
                columns = result.columns().len(),
                attribute = result.attribute_name.as_deref().unwrap_or(""),
                "generation succeeded"
            );
            SubmitOutcome::Generated
        } else {
            let error = result
                .error
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| GENERATION_FAILED.to_owned());
            warn!(%request_id, %error, "backend declined generation");
            SubmitOutcome::Declined { error }
        }
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Hides the loading indicator when dropped.
struct LoadingGuard<'a>(&'a Page);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.update(|state| state.loading = false);
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
