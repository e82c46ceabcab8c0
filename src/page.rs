//! Page view model shared by the orchestrator, ticker, and feedback submitter.
//!
//! DESIGN
//! ======
//! `Page` is a cheap-to-clone handle around `Arc<Mutex<PageState>>`. Every
//! mutation goes through [`Page::update`], which holds the lock for the
//! duration of a synchronous closure only. The lock is never held across an
//! `.await`.

use std::sync::{Arc, Mutex};

use crate::regions::Regions;

/// Everything visible on the console page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub regions: Regions,
    pub loading: bool,
    /// Current progress line; left in place after the ticker stops.
    pub progress_message: Option<String>,
    pub feedback_controls_visible: bool,
    /// Acknowledgement line shown after a feedback click.
    pub feedback_message: String,
    /// Free-text comment attached to the next feedback submission.
    pub feedback_input: String,
    /// Ticker allowed to write `progress_message`. Cleared by `stop()`.
    pub(crate) ticker_owner: Option<u64>,
}

impl PageState {
    #[must_use]
    pub fn new(source_table: impl Into<String>) -> Self {
        Self {
            regions: Regions::new(source_table),
            loading: false,
            progress_message: None,
            feedback_controls_visible: false,
            feedback_message: String::new(),
            feedback_input: String::new(),
            ticker_owner: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    inner: Arc<Mutex<PageState>>,
}

impl Page {
    #[must_use]
    pub fn new(source_table: impl Into<String>) -> Self {
        Self { inner: Arc::new(Mutex::new(PageState::new(source_table))) }
    }

    /// Apply a synchronous mutation and return its result.
    pub fn update<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        let mut state = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }

    /// Copy of the current state, for rendering and assertions.
    #[must_use]
    pub fn snapshot(&self) -> PageState {
        self.update(|state| state.clone())
    }

    pub fn set_feedback_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.feedback_input = text);
    }
}
