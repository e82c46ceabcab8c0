//! Progress ticker: paced status lines while a generation is outstanding.
//!
//! DESIGN
//! ======
//! The first message is written synchronously by `start()`; the remaining
//! ones are written by a spawned task that sleeps one interval between
//! writes and ends after the last message (no loop).
//!
//! The ticker is cosmetic: it is not tied to backend progress. Each run owns
//! a numeric id recorded in `PageState::ticker_owner`; the task checks the
//! owner under the page lock before every write, so once `stop()` returns
//! the displayed line can no longer change even if the task has not yet
//! observed its abort.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::page::Page;

pub const PROGRESS_MESSAGES: [&str; 4] = [
    "Submitting the user input...",
    "Reviewing the dataset schema...",
    "Identifying relevant columns and filter logic...",
    "Generating the audience insights...",
];

static NEXT_TICKER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
pub struct ProgressTicker {
    page: Page,
    interval: Duration,
}

impl ProgressTicker {
    #[must_use]
    pub fn new(page: Page, interval: Duration) -> Self {
        Self { page, interval }
    }

    /// Show the first message and spawn the pacing task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(&self) -> TickerHandle {
        let id = NEXT_TICKER_ID.fetch_add(1, Ordering::Relaxed);
        self.page.update(|state| {
            state.ticker_owner = Some(id);
            state.progress_message = Some(PROGRESS_MESSAGES[0].to_owned());
        });
        let task = tokio::spawn(run_ticker(self.page.clone(), id, self.interval));
        TickerHandle { id, page: self.page.clone(), task: Some(task) }
    }
}

async fn run_ticker(page: Page, id: u64, interval: Duration) {
    for message in &PROGRESS_MESSAGES[1..] {
        tokio::time::sleep(interval).await;
        let wrote = page.update(|state| {
            if state.ticker_owner != Some(id) {
                return false;
            }
            state.progress_message = Some((*message).to_owned());
            true
        });
        if !wrote {
            return;
        }
    }
    page.update(|state| {
        if state.ticker_owner == Some(id) {
            state.ticker_owner = None;
        }
    });
}

/// Running ticker. Stopped on `stop()` or drop.
#[derive(Debug)]
pub struct TickerHandle {
    id: u64,
    page: Page,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Halt advancement at the current message. Does not clear the line.
    pub fn stop(&mut self) {
        self.page.update(|state| {
            if state.ticker_owner == Some(self.id) {
                state.ticker_owner = None;
            }
        });
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the pacing task has exited, either exhausted or stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "ticker_test.rs"]
mod tests;
