//! Audience console: turns plain-language attribute goals into generated
//! filter clauses and collects operator feedback on the result.
//!
//! DESIGN
//! ======
//! The page is an in-memory view model (`page`) split into four result
//! panes (`regions`). `orchestrator` owns the request lifecycle and the last
//! successful generation; `feedback` sends thumbs up/down for it. Both talk
//! to the backend through the `backend::AudienceApi` trait.

pub mod backend;
pub mod command;
pub mod config;
pub mod csrf;
pub mod error;
pub mod feedback;
pub mod orchestrator;
pub mod page;
pub mod regions;
pub mod render;
pub mod ticker;
pub mod types;

pub use error::ConsoleError;
