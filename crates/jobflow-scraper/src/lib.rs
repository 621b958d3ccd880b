//! Scrape-run orchestration and listing normalization for JobFlow.
//!
//! Submits actor runs to Apify, polls them to completion under an explicit
//! [`PollPolicy`], pulls the resulting dataset, and maps each source's raw
//! listing shape onto [`jobflow_core::CanonicalJob`].

pub mod adapter;
pub mod client;
pub mod error;
pub mod normalize;
pub mod poll;
pub mod sources;
pub mod types;

pub use adapter::{FetchReport, SkipReason, SourceAdapter, TitleOutcome, TitleResult};
pub use client::{ActorRunner, ApifyClient};
pub use error::ScraperError;
pub use normalize::{normalize, FieldRules};
pub use poll::{poll_until_settled, PollOutcome, PollPolicy};
pub use sources::ScrapeSource;
pub use types::{RawListing, RunData, RunStatus};
