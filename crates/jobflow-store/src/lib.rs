//! PostgREST gateway for the JobFlow store.
//!
//! All reads and writes go through [`StoreClient`] against the
//! `jobs`, `job_titles`, `profiles` and `email_logs` collections.

pub mod client;
pub mod error;
pub mod filter;
pub mod jobs;
pub mod profiles;

pub use client::StoreClient;
pub use error::StoreError;
pub use filter::in_list;
pub use jobs::{UpsertFailure, UpsertOutcome, UpsertReport};
