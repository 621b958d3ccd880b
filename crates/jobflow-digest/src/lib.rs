//! Personalized digest building and delivery for JobFlow subscribers.
//!
//! [`run_daily_digest`] walks every subscriber, builds their [`Digest`] from
//! the store, renders it with [`DigestRenderer`] and hands it to a [`Mailer`].
//! Receipts are written only after a successful send, so a failed send is
//! retried by the next run.

pub mod builder;
pub mod error;
pub mod mailer;
pub mod notifier;
pub mod render;
pub mod run;
pub mod store;

pub use builder::{build_digest, Digest};
pub use error::{DigestError, MailError};
pub use mailer::{Mailer, ResendClient};
pub use notifier::{deliver, DeliveryOutcome};
pub use render::{DigestRenderer, RenderedEmail};
pub use run::{run_daily_digest, DeliveryFailure, DigestSummary};
pub use store::DigestStore;
