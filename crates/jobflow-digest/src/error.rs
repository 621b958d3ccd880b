use jobflow_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email provider returned status {status}: {body}")]
    Rejected { status: u16, body: String },
}
