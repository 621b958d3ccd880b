use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned status {status} for {context}: {body}")]
    Api {
        status: u16,
        context: String,
        body: String,
    },

    #[error("failed to parse store response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
