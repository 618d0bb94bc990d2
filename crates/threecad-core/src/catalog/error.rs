/// Catalog API errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status { status: u16, url: String },

    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Task(#[from] crate::tasks::TaskPanic),
}
