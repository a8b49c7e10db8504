use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by the IO API")]
    RateLimited,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized ({context}): check the service API token")]
    Unauthorized { context: String },

    #[error("unexpected status {status} from the IO API ({context})")]
    UnexpectedStatus { status: u16, context: String },

    #[error("malformed response ({context}): {detail}")]
    MalformedResponse { context: String, detail: String },

    #[error("empty fiscal code")]
    EmptyFiscalCode,

    #[error("rate limit retries exhausted ({0})")]
    RetriesExhausted(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BotError {
    /// Whether this is the transient rate-limit signal replayed by the
    /// retry policy.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, BotError::RateLimited)
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
