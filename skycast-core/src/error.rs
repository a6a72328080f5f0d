use thiserror::Error;

/// Failures from the weather provider HTTP API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network failure, 5xx or rate limiting: the service itself is down.
    #[error("weather provider unavailable: {0}")]
    Unavailable(String),

    /// The response arrived but lacks the expected shape (empty city list,
    /// empty conditions payload, unexpected status).
    #[error("weather provider response missing expected data: {0}")]
    DataMissing(String),

    /// The response body could not be decoded.
    #[error("failed to parse weather provider response: {0}")]
    Parse(String),
}

/// Failures from the text-generation API.
///
/// These never escape [`crate::summary::Summarizer::summarize`]; the
/// narrative is best-effort and terminal failures are reported as content.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("text generation request failed: {0}")]
    Request(String),

    #[error("text generation rejected the request (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("text generation response malformed: {0}")]
    InvalidResponse(String),
}

/// Fatal failures of a single dashboard lookup.
///
/// Only city search and the current-conditions fetch are fatal; forecast and
/// narrative failures are scoped to their section of the view.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// City search returned no entry with a usable location key.
    #[error("city not found")]
    CityNotFound,

    /// City search itself failed.
    #[error("city search failed: {0}")]
    Search(#[source] ProviderError),

    /// Current conditions could not be fetched.
    #[error("city not found or provider error: {0}")]
    Conditions(#[source] ProviderError),
}
