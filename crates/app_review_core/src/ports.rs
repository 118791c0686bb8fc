//! crates/app_review_core/src/ports.rs
//!
//! Defines the service contract (trait) for fetching review data.
//! The session logic only ever talks to the backend through `ReviewGateway`,
//! which keeps it independent of the concrete HTTP implementation.

use async_trait::async_trait;

use crate::domain::{ErrorInfo, Platform, Record};

//=========================================================================================
// Fetch Error and Result Types
//=========================================================================================

/// Which of the two backend requests failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Table,
    Answer,
}

impl RequestKind {
    /// The fixed message shown to the user when a request of this kind fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            RequestKind::Table => {
                "Sorry, we could not load the app review data, please try again."
            }
            RequestKind::Answer => "Sorry, we could not answer your question, please try again.",
        }
    }
}

/// The underlying reason a fetch failed. Logged, never shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum FetchCause {
    #[error("backend responded with status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// The single error kind raised by a gateway.
///
/// Its display text is the fixed user-facing message for the request kind;
/// the cause is only reachable through `source()`.
#[derive(Debug, thiserror::Error)]
#[error("{}", .request.failure_message())]
pub struct FetchError {
    pub request: RequestKind,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(request: RequestKind, cause: FetchCause) -> Self {
        Self { request, cause }
    }

    pub fn table(cause: FetchCause) -> Self {
        Self::new(RequestKind::Table, cause)
    }

    pub fn answer(cause: FetchCause) -> Self {
        Self::new(RequestKind::Answer, cause)
    }

    /// Converts the failure into the message carried by session state.
    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo::new(self.request.failure_message())
    }
}

/// A convenience type alias for `Result<T, FetchError>`.
pub type FetchResult<T> = Result<T, FetchError>;

//=========================================================================================
// Payloads
//=========================================================================================

/// The decoded body of a successful question request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerPayload {
    pub answer: String,
    pub table: Vec<Record>,
}

//=========================================================================================
// Gateway Port
//=========================================================================================

#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Fetches the review table for a platform.
    async fn fetch_table(&self, platform: Platform) -> FetchResult<Vec<Record>>;

    /// Submits a question scoped to a platform and returns the answer with its table.
    async fn fetch_answer(&self, question: &str, platform: Platform) -> FetchResult<AnswerPayload>;
}
