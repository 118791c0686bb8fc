//! services/review_cli/src/adapters/http.rs
//!
//! This module contains the HTTP adapter for the review backend.
//! It implements the `ReviewGateway` port from the `core` crate.

use app_review_core::{
    domain::{Platform, Record},
    ports::{AnswerPayload, FetchCause, FetchError, FetchResult, RequestKind, ReviewGateway},
};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::payload::{decode_table, ErrorBody, QuestionRequest, QuestionResponse, TableResponse};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ReviewGateway` over the backend's REST API.
#[derive(Clone)]
pub struct HttpReviewGateway {
    client: Client,
    base_url: String,
}

impl HttpReviewGateway {
    /// Creates a gateway rooted at `base_url`, e.g. `http://localhost:5000/app_review`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn table_url(&self, platform: Platform) -> String {
        format!("{}/table/{}", self.base_url, platform.as_str())
    }

    pub fn question_url(&self, platform: Platform) -> String {
        format!("{}/question/{}", self.base_url, platform.as_str())
    }

    /// Checks the status and parses the body, mapping every failure to `kind`.
    async fn read_body<T: DeserializeOwned>(
        kind: RequestKind,
        response: Response,
    ) -> FetchResult<T> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::new(kind, FetchCause::Transport(e.to_string())))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(FetchError::new(
                kind,
                FetchCause::Status {
                    status: status.as_u16(),
                    detail,
                },
            ));
        }

        serde_json::from_slice::<T>(&bytes)
            .map_err(|e| FetchError::new(kind, FetchCause::Malformed(e.to_string())))
    }
}

fn transport(kind: RequestKind) -> impl FnOnce(reqwest::Error) -> FetchError {
    move |e| FetchError::new(kind, FetchCause::Transport(e.to_string()))
}

//=========================================================================================
// `ReviewGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReviewGateway for HttpReviewGateway {
    async fn fetch_table(&self, platform: Platform) -> FetchResult<Vec<Record>> {
        let url = self.table_url(platform);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(transport(RequestKind::Table))?;

        let body: TableResponse = Self::read_body(RequestKind::Table, response).await?;
        if let Some(message) = &body.error {
            warn!(%platform, "Backend reported an error alongside the table: {}", message);
        }
        decode_table(body.table.as_ref())
            .map_err(|e| FetchError::table(FetchCause::Malformed(e)))
    }

    async fn fetch_answer(&self, question: &str, platform: Platform) -> FetchResult<AnswerPayload> {
        let url = self.question_url(platform);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&QuestionRequest { question })
            .send()
            .await
            .map_err(transport(RequestKind::Answer))?;

        let body: QuestionResponse = Self::read_body(RequestKind::Answer, response).await?;
        if let Some(message) = &body.error {
            warn!(%platform, "Backend reported an error alongside the answer: {}", message);
        }
        let answer = body.answer.ok_or_else(|| {
            FetchError::answer(FetchCause::Malformed("missing answer field".to_string()))
        })?;
        let table = decode_table(body.table.as_ref())
            .map_err(|e| FetchError::answer(FetchCause::Malformed(e)))?;

        Ok(AnswerPayload { answer, table })
    }
}
