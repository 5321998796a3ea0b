//! REST client for the remote shelf store, built on `reqwest`.
//!
//! | Request          | Call                                  |
//! |------------------|---------------------------------------|
//! | search catalog   | `GET /api/search?q=`                  |
//! | load shelf       | `GET /api/shelf[?status=]`            |
//! | create entry     | `POST /api/shelf`                     |
//! | update entry     | `PATCH /api/shelf/{id}`               |
//! | delete entry     | `DELETE /api/shelf/{id}`              |
//!
//! Every call carries the stored credential as a bearer token. A `401` becomes
//! [`RemoteError::Unauthenticated`]; any other non-success status becomes
//! [`RemoteError::Rejected`] with the body's `detail` string, when present.

use crate::domain::error::{Result, ShelfError};
use crate::domain::{
    CatalogResult, EntryId, EntryUpdate, NewShelfEntry, RemoteError, ShelfEntry, StatusFilter,
};
use crate::remote::client::ShelfApi;
use crate::remote::messages::{RemoteRequest, RemoteResponse};
use crate::storage::CredentialStore;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::Instrument;

/// [`ShelfApi`] over HTTP.
#[derive(Clone)]
pub struct HttpShelfApi {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for HttpShelfApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpShelfApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpShelfApi {
    /// Creates a client for the store at `base_url` (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Config`] if the URL is not absolute http(s) or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ShelfError::Config(format!("invalid api_base_url {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ShelfError::Config(format!(
                "api_base_url must be http or https, got {}",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("shelfsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShelfError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> std::result::Result<RequestBuilder, RemoteError> {
        match self.credentials.get() {
            Ok(Some(token)) => Ok(builder.bearer_auth(token)),
            Ok(None) => Ok(builder),
            Err(e) => Err(RemoteError::Transport(format!("credential unavailable: {e}"))),
        }
    }

    /// Sends the request and maps non-success statuses.
    async fn send(&self, builder: RequestBuilder) -> std::result::Result<Response, RemoteError> {
        let response = self
            .authorized(builder)?
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthenticated);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body);
            tracing::debug!(status = status.as_u16(), detail = ?detail, "request rejected");
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, RemoteError> {
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Decodes a body that the store may leave empty.
    async fn decode_optional<T: DeserializeOwned>(
        response: Response,
    ) -> std::result::Result<Option<T>, RemoteError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    pub async fn search(&self, query: &str) -> std::result::Result<Vec<CatalogResult>, RemoteError> {
        let request = self.client.get(self.url("/api/search")).query(&[("q", query)]);
        Self::decode(self.send(request).await?).await
    }

    pub async fn load_shelf(
        &self,
        filter: StatusFilter,
    ) -> std::result::Result<Vec<ShelfEntry>, RemoteError> {
        let mut request = self.client.get(self.url("/api/shelf"));
        if let Some(status) = filter.as_query() {
            request = request.query(&[("status", status)]);
        }
        let items: Vec<serde_json::Value> = Self::decode(self.send(request).await?).await?;
        Ok(ShelfEntry::from_listing(items))
    }

    pub async fn create_entry(
        &self,
        body: &NewShelfEntry,
    ) -> std::result::Result<Option<ShelfEntry>, RemoteError> {
        let request = self.client.post(self.url("/api/shelf")).json(body);
        Self::decode_optional(self.send(request).await?).await
    }

    pub async fn update_entry(
        &self,
        id: EntryId,
        changes: &EntryUpdate,
    ) -> std::result::Result<Option<ShelfEntry>, RemoteError> {
        let request = self
            .client
            .patch(self.url(&format!("/api/shelf/{id}")))
            .json(changes);
        Self::decode_optional(self.send(request).await?).await
    }

    pub async fn delete_entry(&self, id: EntryId) -> std::result::Result<(), RemoteError> {
        let request = self.client.delete(self.url(&format!("/api/shelf/{id}")));
        self.send(request).await.map(|_| ())
    }
}

impl ShelfApi for HttpShelfApi {
    async fn execute(&self, request: RemoteRequest) -> RemoteResponse {
        let span = tracing::debug_span!("remote_request", kind = request.kind());
        async move {
            let response = match request {
                RemoteRequest::SearchCatalog { ticket, query } => RemoteResponse::SearchCompleted {
                    ticket,
                    result: self.search(&query).await,
                },
                RemoteRequest::LoadShelf { ticket, filter } => RemoteResponse::ShelfLoaded {
                    ticket,
                    result: self.load_shelf(filter).await,
                },
                RemoteRequest::CreateEntry { form, body } => RemoteResponse::EntryCreated {
                    form,
                    result: self.create_entry(&body).await,
                },
                RemoteRequest::UpdateEntry { form, id, changes } => RemoteResponse::EntryUpdated {
                    form,
                    id,
                    result: self.update_entry(id, &changes).await,
                },
                RemoteRequest::DeleteEntry { id } => RemoteResponse::EntryDeleted {
                    id,
                    result: self.delete_entry(id).await,
                },
            };
            tracing::debug!(failed = response.error().is_some(), "remote request finished");
            response
        }
        .instrument(span)
        .await
    }
}

/// Extracts a string `detail` field from an error body.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
