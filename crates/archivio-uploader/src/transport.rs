//! Transfer transports for upload tasks.
//!
//! The [`FileTransport`] trait is the seam between batch orchestration and
//! the wire: production uses the multipart HTTP implementation, tests use
//! scripted transports.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Body;
use reqwest::multipart::{Form, Part};
use tokio_util::sync::CancellationToken;

use archivio_core::error::{AppError, ErrorKind};
use archivio_core::result::AppResult;

use crate::batch::UploadMetadata;
use crate::progress::{ProgressHandle, ProgressStream};
use crate::task::{CANCELLED_MESSAGE, PayloadSource};

/// Chunk size used when streaming a payload with progress updates.
const CHUNK_SIZE: usize = 64 * 1024;

/// Everything a transport needs to move one file.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// The name the file is uploaded under.
    pub file_name: String,
    /// Payload size in bytes.
    pub size: u64,
    /// Payload source.
    pub source: PayloadSource,
    /// Shared batch metadata.
    pub metadata: UploadMetadata,
}

/// Moves one file to the server, reporting progress along the way.
///
/// Implementations must only ever write to the provided progress handle
/// (the task's own cell) and must stop promptly when `cancel` fires.
#[async_trait]
pub trait FileTransport: Send + Sync {
    /// Transfer one file. `Ok` means the server accepted it.
    async fn send(
        &self,
        request: &TransferRequest,
        progress: ProgressHandle,
        cancel: CancellationToken,
    ) -> AppResult<()>;
}

/// Multipart HTTP transport against the Archivio API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Create a transport for the given server and bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Load the payload bytes for a request.
    async fn payload(&self, request: &TransferRequest) -> AppResult<Bytes> {
        match &request.source {
            PayloadSource::Bytes(bytes) => Ok(bytes.clone()),
            PayloadSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to read '{}': {e}", path.display()),
                        e,
                    )
                }),
        }
    }

    /// Build the multipart form, wiring progress into the payload stream.
    fn form(request: &TransferRequest, data: Bytes, progress: ProgressHandle) -> Form {
        let total = data.len() as u64;
        let chunks: Vec<Result<Bytes, std::io::Error>> = data
            .chunks(CHUNK_SIZE)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        let stream = ProgressStream::new(futures::stream::iter(chunks), total, progress);

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(request.file_name.clone());

        let mut form = Form::new().part("file", part);
        if let Some(department) = &request.metadata.department {
            form = form.text("department", department.clone());
        }
        if let Some(category) = &request.metadata.category {
            form = form.text("category", category.clone());
        }
        if let Some(description) = &request.metadata.description {
            form = form.text("description", description.clone());
        }
        form
    }

    /// Map a non-success HTTP response to an error.
    async fn error_for(response: reqwest::Response) -> AppError {
        let status = response.status();
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| format!("Upload rejected with status {status}"));

        match status.as_u16() {
            400 => AppError::validation(message),
            401 => AppError::authentication(message),
            403 => AppError::authorization(message),
            _ => AppError::transport(message),
        }
    }
}

#[async_trait]
impl FileTransport for HttpTransport {
    async fn send(
        &self,
        request: &TransferRequest,
        progress: ProgressHandle,
        cancel: CancellationToken,
    ) -> AppResult<()> {
        let data = self.payload(request).await?;
        let form = Self::form(request, data, progress.clone());

        let send = self
            .client
            .post(format!("{}/api/files", self.base_url))
            .bearer_auth(&self.token)
            .multipart(form)
            .send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(AppError::transport(CANCELLED_MESSAGE)),
            result = send => result.map_err(|e| {
                AppError::with_source(ErrorKind::Transport, format!("Upload failed: {e}"), e)
            })?,
        };

        if response.status().is_success() {
            progress.complete();
            Ok(())
        } else {
            Err(Self::error_for(response).await)
        }
    }
}
