//! HTTP executor for the Proof API.
//!
//! One attempt per call. Transport failures surface as
//! [`Error::RequestFailed`], non-2xx responses as [`Error::Api`] with the body
//! kept verbatim.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::{request_url, upload_timeout, DOWNLOAD_TIMEOUT};
use crate::error::{Error, Result};
use crate::transport::headers::{self, Authorization, RequestOptions};

/// A local file sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUpload {
    /// File to stream as the `file` part.
    pub file_path: PathBuf,
    /// Name reported for the part. Defaults to the path's base name.
    pub file_name: Option<String>,
    /// Extra text fields, sent after the file part in this order.
    pub fields: Vec<(String, String)>,
}

impl MultipartUpload {
    /// Upload `file_path` with no extra fields.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            file_name: None,
            fields: Vec::new(),
        }
    }

    /// Name the `file` part will carry.
    pub fn part_name(&self) -> String {
        if let Some(name) = self.file_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string())
    }
}

/// Sends requests against one API endpoint.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExecutor {
    /// Create an executor whose requests time out after `timeout`. Zero means no timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, endpoint))
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The underlying reqwest client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The base URL paths are appended to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one request and classify the response.
    ///
    /// `path` is appended to the endpoint verbatim and may carry a query string.
    /// `body` is sent as-is; `None` sends an empty body.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        auth: Authorization<'_>,
        options: &RequestOptions,
    ) -> Result<Bytes> {
        let url = request_url(&self.endpoint, path);
        debug!(method = method.as_str(), url = %url, "Sending request");

        let mut request = self
            .client
            .request(method, &url)
            .headers(headers::api_headers(auth, options)?);
        if let Some(body) = body {
            request = request.body(body);
        }

        classify(request.send().await?).await
    }

    /// Stream a local file as `multipart/form-data` to an absolute URL.
    ///
    /// Authenticates with `ApiKey` and uses a timeout scaled to the file size
    /// instead of the configured one.
    pub async fn upload_multipart(
        &self,
        url: &str,
        api_key: &str,
        upload: &MultipartUpload,
    ) -> Result<Bytes> {
        let file = tokio::fs::File::open(&upload.file_path).await?;
        let size = file.metadata().await?.len();
        let timeout = upload_timeout(size);

        let stream = tokio_util::io::ReaderStream::new(file);
        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), size)
            .file_name(upload.part_name())
            .mime_str("application/octet-stream")?;

        let mut form = Form::new().part("file", part);
        for (name, value) in &upload.fields {
            form = form.text(name.clone(), value.clone());
        }

        let (name, value) = headers::auth_header(Authorization::ApiKey(api_key))?;
        debug!(url, size, timeout_secs = timeout.as_secs(), "Uploading file");

        let response = self
            .client
            .post(url)
            .header(name, value)
            .timeout(timeout)
            .multipart(form)
            .send()
            .await?;

        classify(response).await
    }

    /// Download an absolute URL into `output`, returning the bytes written.
    ///
    /// Authenticates with `ApiKey` and allows [`DOWNLOAD_TIMEOUT`] for the
    /// whole transfer. Nothing is written when the server answers non-2xx,
    /// and a partially written file is removed if the transfer fails.
    pub async fn download_to_file(&self, url: &str, api_key: &str, output: &Path) -> Result<u64> {
        let (name, value) = headers::auth_header(Authorization::ApiKey(api_key))?;
        debug!(url, output = %output.display(), "Downloading document");

        let mut response = self
            .client
            .get(url)
            .header(name, value)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let written = match stream_to_file(&mut response, output).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(remove) = tokio::fs::remove_file(output).await {
                    warn!(output = %output.display(), error = %remove, "Failed to remove partial download");
                }
                return Err(e);
            }
        };

        debug!(bytes = written, "Download complete");
        Ok(written)
    }
}

async fn stream_to_file(response: &mut reqwest::Response, output: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(output).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// 2xx returns the raw body, anything else is [`Error::Api`].
async fn classify(response: reqwest::Response) -> Result<Bytes> {
    let status = response.status();
    let body = response.bytes().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "Response received");

    if status.is_success() {
        Ok(body)
    } else {
        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }
}
