use std::sync::Arc;
use std::sync::Mutex;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing::warn;
use uuid::Uuid;

use crate::API_VERSION;
use crate::TOKEN_SCOPE;
use crate::auth::AccessToken;
use crate::auth::TokenCredential;
use crate::error::Result;
use crate::error::SessionsError;
use crate::multipart::encode_multipart;
use crate::sanitize::sanitize_code;
use crate::types::ExecuteRequest;
use crate::types::ExecuteResponse;
use crate::types::ExecutionResult;
use crate::types::FileListResponse;
use crate::types::RemoteFileMetadata;

/// Owned body stream handed to callers of [`SessionsClient::download_file`].
pub type ByteStream = BoxStream<'static, reqwest::Result<Bytes>>;

/// Client for one remote execution session.
///
/// A single instance may be shared across tasks (wrap it in an `Arc`); the
/// cached access token is the only shared mutable state. Every HTTP call is
/// a single attempt with no retries or backoff.
pub struct SessionsClient {
    http: reqwest::Client,
    endpoint: String,
    session_id: String,
    sanitize_input: bool,
    credential: Arc<dyn TokenCredential>,
    cached_token: Mutex<Option<AccessToken>>,
}

impl SessionsClient {
    /// Creates a client for `endpoint` with a freshly generated session id
    /// and input sanitization enabled. The endpoint format is not validated.
    pub fn new(endpoint: impl Into<String>, credential: Arc<dyn TokenCredential>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            session_id: Uuid::new_v4().to_string(),
            sanitize_input: true,
            credential,
            cached_token: Mutex::new(None),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_sanitize_input(mut self, sanitize_input: bool) -> Self {
        self.sanitize_input = sanitize_input;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Executes `code` synchronously in the session sandbox.
    pub async fn execute(&self, code: &str) -> Result<ExecutionResult> {
        let code = if self.sanitize_input {
            sanitize_code(code)
        } else {
            code.to_string()
        };

        let bearer = self.bearer_token().await?;
        let url = self.build_url("code/execute");
        let request = ExecuteRequest::inline_synchronous(code);
        debug!("POST {url}");
        let req = self
            .http
            .post(&url)
            .headers(self.headers(&bearer))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request);
        let body = self.exec_request(req, "POST", &url).await?;
        let envelope: ExecuteResponse = self.decode_json(&url, &body)?;
        Ok(envelope.properties)
    }

    /// Tool-facing entry point: executes `input` and returns a
    /// pretty-printed JSON summary of `{result, stdout, stderr}`. Inline
    /// image payloads are stripped first so an LLM-facing caller is told an
    /// image was produced without receiving the blob itself.
    pub async fn invoke(&self, input: &str) -> Result<String> {
        let mut execution = self.execute(input).await?;
        if let Some(result) = execution.result.as_mut() {
            result.strip_binary_payload();
        }
        serde_json::to_string_pretty(&execution).map_err(SessionsError::Serialize)
    }

    /// Uploads the full contents of `data` to `remote_file_path` inside the
    /// session. The whole body is buffered before sending, so this is only
    /// suitable for small files; `data` is not retained past the call.
    pub async fn upload_file(
        &self,
        mut data: impl AsyncRead + Send + Unpin,
        remote_file_path: &str,
    ) -> Result<RemoteFileMetadata> {
        let mut contents = Vec::new();
        data.read_to_end(&mut contents).await?;

        let bearer = self.bearer_token().await?;
        let url = self.build_url("files/upload");
        let boundary = Uuid::new_v4().to_string();
        let body = encode_multipart(&contents, remote_file_path, &boundary);
        debug!("POST {url} ({} bytes)", contents.len());
        let req = self
            .http
            .post(&url)
            .headers(self.headers(&bearer))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(body);
        let body = self.exec_request(req, "POST", &url).await?;
        let listing: FileListResponse = self.decode_json(&url, &body)?;
        listing
            .value
            .into_iter()
            .next()
            .map(|entry| entry.properties)
            .ok_or(SessionsError::MissingFileMetadata)
    }

    /// Downloads `remote_file_path` from the session. The response body is
    /// handed back unbuffered; the caller owns the stream.
    pub async fn download_file(&self, remote_file_path: &str) -> Result<ByteStream> {
        let bearer = self.bearer_token().await?;
        let encoded_path = urlencoding::encode(remote_file_path);
        let url = self.build_url(&format!("files/content/{encoded_path}"));
        debug!("GET {url}");
        let res = self
            .http
            .get(&url)
            .headers(self.headers(&bearer))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("GET {url} failed with status {status}");
            return Err(SessionsError::UnexpectedStatus { status, body });
        }
        Ok(res.bytes_stream().boxed())
    }

    /// Lists the files stored in the session, in server-returned order.
    pub async fn list_files(&self) -> Result<Vec<RemoteFileMetadata>> {
        let bearer = self.bearer_token().await?;
        let url = self.build_url("files");
        debug!("GET {url}");
        let req = self.http.get(&url).headers(self.headers(&bearer));
        let body = self.exec_request(req, "GET", &url).await?;
        let listing: FileListResponse = self.decode_json(&url, &body)?;
        Ok(listing
            .value
            .into_iter()
            .map(|entry| entry.properties)
            .collect())
    }

    /// Returns a currently valid bearer secret, refreshing through the
    /// credential when the cached token is absent or expired.
    ///
    /// The check-then-refresh sequence is deliberately not single-flight:
    /// the lock guards only the snapshot load and the replace, never an
    /// await, so concurrent callers near expiry may each refresh. Both end
    /// up with valid tokens; the last write wins.
    async fn bearer_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token_snapshot()
            && !token.is_expired()
        {
            return Ok(token.secret);
        }

        debug!("access token absent or expired; requesting a new one");
        let fresh = self
            .credential
            .token(TOKEN_SCOPE)
            .await
            .map_err(SessionsError::Credential)?
            .ok_or_else(|| {
                SessionsError::Credential(anyhow::anyhow!("credential returned no token"))
            })?;
        let secret = fresh.secret.clone();
        #[expect(clippy::unwrap_used)]
        let mut cached = self.cached_token.lock().unwrap();
        *cached = Some(fresh);
        Ok(secret)
    }

    fn cached_token_snapshot(&self) -> Option<AccessToken> {
        #[expect(clippy::unwrap_used)]
        let cached = self.cached_token.lock().unwrap();
        cached.clone()
    }

    /// Builds `{endpoint}/{path}?identifier=<session>&api-version=<pinned>`.
    /// Parameter order and encoding are part of the service contract.
    fn build_url(&self, path: &str) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        let identifier = urlencoding::encode(&self.session_id);
        format!("{endpoint}/{path}?identifier={identifier}&api-version={API_VERSION}")
    }

    fn headers(&self, bearer: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(crate::USER_AGENT));
        let value = format!("Bearer {bearer}");
        if let Ok(hv) = HeaderValue::from_str(&value) {
            headers.insert(AUTHORIZATION, hv);
        }
        headers
    }

    async fn exec_request(
        &self,
        req: reqwest::RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<String> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!("{method} {url} failed with status {status}");
            return Err(SessionsError::UnexpectedStatus { status, body });
        }
        Ok(body)
    }

    fn decode_json<T: DeserializeOwned>(&self, url: &str, body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|source| SessionsError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
