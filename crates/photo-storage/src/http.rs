use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::{ObjectPath, ObjectStore, StorageError};

/// Upload response body. Either field may carry the retrievable URL.
#[derive(Debug, Default, Deserialize)]
struct UploadResponse {
    #[serde(default, rename = "downloadUrl")]
    download_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Object store reached over HTTP: objects are `PUT` to `{endpoint}/{key}`.
pub struct HttpObjectStore {
    http: reqwest::Client,
    endpoint: Url,
    public_base: Option<Url>,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str) -> Result<Self, StorageError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: as_base_url(endpoint)?,
            public_base: None,
            token: None,
        })
    }

    /// Builder: bearer token sent with every upload.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    /// Builder: base for download URLs when the upload response names none.
    pub fn with_public_base(mut self, base: &str) -> Result<Self, StorageError> {
        self.public_base = Some(as_base_url(base)?);
        Ok(self)
    }

    /// Where the object is uploaded to.
    pub fn object_url(&self, path: &ObjectPath) -> Result<Url, StorageError> {
        Ok(self.endpoint.join(&path.key())?)
    }

    /// Where the object can be downloaded from when the server does not say.
    pub fn download_url(&self, path: &ObjectPath) -> Result<Url, StorageError> {
        let base = self.public_base.as_ref().unwrap_or(&self.endpoint);
        Ok(base.join(&path.key())?)
    }

    /// Build upload headers from the configured token.
    fn upload_headers(&self, content_type: &str) -> Result<HeaderMap, StorageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .map_err(|e| StorageError::InvalidHeader(e.to_string()))?,
        );
        if let Some(token) = &self.token {
            let bearer = format!("Bearer {token}");
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&bearer)
                    .map_err(|e| StorageError::InvalidHeader(e.to_string()))?,
            );
        }
        Ok(headers)
    }
}

impl ObjectStore for HttpObjectStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &ObjectPath,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = self.object_url(path)?;
        let headers = self.upload_headers(content_type)?;
        let size = bytes.len();

        let resp = self
            .http
            .put(url.clone())
            .headers(headers)
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            tracing::warn!(%url, "Upload rejected, storage token missing or invalid");
        }

        if !status.is_success() {
            return Err(StorageError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let download = match download_url_from_body(&body) {
            Some(url) => url,
            None => self.download_url(path)?.to_string(),
        };
        tracing::info!(key = %path, size, "Photo uploaded");
        Ok(download)
    }
}

/// Parse `raw` as a base URL that `join` appends to rather than replaces.
fn as_base_url(raw: &str) -> Result<Url, StorageError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}

fn download_url_from_body(body: &str) -> Option<String> {
    let resp: UploadResponse = serde_json::from_str(body).ok()?;
    resp.download_url
        .or(resp.url)
        .filter(|url| !url.trim().is_empty())
}
