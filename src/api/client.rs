use std::fmt::Display;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::envelope::{Envelope, RecordEnvelope, error_message};
use super::error::ApiError;
use crate::config::ApiConfig;

/// HTTP client for the admin REST API.
///
/// Paths are relative to the configured base URL, e.g. `api/careers`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))?;
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            timeout,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    /// Send a request and decode the JSON body. An empty body decodes to `Null`.
    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout))?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
            tracing::warn!(status = status.as_u16(), %message, "API request failed");
            return Err(ApiError::http(status.as_u16(), message));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        tracing::debug!(path, "GET");
        self.send(self.request(Method::GET, path)?).await
    }

    /// Fetch a file as raw bytes, e.g. an uploaded resume.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(path, "GET (file)");
        let mut request = self.http.get(self.url(path)?);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout))?;
        let status = response.status();
        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("Request failed");
            tracing::warn!(status = status.as_u16(), message, "File download failed");
            return Err(ApiError::http(status.as_u16(), message));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout))?;
        Ok(bytes.to_vec())
    }

    /// Fetch a collection from a `{ code, message, records }` envelope.
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let value = self.get_json(path).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        let envelope: Envelope<T> =
            serde_json::from_value(value).map_err(|e| ApiError::parse(e.to_string()))?;
        Ok(envelope.records)
    }

    /// Fetch a single record from a `{ record }` envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.get_json(path).await?;
        let envelope: RecordEnvelope<T> =
            serde_json::from_value(value).map_err(|e| ApiError::parse(e.to_string()))?;
        Ok(envelope.record)
    }

    /// Create a record by posting the fields as multipart text parts.
    pub async fn create(&self, path: &str, fields: &[(String, String)]) -> Result<Value, ApiError> {
        tracing::debug!(path, "POST (create)");
        let request = self.request(Method::POST, path)?.multipart(text_form(fields));
        self.send(request).await
    }

    /// Update a record: multipart POST to the collection with `id` and `_method=PUT`.
    pub async fn update(
        &self,
        path: &str,
        id: impl Display,
        fields: &[(String, String)],
    ) -> Result<Value, ApiError> {
        tracing::debug!(path, %id, "POST (update)");
        let form = text_form(fields)
            .text("id", id.to_string())
            .text("_method", "PUT");
        let request = self.request(Method::POST, path)?.multipart(form);
        self.send(request).await
    }

    pub async fn delete(&self, path: &str, id: impl Display) -> Result<Value, ApiError> {
        let path = format!("{}/{id}", path.trim_end_matches('/'));
        tracing::debug!(path, "DELETE");
        self.send(self.request(Method::DELETE, &path)?).await
    }

    pub async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        tracing::debug!(path, "POST (json)");
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request).await
    }
}

fn text_form(fields: &[(String, String)]) -> Form {
    fields
        .iter()
        .fold(Form::new(), |form, (key, value)| form.text(key.clone(), value.clone()))
}
