//! HTTP transport shared by every service client.
//!
//! Requests are first described as plain data ([`HttpRequest`]) and only then
//! handed to [`Transport::send`]. Builders expose the rendered request, so the
//! rendering rules can be checked without a network.

use std::collections::HashMap;
use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

use crate::config::SupabaseConfig;
use crate::error::{ApiError, SupabaseError, SupabaseResult};

/// HTTP methods used by the service clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    Get,
    Head,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Head => reqwest::Method::HEAD,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Head => write!(f, "HEAD"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(JsonValue),
    Bytes(Vec<u8>),
    Text(String),
}

impl RequestBody {
    fn default_content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Bytes(_) => "application/octet-stream",
            Self::Text(_) => "text/plain",
        }
    }
}

/// One outbound request, described as data.
///
/// `segments` are path segments relative to the project URL, e.g.
/// `["rest", "v1", "countries"]`. Each one is percent-encoded on its own, so a
/// `/` inside a table or bucket name stays part of that name. Query pairs and
/// headers keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header, replacing any earlier value with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Unencoded path, for logs and assertions.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// First value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received, before any status interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl HttpResponse {
    /// `headers` keys are expected lowercased.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// All response headers (keys are lowercased).
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> SupabaseResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> SupabaseResult<String> {
        Ok(String::from_utf8(self.body.clone())?)
    }

    /// Turn a non-2xx response into [`SupabaseError::Remote`].
    pub fn error_for_status(self) -> SupabaseResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SupabaseError::Remote(ApiError::from_body(
                self.status,
                &self.body,
            )))
        }
    }
}

/// Sends [`HttpRequest`]s to one project.
///
/// Every request carries `apikey`, `Authorization: Bearer` and the extra
/// headers from the config. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub fn new(config: &SupabaseConfig) -> SupabaseResult<Self> {
        let base_url = config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "apikey",
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| SupabaseError::config(format!("Invalid API key header: {}", e)))?,
        );
        default_headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| SupabaseError::config(format!("Invalid auth header: {}", e)))?,
        );
        default_headers.insert(
            "x-client-info",
            HeaderValue::from_static(concat!("supabase-lite/", env!("CARGO_PKG_VERSION"))),
        );
        for (key, value) in &config.headers {
            let (name, value) = header_pair(key, value).map_err(SupabaseError::Config)?;
            default_headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SupabaseError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    /// The validated project URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the project URL, percent-encoding each one.
    pub fn url_for<S: AsRef<str>>(&self, segments: &[S]) -> SupabaseResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SupabaseError::config("supabase_url cannot be a base URL"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment.as_ref());
            }
        }
        Ok(url)
    }

    /// Send one request. Any status is returned as `Ok`; only transport
    /// failures are errors here.
    pub async fn send(&self, request: HttpRequest) -> SupabaseResult<HttpResponse> {
        let url = self.url_for(&request.segments)?;
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self.http.request(request.method.to_reqwest(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (key, value) in &request.headers {
            let (name, value) = header_pair(key, value).map_err(SupabaseError::InvalidInput)?;
            builder = builder.header(name, value);
        }
        let has_content_type = request.header_value("content-type").is_some();
        if let Some(body) = request.body {
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, body.default_content_type());
            }
            builder = match body {
                RequestBody::Json(value) => builder.body(serde_json::to_vec(&value)?),
                RequestBody::Bytes(bytes) => builder.body(bytes),
                RequestBody::Text(text) => builder.body(text),
            };
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_string(), v.to_string());
            }
        }
        let body = response.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "Received response");

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn header_pair(key: &str, value: &str) -> Result<(HeaderName, HeaderValue), String> {
    let name = HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| format!("Invalid header name '{}': {}", key, e))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| format!("Invalid header value for '{}': {}", key, e))?;
    Ok((name, value))
}
