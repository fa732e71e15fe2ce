use std::fmt;

use serde::Deserialize;

/// All errors surfaced by the supabase-lite crates.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// Bad base URL, API key or default header.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network failure, DNS resolution, timeout.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote service answered with a non-2xx status.
    #[error("Remote error ({}): {}", .0.status, .0.message)]
    Remote(ApiError),

    /// The response body was not the JSON we expected.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body was read as text but is not UTF-8.
    #[error("Decode error: response body is not valid UTF-8: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),

    /// A local constraint was violated before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SupabaseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status of a remote failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote(api) => Some(api.status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The remote error payload, if this is a remote failure.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Remote(api) => Some(api),
            _ => None,
        }
    }
}

impl From<url::ParseError> for SupabaseError {
    fn from(e: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {}", e))
    }
}

/// Result alias using SupabaseError.
pub type SupabaseResult<T> = Result<T, SupabaseError>;

/// A non-2xx answer from one of the remote services.
///
/// PostgREST reports `{message, code, details, hint}`, storage reports
/// `{statusCode, error, message}` and the functions relay reports
/// `{error}` or `{msg}`. All of them are folded into this one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
    /// Raw response body, lossily decoded.
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    hint: Option<serde_json::Value>,
}

impl ApiError {
    /// Build from a status code and a response body.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(body).into_owned();
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => {
                let message = parsed
                    .message
                    .or(parsed.error.clone())
                    .or(parsed.msg)
                    .unwrap_or_else(|| fallback_message(status, &raw));
                // storage puts its short error name in `error` when `message` is present
                let code = json_text(parsed.code).or(parsed.error.filter(|e| *e != message));
                Self {
                    status,
                    message,
                    code,
                    details: json_text(parsed.details),
                    hint: json_text(parsed.hint),
                    body: raw,
                }
            }
            Err(_) => Self {
                status,
                message: fallback_message(status, &raw),
                code: None,
                details: None,
                hint: None,
                body: raw,
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({}): {}", self.status, code, self.message),
            None => write!(f, "{}: {}", self.status, self.message),
        }
    }
}

fn fallback_message(status: u16, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

fn json_text(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
