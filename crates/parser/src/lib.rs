//! HTTP client for the dependency parser sidecar.
//!
//! The sidecar exposes two endpoints:
//! - `POST {base}/parse` with `{"text", "model"}`, answering with the spaCy `Doc.to_json()`
//!   payload described in [`symptom_core::doc`]
//! - `POST {base}/models` with `{"model"}`, asking the sidecar to install/load a model
//!
//! At startup the service calls [`RemoteParser::ensure_available`] before accepting traffic.

use std::time::Duration;

use serde::Serialize;
use symptom_core::{DependencyParser, Doc, ParsedDoc, SymptomError, SymptomResult};
use thiserror::Error;
use tracing::{info, warn};

/// Default sidecar address when none is configured.
pub const DEFAULT_PARSER_URL: &str = "http://127.0.0.1:8080";

/// Default language model requested from the sidecar.
pub const DEFAULT_PARSER_MODEL: &str = "en_core_web_sm";

/// Default per-request timeout, in seconds.
pub const DEFAULT_PARSER_TIMEOUT_SECS: u64 = 10;

/// Sentence parsed to confirm the sidecar can serve requests.
const CANARY_TEXT: &str = "i have a headache";

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("parser returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("invalid parse: {0}")]
    Doc(#[from] SymptomError),
    #[error("invalid parser configuration: {0}")]
    InvalidConfig(String),
    #[error("parser at {url} is unavailable with model {model}: {reason}")]
    Unavailable {
        url: String,
        model: String,
        reason: String,
    },
}

pub type ParserResult<T> = std::result::Result<T, ParserError>;

/// Where and how to reach the sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PARSER_URL.into(),
            model: DEFAULT_PARSER_MODEL.into(),
            timeout: Duration::from_secs(DEFAULT_PARSER_TIMEOUT_SECS),
        }
    }
}

/// Build a [`ParserConfig`] from optional, already-read values.
///
/// Missing or blank values fall back to the defaults.
///
/// # Errors
///
/// Returns `ParserError::InvalidConfig` if:
/// - the URL does not start with `http://` or `https://`, or
/// - the timeout is not a positive whole number of seconds.
pub fn parser_config_from_env_values(
    url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<String>,
) -> ParserResult<ParserConfig> {
    fn non_blank(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    let mut cfg = ParserConfig::default();

    if let Some(url) = non_blank(url) {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ParserError::InvalidConfig(format!(
                "parser URL must be http(s): {url}"
            )));
        }
        cfg.base_url = url.trim_end_matches('/').to_string();
    }

    if let Some(model) = non_blank(model) {
        cfg.model = model;
    }

    if let Some(secs) = non_blank(timeout_secs) {
        let secs: u64 = secs
            .parse()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| ParserError::InvalidConfig(format!("invalid parser timeout: {secs}")))?;
        cfg.timeout = Duration::from_secs(secs);
    }

    Ok(cfg)
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
    model: &'a str,
}

#[derive(Serialize)]
struct ModelRequest<'a> {
    model: &'a str,
}

/// Validate a sidecar answer for `sent`. The parse must cover exactly the text that was sent,
/// otherwise spans would not point into the user's input.
fn doc_for(sent: &str, parsed: ParsedDoc) -> ParserResult<Doc> {
    if parsed.text != sent {
        return Err(SymptomError::MalformedParse(format!(
            "parser returned text {:?} for {:?}",
            parsed.text, sent
        ))
        .into());
    }
    Ok(Doc::from_parsed(parsed)?)
}

/// Client for the parser sidecar.
pub struct RemoteParser {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl RemoteParser {
    /// Create a client for the configured sidecar.
    pub fn new(cfg: &ParserConfig) -> ParserResult<Self> {
        let client = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Parse `text` into a validated [`Doc`].
    pub async fn parse_doc(&self, text: &str) -> ParserResult<Doc> {
        let url = self.endpoint("parse");
        let resp = self
            .client
            .post(&url)
            .json(&ParseRequest {
                text,
                model: &self.model,
            })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ParserError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ParsedDoc = resp.json().await?;
        doc_for(text, parsed)
    }

    /// Ask the sidecar to install and load the configured model.
    pub async fn acquire_model(&self) -> ParserResult<()> {
        let url = self.endpoint("models");
        info!(url = %url, model = %self.model, "requesting parser model");
        let resp = self
            .client
            .post(&url)
            .json(&ModelRequest { model: &self.model })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ParserError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Confirm the sidecar can parse before the service accepts traffic.
    ///
    /// Probes with a canary sentence. On failure, makes one best-effort model acquisition
    /// request and probes again; a second failure is fatal.
    pub async fn ensure_available(&self) -> ParserResult<()> {
        let first = match self.parse_doc(CANARY_TEXT).await {
            Ok(_) => {
                info!(url = %self.base_url, model = %self.model, "parser available");
                return Ok(());
            }
            Err(e) => e,
        };

        warn!(error = %first, "parser probe failed; attempting model acquisition");
        if let Err(e) = self.acquire_model().await {
            warn!(error = %e, "model acquisition failed");
        }

        match self.parse_doc(CANARY_TEXT).await {
            Ok(_) => {
                info!(url = %self.base_url, model = %self.model, "parser available after acquisition");
                Ok(())
            }
            Err(e) => Err(ParserError::Unavailable {
                url: self.base_url.clone(),
                model: self.model.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl DependencyParser for RemoteParser {
    async fn parse(&self, text: &str) -> SymptomResult<Doc> {
        self.parse_doc(text).await.map_err(|e| match e {
            ParserError::Doc(inner) => inner,
            other => SymptomError::Parser(Box::new(other)),
        })
    }
}
