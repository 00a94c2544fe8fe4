use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::io::Read;
use std::time::{Duration, Instant};
use url::Url;

use super::types::StudentResult;
use crate::config::{AppConfig, DEFAULT_PROGRAM};
use crate::error::{BtebError, Result};
use crate::logging;
use crate::regulation::Regulation;
use crate::utils::json_validator;
use crate::validation::{validate_endpoint, validate_roll};

/// A validated request for one student's results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultQuery {
    roll: String,
    regulation: Regulation,
    program: String,
}

impl ResultQuery {
    pub fn new(roll: &str, regulation: Regulation, program: &str) -> Result<Self> {
        let roll = validate_roll(roll)?;
        let program = match program.trim() {
            "" => DEFAULT_PROGRAM.to_string(),
            p => p.to_string(),
        };
        Ok(Self {
            roll,
            regulation,
            program,
        })
    }

    pub fn roll(&self) -> &str {
        &self.roll
    }

    pub fn regulation(&self) -> Regulation {
        self.regulation
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Stable key identifying this query, used for caching.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.roll,
            self.regulation.id(),
            self.program.to_lowercase()
        )
    }
}

/// Source of student results.
pub trait ResultProvider {
    fn name(&self) -> &str;

    fn fetch(&self, query: &ResultQuery) -> Result<StudentResult>;
}

impl<P: ResultProvider + ?Sized> ResultProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, query: &ResultQuery) -> Result<StudentResult> {
        (**self).fetch(query)
    }
}

/// Fetches results from the HTTP result service.
#[derive(Debug, Clone)]
pub struct HttpResultProvider {
    client: Client,
    endpoint: Url,
}

impl HttpResultProvider {
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let endpoint = validate_endpoint(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| BtebError::Other(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The request URL for a query.
    pub fn request_url(&self, query: &ResultQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("studentId", query.roll())
            .append_pair("regulation", query.regulation().id())
            .append_pair("program", query.program());
        url
    }
}

impl ResultProvider for HttpResultProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, query: &ResultQuery) -> Result<StudentResult> {
        let url = self.request_url(query);
        logging::log_http_request("GET", url.as_str(), None);
        let started = Instant::now();

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        logging::log_http_request("GET", url.as_str(), Some(status.as_u16()));

        if let Some(length) = response.content_length() {
            if length > json_validator::MAX_PAYLOAD_SIZE as u64 {
                return Err(too_large(status, json_validator::MAX_PAYLOAD_SIZE));
            }
        }
        let body = read_body_bounded(response, json_validator::MAX_PAYLOAD_SIZE, status)?;
        logging::log_performance("result_fetch", started.elapsed().as_millis() as u64);

        let outcome = interpret_response(status, &body, query);
        logging::log_result_lookup(query.roll(), query.regulation().id(), outcome.is_ok());
        outcome
    }
}

/// Read at most `limit` bytes of a response body. Longer bodies are an
/// error rather than being read to the end.
pub fn read_body_bounded<R: Read>(reader: R, limit: usize, status: StatusCode) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| {
            BtebError::upstream(
                Some(status.as_u16()),
                format!("Failed to read response from result service: {e}"),
            )
        })?;

    if bytes.len() > limit {
        return Err(too_large(status, limit));
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn too_large(status: StatusCode, limit: usize) -> BtebError {
    BtebError::upstream(
        Some(status.as_u16()),
        format!("Response from result service is larger than {limit} bytes"),
    )
}

/// Map an upstream status and body to a result or a descriptive error.
///
/// Accepts a bare result object, a `{"data": ...}` envelope, or an
/// `{"error": "..."}` body.
pub fn interpret_response(status: StatusCode, body: &str, query: &ResultQuery) -> Result<StudentResult> {
    if status == StatusCode::NOT_FOUND {
        return Err(BtebError::result_not_found(
            query.roll(),
            query.regulation().id(),
        ));
    }

    let parsed = json_validator::parse_bounded(body);

    if !status.is_success() {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| {
                format!(
                    "Result service returned {}",
                    status.canonical_reason().unwrap_or("an error")
                )
            });
        return Err(BtebError::upstream(Some(status.as_u16()), message));
    }

    let value = parsed.map_err(|e| {
        BtebError::upstream(
            Some(status.as_u16()),
            format!("Malformed response from result service: {e}"),
        )
    })?;

    if let Some(message) = error_message(&value) {
        if message.to_lowercase().contains("not found") {
            return Err(BtebError::result_not_found(
                query.roll(),
                query.regulation().id(),
            ));
        }
        return Err(BtebError::upstream(Some(status.as_u16()), message));
    }

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    if payload.is_null() {
        return Err(BtebError::result_not_found(
            query.roll(),
            query.regulation().id(),
        ));
    }

    serde_json::from_value(payload).map_err(|e| {
        BtebError::upstream(
            Some(status.as_u16()),
            format!("Unexpected result format: {e}"),
        )
    })
}

fn error_message(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
