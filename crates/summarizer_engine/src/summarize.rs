use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use summarizer_logging::{summarizer_debug, summarizer_info};

use crate::{ApiError, ApiErrorKind, SummaryOutput};

pub const DEFAULT_API_HOST: &str = "article-extractor-and-summarizer.p.rapidapi.com";

#[derive(Debug, Clone)]
pub struct SummarizeSettings {
    /// Base url of the API; `/summarize` is appended.
    pub base_url: String,
    /// Sent as `X-RapidAPI-Host`.
    pub api_host: String,
    /// Sent as `X-RapidAPI-Key` when present.
    pub api_key: Option<String>,
    /// Requested summary length, in paragraphs.
    pub summary_length: u8,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for SummarizeSettings {
    fn default() -> Self {
        Self {
            base_url: format!("https://{DEFAULT_API_HOST}"),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: None,
            summary_length: 3,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
        }
    }
}

/// Remote fetch adapter: given an article url, asynchronously return a
/// summary or an error.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, article_url: &str) -> Result<SummaryOutput, ApiError>;
}

#[derive(Debug, Clone)]
pub struct RapidApiSummarizer {
    settings: SummarizeSettings,
    client: reqwest::Client,
}

impl RapidApiSummarizer {
    pub fn new(settings: SummarizeSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, article_url: &str) -> Result<Url, ApiError> {
        let mut endpoint = Url::parse(&self.settings.base_url)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| ApiError::new(ApiErrorKind::InvalidUrl, "base url cannot have a path"))?
            .pop_if_empty()
            .push("summarize");
        endpoint
            .query_pairs_mut()
            .append_pair("url", article_url)
            .append_pair("length", &self.settings.summary_length.to_string());
        Ok(endpoint)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    ApiErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    ApiErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Summarizer for RapidApiSummarizer {
    async fn summarize(&self, article_url: &str) -> Result<SummaryOutput, ApiError> {
        let endpoint = self.endpoint(article_url)?;
        summarizer_debug!("GET {}", endpoint);

        let mut request = self
            .client
            .get(endpoint)
            .header("X-RapidAPI-Host", self.settings.api_host.as_str());
        if let Some(key) = self.settings.api_key.as_deref() {
            request = request.header("X-RapidAPI-Key", key);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = self.read_body(response).await?;
        summarizer_info!(
            "summarize url={} status={} body_len={}",
            article_url,
            status.as_u16(),
            body.len()
        );

        if !status.is_success() {
            return Err(match parse_json(&body) {
                Ok(data) => ApiError::with_data(
                    ApiErrorKind::HttpStatus(status.as_u16()),
                    status.to_string(),
                    data,
                ),
                Err(err) => parse_error(status, err, &body),
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(SummaryOutput::default());
        }
        serde_json::from_slice(&body).map_err(|err| parse_error(status, err, &body))
    }
}

/// Empty bodies decode to `null`.
fn parse_json(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

fn parse_error(status: StatusCode, err: serde_json::Error, body: &[u8]) -> ApiError {
    ApiError::with_data(
        ApiErrorKind::Parse {
            status: status.as_u16(),
        },
        err.to_string(),
        Value::String(String::from_utf8_lossy(body).into_owned()),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}
