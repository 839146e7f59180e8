use std::time::Duration;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use url::Url;

use crate::types::{FetchError, FetchMetadata, FetchOutput};

/// Browser-like User-Agent; the source site answers obvious bot strings
/// with an error page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Hard ceiling on the whole request; a slow source is a transport
    /// failure, not a hang.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches one page and hands back decoded HTML. The seam the orchestrator
/// tests substitute.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        let client = self.build_client()?;

        let response = client
            .get(url.as_str())
            .header(USER_AGENT, self.settings.user_agent.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let (html, encoding) = decode_body(&bytes, content_type.as_deref())?;

        Ok(FetchOutput {
            html,
            metadata: FetchMetadata {
                final_url,
                status: status.as_u16(),
                content_type,
                encoding,
                byte_len: bytes.len() as u64,
            },
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout(err.to_string());
    }
    FetchError::Network(err.to_string())
}

/// Decode the body into UTF-8: BOM -> Content-Type charset -> chardetng
/// guess. The source serves regional-language titles, so a wrong charset
/// silently mangles names.
fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<(String, String), FetchError> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => match content_type.and_then(extract_charset) {
            Some(label) => match Encoding::for_label(label.as_bytes()) {
                Some(encoding) => encoding,
                None => detect_encoding(bytes),
            },
            None => detect_encoding(bytes),
        },
    };

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(FetchError::Decode {
            encoding: encoding.name().to_string(),
        });
    }
    Ok((text.into_owned(), encoding.name().to_string()))
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// The `charset=` parameter of a Content-Type value, unquoted. The key is
/// matched case-insensitively.
fn extract_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim_matches(|c| c == '"' || c == '\'' || c == ' '))
        } else {
            None
        }
    })
}
