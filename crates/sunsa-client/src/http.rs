//! HTTP transport for the Sunsa public API

use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, Result};

/// Root of the public API; the user id and method are appended to it
pub const DEFAULT_BASE_URL: &str = "https://sunsahomes.com/api/public/";

/// Query parameter carrying the API key
pub const API_KEY_PARAM: &str = "publicApiKey";

/// HTTP verb of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Get,
    Put,
}

impl RequestKind {
    fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Put => Method::PUT,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// Issues authenticated requests against `{base}/{user_id}/{api_method}`
#[derive(Clone)]
pub struct RequestHandler {
    client: Client,
    base_url: Url,
    user_id: u64,
    api_key: String,
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("base_url", &self.base_url.as_str())
            .field("user_id", &self.user_id)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl RequestHandler {
    /// Create a handler for the public Sunsa API using the given `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the default base URL cannot be parsed.
    pub fn new(client: Client, user_id: u64, api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, client, user_id, api_key)
    }

    /// Create a handler against a different API root
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or cannot carry a path.
    pub fn with_base_url(
        base_url: impl AsRef<str>,
        client: Client,
        user_id: u64,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            client,
            base_url,
            user_id,
            api_key: api_key.into(),
        })
    }

    /// The configured user id
    #[must_use]
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Build the endpoint URL for an API method, without query parameters
    ///
    /// # Errors
    /// Returns an error if the base URL cannot carry a path.
    pub fn url(&self, api_method: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(&self.user_id.to_string())
            .extend(api_method.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Perform one request and return the parsed JSON body
    ///
    /// `params` are sent as query parameters next to the API key; a caller
    /// supplied `publicApiKey` is dropped in favour of the configured one.
    /// `body` is only sent with [`RequestKind::Put`].
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] for any status other than `200 OK`,
    /// [`ClientError::Json`] if the body is not JSON, and
    /// [`ClientError::Http`] if the request itself fails.
    pub async fn query(
        &self,
        kind: RequestKind,
        api_method: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut url = self.url(api_method)?;
        let params: Vec<_> = params
            .iter()
            .filter(|(key, _)| *key != API_KEY_PARAM)
            .collect();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &params {
                query.append_pair(key, value);
            }
            query.append_pair(API_KEY_PARAM, &self.api_key);
        }

        tracing::debug!(method = %kind, endpoint = api_method, "sending request to Sunsa API");
        tracing::debug!(?params, body = ?body, "request parameters");

        let mut request = self
            .client
            .request(kind.method(), url)
            .header(ACCEPT, "application/json");
        if let (RequestKind::Put, Some(body)) = (kind, body) {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            tracing::warn!(
                status = status.as_u16(),
                endpoint = api_method,
                "error response from Sunsa API"
            );
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        tracing::debug!(body = %String::from_utf8_lossy(&bytes), "response body");

        parse_body(content_type.as_deref(), &bytes)
    }
}

/// Parse a response body as JSON whatever its declared content type
fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Value> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(e) if is_json(content_type) => Err(e.into()),
        Err(_) => {
            tracing::debug!(
                content_type = content_type.unwrap_or("<none>"),
                "response not declared as JSON, retrying as JSON"
            );
            Ok(serde_json::from_slice(trim_bom(bytes))?)
        }
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|essence| {
            essence.eq_ignore_ascii_case("application/json")
                || essence.to_ascii_lowercase().ends_with("+json")
        })
}

// HTML-labelled responses sometimes start with a UTF-8 byte order mark
fn trim_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> RequestHandler {
        RequestHandler::new(Client::new(), 1234, "secret").unwrap()
    }

    #[test]
    fn test_handler_creation() {
        assert!(RequestHandler::new(Client::new(), 1, "key").is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let handler = RequestHandler::with_base_url("not a url", Client::new(), 1, "key");
        assert!(handler.is_err());
    }

    #[test]
    fn test_cannot_be_a_base_url() {
        let handler = RequestHandler::with_base_url("mailto:x@example.com", Client::new(), 1, "key");
        assert!(matches!(handler, Err(ClientError::Url(_))));
    }

    #[test]
    fn test_url_building() {
        let url = handler().url("devices").unwrap();
        assert_eq!(url.as_str(), "https://sunsahomes.com/api/public/1234/devices");
    }

    #[test]
    fn test_url_building_nested_method() {
        let url = handler().url("devices/5").unwrap();
        assert_eq!(url.as_str(), "https://sunsahomes.com/api/public/1234/devices/5");
    }

    #[test]
    fn test_url_building_without_trailing_slash() {
        let handler =
            RequestHandler::with_base_url("http://localhost:8080/api", Client::new(), 9, "k")
                .unwrap();
        let url = handler.url("devices").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/9/devices");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let output = format!("{:?}", handler());
        assert!(!output.contains("secret"));
        assert!(output.contains("<redacted>"));
    }

    #[test]
    fn test_request_kind_display() {
        assert_eq!(RequestKind::Get.to_string(), "GET");
        assert_eq!(RequestKind::Put.to_string(), "PUT");
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(Some("application/json")));
        assert!(is_json(Some("application/json; charset=utf-8")));
        assert!(is_json(Some("application/problem+json")));
        assert!(!is_json(Some("text/html")));
        assert!(!is_json(None));
    }

    #[test]
    fn test_parse_body_ignores_content_type() {
        let body = br#"{"devices":[]}"#;
        assert_eq!(
            parse_body(Some("text/html"), body).unwrap(),
            json!({ "devices": [] })
        );
        assert_eq!(parse_body(None, body).unwrap(), json!({ "devices": [] }));
    }

    #[test]
    fn test_parse_body_with_bom() {
        let body = b"\xEF\xBB\xBF{\"status\":\"OK\"}";
        assert_eq!(
            parse_body(Some("text/html"), body).unwrap(),
            json!({ "status": "OK" })
        );
    }

    #[test]
    fn test_parse_body_invalid_json() {
        let result = parse_body(Some("text/html"), b"<html></html>");
        assert!(matches!(result, Err(ClientError::Json(_))));
    }
}
