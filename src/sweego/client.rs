use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use snafu::prelude::*;

use crate::common::{
    key_file_or_string, ConfigSnafu, DecodeSnafu, EncodeSnafu, HttpStatusSnafu, NotFoundSnafu,
    ReadBodySnafu, Result, SharedLogger, TracingLogger, TransportSnafu,
};

use super::models::{
    CheckResult, CreateDomainRequest, DomainDetails, DomainSummary, TrackingSettings,
};
use super::DomainApi;

pub const DEFAULT_BASE_URL: &str = "https://api.sweego.io/";

pub const CLIENT_NAME: &str = "Sweego";

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins base and endpoint with exactly one slash between them.
/// Percent-encodes `value` so it stays a single path segment.
pub(crate) fn path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub(crate) fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Thin synchronous client for the Sweego domain API.
///
/// Each call issues exactly one request. Nothing is retried and nothing is
/// cached between calls.
#[derive(Clone)]
pub struct SweegoClient {
    base_url: String,
    api_key: String,
    client_id: String,
    agent: ureq::Agent,
    logger: SharedLogger,
}

impl SweegoClient {
    pub fn new(api_key: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, client_id)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client_id: client_id.into(),
            agent: ureq::AgentBuilder::new().build(),
            logger: TracingLogger::shared(CLIENT_NAME),
        }
    }

    /// Overall per-request timeout. Unset means the transport defaults apply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::AgentBuilder::new().timeout(timeout).build();
        self
    }

    /// Copy of this client reporting to another logger.
    pub fn with_logger(&self, logger: SharedLogger) -> Self {
        Self {
            logger,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn domains_endpoint(&self) -> String {
        format!("clients/{}/domains", path_segment(&self.client_id))
    }

    fn domain_endpoint(&self, uuid: &str) -> String {
        format!("{}/{}", self.domains_endpoint(), path_segment(uuid))
    }

    /// Sends one request and returns the raw body of a 2xx response.
    fn execute<B: Serialize>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<String> {
        let url = join_url(&self.base_url, endpoint);
        let request = self
            .agent
            .request(method.as_str(), &url)
            .set("Accept", "application/json")
            .set("Api-Key", &self.api_key);

        self.logger.debug(&format!("{method} {url}"));
        let result = match body {
            Some(body) => {
                let payload = serde_json::to_string(body).context(EncodeSnafu {
                    method: method.as_str(),
                    url: &url,
                })?;
                self.logger.debug(&format!("{method} {url} request body: {payload}"));
                request
                    .set("Content-Type", "application/json")
                    .send_string(&payload)
            }
            None => request.call(),
        };

        // ureq reports non-2xx answers as errors; we want their bodies too.
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(err) => {
                self.logger.error(&format!("{method} {url} failed: {err}"));
                return Err(err).context(TransportSnafu {
                    method: method.as_str(),
                    url: &url,
                });
            }
        };

        let status = response.status();
        let body = response.into_string().context(ReadBodySnafu {
            method: method.as_str(),
            url: &url,
        })?;
        self.logger
            .debug(&format!("{method} {url} responded {status}\n{body}"));

        if status == 404 {
            self.logger.error(&format!("{method} {url} not found"));
            return NotFoundSnafu {
                method: method.as_str(),
                url,
                body,
            }
            .fail();
        }
        if !(200..300).contains(&status) {
            self.logger
                .error(&format!("{method} {url} returned status {status}"));
            return HttpStatusSnafu {
                method: method.as_str(),
                url,
                status,
                body,
            }
            .fail();
        }

        Ok(body)
    }

    fn execute_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let raw = self.execute(method, endpoint, body)?;
        serde_json::from_str(&raw).context(DecodeSnafu {
            method: method.as_str(),
            url: join_url(&self.base_url, endpoint),
            body: raw.as_str(),
        })
    }

    fn execute_get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute_json::<T, ()>(Method::Get, endpoint, None)
    }
}

impl DomainApi for SweegoClient {
    fn list_domains(&self) -> Result<Vec<DomainSummary>> {
        self.logger.debug("ListDomains");
        self.execute_get(&self.domains_endpoint())
    }

    fn get_domain(&self, uuid: &str) -> Result<DomainDetails> {
        self.logger.debug(&format!("GetDomain({uuid:?})"));
        self.execute_get(&self.domain_endpoint(uuid))
    }

    fn create_domain(&self, domain: &str) -> Result<DomainDetails> {
        self.logger.debug(&format!("CreateDomain({domain:?})"));
        self.execute_json(
            Method::Post,
            &self.domains_endpoint(),
            Some(&CreateDomainRequest { domain }),
        )
    }

    fn update_tracking(&self, uuid: &str, settings: &TrackingSettings) -> Result<()> {
        self.logger.debug(&format!("UpdateTracking({uuid:?}, {settings:?})"));
        self.execute(
            Method::Patch,
            &format!("{}/tracking", self.domain_endpoint(uuid)),
            Some(settings),
        )?;
        Ok(())
    }

    fn delete_domain(&self, uuid: &str) -> Result<()> {
        self.logger.debug(&format!("DeleteDomain({uuid:?})"));
        self.execute::<()>(Method::Delete, &self.domain_endpoint(uuid), None)?;
        Ok(())
    }

    fn check_domain(&self, uuid: &str) -> Result<CheckResult> {
        self.logger.debug(&format!("CheckDomain({uuid:?})"));
        self.execute_get(&format!("{}/check", self.domain_endpoint(uuid)))
    }
}

impl TryFrom<super::Config> for SweegoClient {
    type Error = crate::common::Error;

    fn try_from(value: super::Config) -> Result<Self> {
        ensure!(
            !value.client_id.trim().is_empty(),
            ConfigSnafu {
                prefix: "sweego.client_id",
                message: "client id must not be empty",
            }
        );
        let api_key = key_file_or_string(value.api_key, "sweego.api_key")?;
        ensure!(
            !api_key.is_empty(),
            ConfigSnafu {
                prefix: "sweego.api_key",
                message: "API key must not be empty",
            }
        );

        let base_url = value
            .base_url
            .map(|url| url.to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client = Self::with_base_url(base_url, api_key, value.client_id);
        Ok(match value.timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => client,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::common::{testing::MemoryLogger, Error};

    fn setup() -> (mockito::ServerGuard, SweegoClient) {
        let server = mockito::Server::new();
        // Trailing slash on purpose: the join must not produce "//clients".
        let client = SweegoClient::with_base_url(format!("{}/", server.url()), "test-key", "42");
        (server, client)
    }

    fn details_body(uuid: &str) -> String {
        json!({
            "uuid": uuid,
            "is_verified": false,
            "tracking_open_enabled": false,
            "tracking_click_enabled": true,
            "domain": "example.com",
            "domain_record": {"name": "_sweego.example.com", "type": "TXT", "data": "sweego-verify=1", "verified": false},
            "dkim_record": {"name": "swg._domainkey.example.com", "type": "CNAME", "data": "dkim.sweego.io", "verified": false},
            "dmarc_record": {"name": "_dmarc.example.com", "type": "TXT", "data": "v=DMARC1; p=none", "verified": false},
            "tracking_record": {"name": "track.example.com", "type": "CNAME", "data": "t.sweego.io", "verified": false},
            "inbound_record_list": []
        })
        .to_string()
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("https://api.sweego.io/", "/clients/1"), "https://api.sweego.io/clients/1");
        assert_eq!(join_url("https://api.sweego.io", "clients/1"), "https://api.sweego.io/clients/1");
        assert_eq!(join_url("https://api.sweego.io//", "//clients/1"), "https://api.sweego.io/clients/1");
    }

    #[test]
    fn path_segment_escapes_separators() {
        assert_eq!(path_segment("abc-123"), "abc-123");
        assert_eq!(path_segment("x/check"), "x%2Fcheck");
        assert_eq!(path_segment("a?b=1#c"), "a%3Fb%3D1%23c");
        assert_eq!(path_segment("a b+c"), "a%20b%2Bc");
    }

    #[test]
    fn domain_id_stays_inside_its_path_segment() {
        let (mut server, client) = setup();
        let mock = server
            .mock("GET", "/clients/42/domains/x%2Fcheck")
            .with_status(200)
            .with_body(r#"{"uuid": "x/check", "domain": "example.com"}"#)
            .create();

        let details = client.get_domain("x/check").unwrap();
        assert_eq!(details.domain, "example.com");
        mock.assert();
    }

    #[test]
    fn get_domain_sends_auth_headers_and_decodes() {
        let (mut server, client) = setup();
        let mock = server
            .mock("GET", "/clients/42/domains/abc-123")
            .match_header("accept", "application/json")
            .match_header("api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(details_body("abc-123"))
            .create();

        let details = client.get_domain("abc-123").unwrap();

        mock.assert();
        assert_eq!(details.uuid, "abc-123");
        assert_eq!(details.dkim_record.data, "dkim.sweego.io");
        assert!(details.tracking_click_enabled);
    }

    #[test]
    fn create_domain_posts_json_body() {
        let (mut server, client) = setup();
        let mock = server
            .mock("POST", "/clients/42/domains")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"domain": "example.com"})))
            .with_status(201)
            .with_body(details_body("abc-123"))
            .create();

        let details = client.create_domain("example.com").unwrap();

        mock.assert();
        assert_eq!(details.uuid, "abc-123");
    }

    #[test]
    fn list_domains_decodes_collection() {
        let (mut server, client) = setup();
        let mock = server
            .mock("GET", "/clients/42/domains")
            .with_status(200)
            .with_body(
                json!([{
                    "id": 7,
                    "client_id": 42,
                    "uuid": "abc-123",
                    "creation_dt": "2024-05-01T10:00:00",
                    "last_verification_dt": null,
                    "tracking_open_enabled": true,
                    "tracking_click_enabled": false,
                    "is_verified": false,
                    "domain": "example.com"
                }])
                .to_string(),
            )
            .create();

        let domains = client.list_domains().unwrap();

        mock.assert();
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].uuid, "abc-123");
        assert_eq!(domains[0].last_verified_at, None);
    }

    #[test]
    fn update_tracking_patches_settings() {
        let (mut server, client) = setup();
        let mock = server
            .mock("PATCH", "/clients/42/domains/abc-123/tracking")
            .match_body(Matcher::Json(
                json!({"tracking_open_enabled": true, "tracking_click_enabled": false}),
            ))
            .with_status(204)
            .create();

        client
            .update_tracking(
                "abc-123",
                &TrackingSettings {
                    tracking_open_enabled: true,
                    tracking_click_enabled: false,
                },
            )
            .unwrap();

        mock.assert();
    }

    #[test]
    fn delete_with_empty_body_succeeds() {
        let (mut server, client) = setup();
        let mock = server
            .mock("DELETE", "/clients/42/domains/abc-123")
            .with_status(204)
            .create();

        client.delete_domain("abc-123").unwrap();
        mock.assert();
    }

    #[test]
    fn delete_server_error_carries_status_and_body() {
        let (mut server, client) = setup();
        server
            .mock("DELETE", "/clients/42/domains/abc-123")
            .with_status(500)
            .with_body(r#"{"detail": "boom"}"#)
            .create();

        let err = client.delete_domain("abc-123").unwrap_err();

        match &err {
            Error::HttpStatusError { status, body, method, .. } => {
                assert_eq!(*status, 500);
                assert_eq!(body, r#"{"detail": "boom"}"#);
                assert_eq!(method, "DELETE");
            }
            other => panic!("expected HttpStatusError, got {other:?}"),
        }
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn missing_domain_is_not_found() {
        let (mut server, client) = setup();
        server
            .mock("GET", "/clients/42/domains/gone")
            .with_status(404)
            .with_body(r#"{"detail": "Not found"}"#)
            .create();

        let err = client.get_domain("gone").unwrap_err();
        assert!(err.is_not_found(), "expected NotFound, got {err:?}");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn malformed_success_body_is_decode_error_with_raw_body() {
        let (mut server, client) = setup();
        server
            .mock("GET", "/clients/42/domains/abc-123")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();

        let err = client.get_domain("abc-123").unwrap_err();
        match &err {
            Error::DecodeError { body, .. } => assert_eq!(body, "<html>maintenance</html>"),
            other => panic!("expected DecodeError, got {other:?}"),
        }
        assert!(err.to_string().contains("<html>maintenance</html>"));
    }

    #[test]
    fn check_domain_decodes_results() {
        let (mut server, client) = setup();
        server
            .mock("GET", "/clients/42/domains/abc-123/check")
            .with_status(200)
            .with_body(
                json!({
                    "dkim_record": {"verified": true, "error_string": ""},
                    "dmarc_record": {"verified": false, "error_string": "no record"},
                    "spf_record": {"verified": true, "error_string": null},
                    "tracking_record": {"verified": true, "error_string": ""},
                    "inbound_record_list": [{"verified": false, "error_string": "MX missing"}]
                })
                .to_string(),
            )
            .create();

        let check = client.check_domain("abc-123").unwrap();
        assert!(check.dkim_record.verified);
        assert_eq!(check.dmarc_record.error_string, "no record");
        assert_eq!(check.spf_record.error_string, "");
        assert_eq!(check.inbound_record_list.len(), 1);
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let client = SweegoClient::with_base_url("http://127.0.0.1:1/", "test-key", "42")
            .with_timeout(Duration::from_secs(2));
        let err = client.get_domain("abc-123").unwrap_err();
        assert!(matches!(err, Error::TransportError { .. }), "got {err:?}");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn requests_are_logged_without_the_api_key() {
        let (mut server, client) = setup();
        server
            .mock("GET", "/clients/42/domains/abc-123")
            .with_status(200)
            .with_body(details_body("abc-123"))
            .create();
        let logger = Arc::new(MemoryLogger::default());
        let client = client.with_logger(logger.clone());

        client.get_domain("abc-123").unwrap();

        assert!(logger.any_contains("GET "));
        assert!(logger.any_contains("responded 200"));
        assert!(!logger.any_contains("test-key"));
    }

    #[test]
    fn config_defaults_base_url_and_rejects_empty_client_id() {
        let client = SweegoClient::try_from(super::super::Config {
            base_url: None,
            api_key: "key".into(),
            client_id: "42".into(),
            timeout_secs: Some(5),
        })
        .unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);

        let err = SweegoClient::try_from(super::super::Config {
            base_url: None,
            api_key: "key".into(),
            client_id: " ".into(),
            timeout_secs: None,
        })
        .err()
        .unwrap();
        assert!(matches!(err, Error::ConfigError { .. }));
    }
}
