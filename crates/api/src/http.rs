//! Blocking HTTPS transport on reqwest
//!
//! - rustls for TLS, certificate checks off only when the environment is
//!   marked insecure
//! - One pooled connection set per transport, reused across requests
//! - GET and DELETE carry the payload as the query string, POST as a form body

use crate::errors::{ExchangeError, Result};
use crate::traits::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use crate::v2::Environment;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("tokenomy-rust/", env!("CARGO_PKG_VERSION"));

/// [`Transport`] backed by a blocking reqwest client
pub struct ReqwestTransport {
    base_url: Url,
    client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(env: &Environment) -> Result<Self> {
        Self::with_timeout(env, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(env: &Environment, timeout: Duration) -> Result<Self> {
        let base_url = env.base_url()?;

        if env.insecure {
            warn!("⚠️ TLS certificate verification disabled for {}", base_url);
        }

        let client = HttpClient::builder()
            .danger_accept_invalid_certs(env.insecure)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExchangeError::ConfigurationError(format!("HTTP client setup failed: {e}")))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `path` under the base address
    fn url_for(&self, path: &str) -> std::result::Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(|e| TransportError(format!("bad URL for {path}: {e}")))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut url = self.url_for(&request.path)?;

        let builder = match request.method {
            HttpMethod::Get | HttpMethod::Delete => {
                if !request.payload.is_empty() {
                    url.set_query(Some(&request.payload));
                }
                let method = match request.method {
                    HttpMethod::Get => reqwest::Method::GET,
                    _ => reqwest::Method::DELETE,
                };
                self.client.request(method, url)
            }
            HttpMethod::Post => self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(request.payload.clone()),
        };

        let builder = request
            .headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));

        let response = builder.send().map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportError(e.to_string()))?;

        debug!("HTTP {} {} -> {}", request.method, request.path, status);
        Ok(HttpResponse { status, body })
    }
}
