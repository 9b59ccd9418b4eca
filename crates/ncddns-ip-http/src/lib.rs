// # HTTP IP Source
//
// This crate provides the HTTP-based IP source for the updater: external
// IPv4 discovery over a fixed, ordered list of plain-text echo services.
//
// ## Fallback behavior
//
// Endpoints are tried strictly in list order. The first endpoint that
// answers HTTP 200 with a body that trims to a dotted-decimal IPv4
// address wins, and the remaining endpoints are never contacted. A
// request error, a non-200 status, or an unusable body moves on to the
// next endpoint; there is no per-endpoint retry. Only when the whole
// list is exhausted does discovery fail, which aborts the pass.

use std::net::Ipv4Addr;
use std::time::Duration;

use ncddns_core::traits::IpSource;
use ncddns_core::{Error, Result};
use tracing::{debug, warn};

/// Default per-request timeout for discovery calls
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Echo services known to answer with a bare external address
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://dynamicdns.park-your-domain.com/getip", // provider's own echo
    "http://ipinfo.io/ip",
    "http://ifconfig.me/ip",
    "http://icanhazip.com",
    "http://ident.me",
];

/// HTTP-based IP source over an ordered endpoint list
pub struct HttpIpSource {
    /// Endpoints to try, in order
    endpoints: Vec<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source over `endpoints` with the default timeout.
    ///
    /// # Parameters
    ///
    /// - `endpoints`: URLs to try in order (e.g., "http://icanhazip.com")
    pub fn new(endpoints: Vec<String>) -> Self {
        Self::with_timeout(endpoints, DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom per-request timeout.
    pub fn with_timeout(endpoints: Vec<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { endpoints, client }
    }

    /// Create a source over the built-in endpoint list.
    pub fn with_default_endpoints() -> Self {
        Self::new(DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect())
    }

    /// Create a source with a caller-supplied client.
    ///
    /// Tests use this to pin client behavior (timeouts, proxy handling).
    pub fn with_client(endpoints: Vec<String>, client: reqwest::Client) -> Self {
        Self { endpoints, client }
    }

    /// Endpoints this source will try, in order.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Fetch the address from a single endpoint
    async fn fetch_one(&self, endpoint: &str) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| Error::http(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::http(format!("unexpected status: {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read body: {}", e.without_url())))?;
        let body = body.trim();

        body.parse()
            .map_err(|_| Error::http(format!("body is not an IPv4 address: {body:?}")))
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        for endpoint in &self.endpoints {
            debug!(%endpoint, "querying discovery endpoint");
            match self.fetch_one(endpoint).await {
                Ok(ip) => {
                    debug!(%ip, %endpoint, "external address resolved");
                    return Ok(ip);
                }
                Err(e) => {
                    debug!(%endpoint, error = %e, "endpoint failed, trying next");
                }
            }
        }

        warn!(
            attempted = self.endpoints.len(),
            "every discovery endpoint failed"
        );
        Err(Error::NoIpAvailable {
            attempted: self.endpoints.len(),
        })
    }
}
