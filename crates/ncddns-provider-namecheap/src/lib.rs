// # Namecheap DNS Provider
//
// This crate provides the Namecheap dynamic-DNS provider implementation
// for the updater: one GET per domain against the dynamic-DNS endpoint.
//
// ## Protocol
//
// ```http
// GET https://dynamicdns.park-your-domain.com/update
//     ?host=@&domain=<name>&password=<secret>&ip=<address>
// ```
//
// The answer is a small `interface-response` XML document:
//
// ```xml
// <?xml version="1.0" encoding="utf-16"?>
// <interface-response>
//   <Command>SETDNSHOST</Command>
//   <Language>eng</Language>
//   <IP>203.0.113.7</IP>
//   <ErrCount>0</ErrCount>
//   <errors />
//   <ResponseCount>0</ResponseCount>
//   <responses />
//   <Done>true</Done>
//   <debug><![CDATA[]]></debug>
// </interface-response>
// ```
//
// `<ErrCount>` and `<Done>` decide the outcome: zero errors together with
// a true completion flag is the only success. Bodies missing the named
// fields fall back to the positional heuristic older deployments relied
// on (line index 5 carries the error count, line index 9 the completion
// flag), and anything still unrecognized classifies as a refusal.
//
// ## Security Requirements
//
// - The per-domain password travels in the query string and MUST never
//   appear in logs
// - Request errors are formatted without their URL for that reason

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use ncddns_core::traits::{DnsProvider, UpdateFailure, UpdateResult};
use ncddns_core::{Error, Result};

/// Namecheap dynamic-DNS update endpoint
const UPDATE_URL: &str = "https://dynamicdns.park-your-domain.com/update";

/// Updates always target the apex record
const UPDATE_HOST: &str = "@";

/// Default HTTP timeout for update requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Positional fallback: line index carrying the error count
const LEGACY_ERR_COUNT_LINE: usize = 5;

/// Positional fallback: line index carrying the completion flag
const LEGACY_DONE_LINE: usize = 9;

/// Namecheap dynamic-DNS provider
///
/// Stateless and single-shot: every call is one GET, classified into
/// applied or refused. Secrets are call arguments, never provider state.
pub struct NamecheapProvider {
    /// Update endpoint; overridable for integration tests
    update_url: String,

    /// HTTP client for update requests
    client: reqwest::Client,
}

impl NamecheapProvider {
    /// Create a provider with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a provider with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            update_url: UPDATE_URL.to_string(),
            client,
        }
    }

    /// Create a provider with a caller-supplied client.
    ///
    /// Tests use this to pin client behavior (timeouts, proxy handling).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            update_url: UPDATE_URL.to_string(),
            client,
        }
    }

    /// Point the provider at a different update endpoint.
    ///
    /// Integration tests aim this at a loopback fixture.
    pub fn with_update_url(mut self, url: impl Into<String>) -> Self {
        self.update_url = url.into();
        self
    }
}

impl Default for NamecheapProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsProvider for NamecheapProvider {
    async fn update_record(
        &self,
        domain: &str,
        password: &str,
        ip: Ipv4Addr,
    ) -> Result<UpdateResult> {
        tracing::debug!(%domain, %ip, "sending dynamic-DNS update");

        let ip_text = ip.to_string();
        let response = self
            .client
            .get(&self.update_url)
            .query(&[
                ("host", UPDATE_HOST),
                ("domain", domain),
                ("password", password),
                ("ip", ip_text.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                // without_url: the URL carries the password
                Error::http(format!("update request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::provider(
                "namecheap",
                format!("unreadable update response: {}", e.without_url()),
            )
        })?;

        Ok(classify_response(status, &body))
    }

    fn provider_name(&self) -> &'static str {
        "namecheap"
    }
}

/// Classify one update response into applied or refused.
///
/// Anything other than HTTP 200 is a refusal with the status prepended to
/// the raw lines. A 200 body is judged by its error count and completion
/// flag.
fn classify_response(status: reqwest::StatusCode, body: &str) -> UpdateResult {
    let mut raw = response_lines(body);

    if status != reqwest::StatusCode::OK {
        raw.insert(0, format!("HTTP {status}"));
        return UpdateResult::Refused(UpdateFailure {
            err_count: 1,
            done: false,
            raw,
        });
    }

    let (err_count, done) =
        parse_interface_response(body).unwrap_or_else(|| parse_legacy_lines(&raw));

    if err_count == 0 && done {
        UpdateResult::Applied
    } else {
        UpdateResult::Refused(UpdateFailure {
            err_count,
            done,
            raw,
        })
    }
}

/// Split a response body into lines with any trailing `\r` removed.
fn response_lines(body: &str) -> Vec<String> {
    body.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Named-field lookup over the `interface-response` document.
///
/// Returns `None` when the `ErrCount` field is missing or unparseable,
/// which routes the body to the positional fallback.
fn parse_interface_response(body: &str) -> Option<(u32, bool)> {
    let err_count = tag_text(body, "ErrCount")?.parse().ok()?;
    let done = tag_text(body, "Done")
        .map(|text| text.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    Some((err_count, done))
}

/// Text content of the first `<tag>..</tag>` element, trimmed.
fn tag_text<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(body[start..end].trim())
}

/// Positional heuristic for bodies without the named fields.
///
/// The first digit run on line index 5 is the error count; line index 9
/// must contain `true` for the update to count as complete. A missing
/// line classifies as one error and an incomplete update.
fn parse_legacy_lines(lines: &[String]) -> (u32, bool) {
    let err_count = lines
        .get(LEGACY_ERR_COUNT_LINE)
        .and_then(|line| first_digit_run(line))
        .unwrap_or(1);
    let done = lines
        .get(LEGACY_DONE_LINE)
        .map(|line| line.contains("true"))
        .unwrap_or(false);
    (err_count, done)
}

/// Parse the first contiguous run of ASCII digits in `line`.
fn first_digit_run(line: &str) -> Option<u32> {
    let start = line.find(|c: char| c.is_ascii_digit())?;
    let digits: String = line[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
