//! Endpoint resolution.
//!
//! An [`Endpoint`] is the regional base URL of the REST API, e.g.
//! `https://api.us2.sumologic.com/api`. It never ends with `/`, because
//! request URLs are built by plain concatenation with paths that start
//! with `/`.
//!
//! # Resolution
//!
//! | specifier           | result                                   |
//! |---------------------|------------------------------------------|
//! | none                | auto-discovered via [`discover`]         |
//! | fewer than 3 chars  | `https://api.<code>.sumologic.com/api`   |
//! | anything else       | used verbatim                            |

use std::fmt;

use tracing::{debug, info, warn};

use savecfg_core::error::ApiError;

use crate::transport::{ApiRequest, Method, Transport};

/// Default (non-regional) API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.sumologic.com/api";

/// Path probed during auto-discovery and stripped from the redirect target.
pub const DISCOVERY_PATH: &str = "/v1/collectors";

/// Specifiers shorter than this are treated as region codes.
const REGION_CODE_MAX_LEN: usize = 3;

/// A validated API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    /// Resolve an explicit specifier: a short region code or a full URL.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidEndpoint`] if the specifier is empty or the
    /// resulting URL ends with a slash.
    pub fn parse(specifier: &str) -> Result<Self, ApiError> {
        if specifier.is_empty() {
            return Err(ApiError::InvalidEndpoint {
                endpoint: String::new(),
                reason: "endpoint must not be empty".to_owned(),
            });
        }

        let url = if specifier.chars().count() < REGION_CODE_MAX_LEN {
            format!("https://api.{specifier}.sumologic.com/api")
        } else {
            specifier.to_owned()
        };
        Self::from_url(url)
    }

    /// Derive the endpoint from the final URL of the discovery probe.
    pub fn from_discovered_url(final_url: &str) -> Result<Self, ApiError> {
        let base = match final_url.strip_suffix(DISCOVERY_PATH) {
            Some(base) => base.to_owned(),
            None => {
                warn!(
                    url = final_url,
                    "discovery redirect did not end with the probe path"
                );
                final_url.replacen(DISCOVERY_PATH, "", 1)
            }
        };
        Self::from_url(base)
    }

    fn from_url(url: String) -> Result<Self, ApiError> {
        if url.ends_with('/') {
            return Err(ApiError::InvalidEndpoint {
                endpoint: url,
                reason: "endpoint should not end with a slash character".to_owned(),
            });
        }
        Ok(Self(url))
    }

    /// The base URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL for a path relative to the endpoint.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discover the caller's regional endpoint.
///
/// Sends a GET to the default endpoint's collector listing. The platform
/// redirects it to the regional deployment, and the redirect target
/// minus [`DISCOVERY_PATH`] is the endpoint. The probe normally ends in a
/// 401 at the regional host, so the status is not checked.
///
/// This needs network access to the default endpoint.
pub async fn discover(transport: &dyn Transport) -> Result<Endpoint, ApiError> {
    let probe = format!("{DEFAULT_ENDPOINT}{DISCOVERY_PATH}");
    debug!(url = %probe, "discovering regional endpoint");

    let response = transport.execute(ApiRequest::new(Method::Get, probe)).await?;
    let endpoint = Endpoint::from_discovered_url(&response.url)?;

    info!(endpoint = %endpoint, status = response.status, "endpoint discovered");
    Ok(endpoint)
}

/// Resolve an optional specifier, falling back to [`discover`].
pub async fn resolve(
    transport: &dyn Transport,
    specifier: Option<&str>,
) -> Result<Endpoint, ApiError> {
    match specifier {
        Some(spec) => Endpoint::parse(spec),
        None => discover(transport).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[test]
    fn two_letter_code_expands_to_regional_url() {
        let endpoint = Endpoint::parse("us").unwrap();
        assert_eq!(endpoint.as_str(), "https://api.us.sumologic.com/api");
    }

    #[test]
    fn single_letter_code_expands_too() {
        let endpoint = Endpoint::parse("x").unwrap();
        assert_eq!(endpoint.as_str(), "https://api.x.sumologic.com/api");
    }

    #[test]
    fn three_letter_specifier_is_used_verbatim() {
        // 3자 이상이면 지역 코드로 보지 않음
        let endpoint = Endpoint::parse("us2").unwrap();
        assert_eq!(endpoint.as_str(), "us2");
    }

    #[test]
    fn full_url_is_used_verbatim() {
        let endpoint = Endpoint::parse("https://api.eu.sumologic.com/api").unwrap();
        assert_eq!(endpoint.as_str(), "https://api.eu.sumologic.com/api");
    }

    #[test]
    fn trailing_slash_is_rejected() {
        let err = Endpoint::parse("https://api.eu.sumologic.com/api/").unwrap_err();
        assert!(matches!(err, ApiError::InvalidEndpoint { .. }));
        assert!(err.to_string().contains("slash"));
    }

    #[test]
    fn empty_specifier_is_rejected() {
        assert!(matches!(
            Endpoint::parse(""),
            Err(ApiError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn join_concatenates_path() {
        let endpoint = Endpoint::parse("au").unwrap();
        assert_eq!(
            endpoint.join("/v1/tokens"),
            "https://api.au.sumologic.com/api/v1/tokens"
        );
    }

    #[test]
    fn discovered_url_strips_probe_path() {
        let endpoint =
            Endpoint::from_discovered_url("https://api.us2.sumologic.com/api/v1/collectors")
                .unwrap();
        assert_eq!(endpoint.as_str(), "https://api.us2.sumologic.com/api");
    }

    #[tokio::test]
    async fn discover_follows_redirect_target() {
        let probe = format!("{DEFAULT_ENDPOINT}{DISCOVERY_PATH}");
        let transport = MockTransport::new().with_redirect(
            Method::Get,
            &probe,
            "https://api.de.sumologic.com/api/v1/collectors",
            401,
            "unauthorized",
        );

        let endpoint = discover(&transport).await.unwrap();
        assert_eq!(endpoint.as_str(), "https://api.de.sumologic.com/api");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, probe);
    }

    #[tokio::test]
    async fn resolve_with_specifier_makes_no_request() {
        let transport = MockTransport::new();
        let endpoint = resolve(&transport, Some("jp")).await.unwrap();
        assert_eq!(endpoint.as_str(), "https://api.jp.sumologic.com/api");
        assert!(transport.requests().is_empty());
    }
}
