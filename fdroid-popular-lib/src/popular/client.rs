//! Hosting API client
//!
//! Minimal GitHub/GitLab client that fetches the star count of a single repository.

use super::Service;
use crate::Result;
use core::time::Duration;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

const LOG_TARGET: &str = "    client";

/// Result of asking a hosting service for a star count
#[derive(Debug)]
pub enum FetchOutcome {
    /// The star count was found
    Found(u64),

    /// The service could not supply a star count for this repository; the run continues
    Skipped(String),

    /// The service signaled quota exhaustion (403 or 429); the run must stop
    RateLimited(Service),

    /// The request failed below the HTTP level; the run must stop
    Failed(ohno::AppError),
}

impl FetchOutcome {
    /// Returns `true` if this outcome must abort the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Failed(_))
    }
}

/// Something that can fetch a star count from a hosting service.
pub trait StarFetcher: Send + Sync {
    /// Fetch the star count at `endpoint` from `service`.
    fn fetch_stars(&self, service: Service, endpoint: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// Credentials for the hosting services, fixed for the whole run.
#[derive(Clone, Default)]
pub struct Credentials {
    pub github: Option<String>,
    pub gitlab: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn for_service(&self, service: Service) -> Option<&str> {
        match service {
            Service::GitHub => self.github.as_deref(),
            Service::GitLab => self.gitlab.as_deref(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("github", &self.github.as_ref().map(|_| "<redacted>"))
            .field("gitlab", &self.gitlab.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// HTTP client for the supported hosting services.
///
/// Each service gets its own underlying client so that its credential is attached as a
/// default header to every request.
#[derive(Debug, Clone)]
pub struct Client {
    github: reqwest::Client,
    gitlab: reqwest::Client,
}

impl Client {
    /// Create a client with optional per-service credentials and a per-request timeout.
    pub fn new(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        Ok(Self {
            github: build_client(credentials.for_service(Service::GitHub), timeout)?,
            gitlab: build_client(credentials.for_service(Service::GitLab), timeout)?,
        })
    }

    const fn client_for(&self, service: Service) -> &reqwest::Client {
        match service {
            Service::GitHub => &self.github,
            Service::GitLab => &self.gitlab,
        }
    }
}

impl StarFetcher for Client {
    async fn fetch_stars(&self, service: Service, endpoint: &str) -> FetchOutcome {
        log::debug!(target: LOG_TARGET, "Querying {service} at '{endpoint}'");

        let resp = match self.client_for(service).get(endpoint).send().await {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::Failed(ohno::AppError::from(e)),
        };

        let status = resp.status();
        if matches!(status, StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN) {
            return FetchOutcome::RateLimited(service);
        }

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return FetchOutcome::Skipped(format!("unable to fetch repository info from {service} ({status}): {body}"));
        }

        match resp.bytes().await {
            Ok(body) => parse_stars(service, &body),
            Err(e) => FetchOutcome::Failed(ohno::AppError::from(e)),
        }
    }
}

fn build_client(token: Option<&str>, timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(t) = token {
        let mut auth_val = HeaderValue::from_str(&format!("Bearer {t}"))?;
        auth_val.set_sensitive(true);
        let _ = headers.insert(AUTHORIZATION, auth_val);
    }

    Ok(reqwest::Client::builder()
        .user_agent("fdroid-popular")
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}

/// Extract the service-specific star count from a repository response body.
fn parse_stars(service: Service, body: &[u8]) -> FetchOutcome {
    let field = service.star_field();

    let stars = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get(field).and_then(serde_json::Value::as_u64));

    stars.map_or_else(
        || FetchOutcome::Skipped(format!("could not find \"{field}\" in {service} repository response")),
        FetchOutcome::Found,
    )
}
