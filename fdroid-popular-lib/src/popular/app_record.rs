use super::Service;
use super::catalog::PackageMetadata;
use core::fmt::{Display, Formatter};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const GITHUB_HOST: &str = "//github.com";
const GITHUB_API_HOST: &str = "//api.github.com/repos";
const GITLAB_PREFIX: &str = "https://gitlab.com/";
const GITLAB_PROJECTS_API: &str = "https://gitlab.com/api/v4/projects";

/// Everything except the RFC 3986 unreserved characters. A space becomes `%20`, not `+`.
const PATH_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// One application of the catalog, along with the star count collected for it.
///
/// The hosting service and API endpoint are derived from the source code URL once, when
/// the record is created. A record without a service is never sent to a hosting API and
/// keeps a star count of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRecord {
    namespace: String,
    source_code_url: Option<String>,
    service: Option<Service>,
    api_endpoint: Option<String>,
    pub stars: u64,
}

impl AppRecord {
    #[must_use]
    pub fn new(namespace: impl Into<String>, metadata: &PackageMetadata) -> Self {
        Self::from_source_code_url(namespace, metadata.source_code.clone())
    }

    #[must_use]
    pub fn from_source_code_url(namespace: impl Into<String>, source_code_url: Option<String>) -> Self {
        let service = source_code_url.as_deref().and_then(Service::detect);
        let api_endpoint = match (service, source_code_url.as_deref()) {
            (Some(service), Some(url)) => Some(api_endpoint(service, url)),
            _ => None,
        };

        Self {
            namespace: namespace.into(),
            source_code_url,
            service,
            api_endpoint,
            stars: 0,
        }
    }

    /// Create a record that queries an explicit endpoint on `service`, bypassing URL derivation.
    ///
    /// Only available in debug and test builds, so tests can point a record at a local server.
    #[cfg(any(debug_assertions, test))]
    #[must_use]
    pub fn with_target(namespace: impl Into<String>, service: Service, api_endpoint: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            source_code_url: None,
            service: Some(service),
            api_endpoint: Some(api_endpoint.into()),
            stars: 0,
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn source_code_url(&self) -> Option<&str> {
        self.source_code_url.as_deref()
    }

    #[must_use]
    pub const fn service(&self) -> Option<Service> {
        self.service
    }

    #[must_use]
    pub fn api_endpoint(&self) -> Option<&str> {
        self.api_endpoint.as_deref()
    }

    /// The service and endpoint to query, or `None` if this record has nothing to query.
    #[must_use]
    pub fn target(&self) -> Option<(Service, &str)> {
        self.service.zip(self.api_endpoint.as_deref())
    }
}

impl Display for AppRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.namespace)
    }
}

/// Build the repository API endpoint for a source code URL.
fn api_endpoint(service: Service, source_code_url: &str) -> String {
    match service {
        Service::GitHub => source_code_url
            .replace(GITHUB_HOST, GITHUB_API_HOST)
            .trim_end_matches('/')
            .to_string(),
        Service::GitLab => {
            let path = source_code_url.replace(GITLAB_PREFIX, "");
            format!("{GITLAB_PROJECTS_API}/{}", utf8_percent_encode(&path, PATH_COMPONENT))
        }
    }
}
