use core::fmt::{Display, Formatter};

/// A code hosting service that exposes a star count for repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    GitHub,
    GitLab,
}

/// Static settings for a hosting service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSpec {
    pub service: Service,

    /// Substring identifying a source code URL as hosted on this service
    pub url_marker: &'static str,

    /// Display name for log and error messages
    pub display_name: &'static str,

    /// Name of the star count field in the repository API response
    pub star_field: &'static str,
}

/// Supported hosting services, in detection order.
pub static SUPPORTED_SERVICES: &[ServiceSpec] = &[
    ServiceSpec {
        service: Service::GitHub,
        url_marker: "github",
        display_name: "GitHub",
        star_field: "stargazers_count",
    },
    ServiceSpec {
        service: Service::GitLab,
        url_marker: "gitlab",
        display_name: "GitLab",
        star_field: "star_count",
    },
];

impl Service {
    /// Detect the hosting service of a source code URL.
    ///
    /// This is a plain, case-sensitive substring match. The first entry of
    /// [`SUPPORTED_SERVICES`] whose marker occurs in the URL wins.
    #[must_use]
    pub fn detect(source_code_url: &str) -> Option<Self> {
        SUPPORTED_SERVICES
            .iter()
            .find(|spec| source_code_url.contains(spec.url_marker))
            .map(|spec| spec.service)
    }

    #[must_use]
    pub fn spec(self) -> &'static ServiceSpec {
        match self {
            Self::GitHub => &SUPPORTED_SERVICES[0],
            Self::GitLab => &SUPPORTED_SERVICES[1],
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    #[must_use]
    pub fn star_field(self) -> &'static str {
        self.spec().star_field
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.display_name())
    }
}
