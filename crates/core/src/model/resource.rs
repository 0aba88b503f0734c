use serde::{Deserialize, Serialize};

/// An external reading/watching suggestion attached to a card or step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub kind: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl Resource {
    #[must_use]
    pub fn link(&self) -> LinkTarget {
        self.url
            .as_deref()
            .map_or(LinkTarget::Inert, link_target)
    }
}

/// Where a rendered link is allowed to point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Opens in a new window with `noopener noreferrer`.
    External(String),
    /// Rendered as `#` in the same window.
    Inert,
}

impl LinkTarget {
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            LinkTarget::External(href) => href,
            LinkTarget::Inert => "#",
        }
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, LinkTarget::External(_))
    }
}

/// Only absolute `http(s)` URLs and site-relative paths become live links.
#[must_use]
pub fn link_target(raw: &str) -> LinkTarget {
    let raw = raw.trim();
    if raw.starts_with('/') && !raw.starts_with("//") {
        return LinkTarget::External(raw.to_string());
    }
    match url::Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            LinkTarget::External(url.to_string())
        }
        _ => LinkTarget::Inert,
    }
}
