use thiserror::Error;

/// Errors returned by the origin photo service client
#[derive(Debug, Clone, Error)]
pub enum OriginError {
    /// Network or transport failure before a response was received
    #[error("Request to origin failed: {0}")]
    Request(String),

    /// Origin answered with anything other than 200 OK
    #[error("Origin returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: &'static str },

    /// Response body was not the JSON shape we expect
    #[error("Malformed payload from {endpoint}: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    /// Could not build a URL beneath the configured base address
    #[error("Invalid origin URL: {0}")]
    InvalidUrl(String),
}

impl OriginError {
    /// Whether this failure is reported to public callers as "not found".
    ///
    /// Unreachable origins and every non-200 status collapse to the same
    /// answer so nothing about the origin leaks through the tunnel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OriginError::Request(_) | OriginError::Status { .. })
    }
}

impl From<reqwest::Error> for OriginError {
    fn from(err: reqwest::Error) -> Self {
        OriginError::Request(err.to_string())
    }
}

/// Errors that can occur while resolving a share key into gallery URLs
#[derive(Debug, Clone, Error)]
pub enum ShareError {
    /// Looking up the shared link itself failed
    #[error("Failed to fetch share: {0}")]
    ShareFetch(#[source] OriginError),

    /// Looking up the album behind an album share failed
    #[error("Failed to fetch album assets: {0}")]
    AlbumFetch(#[source] OriginError),

    /// Share claims to be an album but carries no album reference
    #[error("Album data missing for ALBUM type share")]
    MissingAlbumData,

    /// Share type is neither INDIVIDUAL nor ALBUM
    #[error("Unknown share type: {0}")]
    UnknownShareType(String),
}

impl ShareError {
    /// The origin failure underneath this error, if any.
    pub fn origin(&self) -> Option<&OriginError> {
        match self {
            ShareError::ShareFetch(e) | ShareError::AlbumFetch(e) => Some(e),
            ShareError::MissingAlbumData | ShareError::UnknownShareType(_) => None,
        }
    }

    /// Whether the public response for this error is a 404.
    pub fn is_not_found(&self) -> bool {
        self.origin().is_some_and(OriginError::is_not_found)
    }
}

/// Errors from loading or filling the gallery page template
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Template file could not be read
    #[error("Failed to read template {path}: {message}")]
    Read { path: String, message: String },

    /// `{{` without a closing `}}`
    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),

    /// Placeholder name we do not know how to fill
    #[error("Unknown placeholder: {{{{{0}}}}}")]
    UnknownPlaceholder(String),

    /// Template lacks a placeholder the page cannot do without
    #[error("Template is missing required placeholder {{{{{0}}}}}")]
    MissingPlaceholder(&'static str),

    /// Serializing page data for the template failed
    #[error("Failed to render page: {0}")]
    Render(String),
}

/// Errors obtaining the public listener
#[derive(Debug, Error)]
pub enum TunnelError {
    /// Tunnel identity was empty
    #[error("Tunnel hostname is empty")]
    MissingHostname,

    /// Binding the local end of the tunnel failed
    #[error("Failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
