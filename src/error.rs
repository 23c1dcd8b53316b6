use std::fmt::{Display, Formatter};

use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::{json, Json},
    Request,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The external services an address lookup depends on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Upstream {
    /// Maps a free-text address to civic divisions.
    CivicInfo,
    /// Maps civic divisions to upcoming elections.
    Elections,
}

impl Display for Upstream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CivicInfo => write!(f, "civic-information service"),
            Self::Elections => write!(f, "elections service"),
        }
    }
}

/// Errors that can occur while looking up elections for an address.
#[derive(Debug, Error)]
pub enum Error {
    /// The service could not be reached, or did not answer in time.
    #[error("{service} unavailable: {source}")]
    UpstreamUnavailable {
        service: Upstream,
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a failure status or a body that is not JSON.
    #[error("{service} protocol error: {reason}")]
    UpstreamProtocol { service: Upstream, reason: String },
    /// The service answered with JSON of the wrong shape.
    #[error("{service} response did not match the expected shape: {detail}")]
    UpstreamSchema { service: Upstream, detail: String },
    /// An election record lacks a field the summary requires.
    #[error("Election record is missing `{0}`")]
    MissingField(&'static str),
}

impl Error {
    pub fn unavailable(service: Upstream, source: reqwest::Error) -> Self {
        Self::UpstreamUnavailable {
            service,
            timed_out: source.is_timeout(),
            source,
        }
    }

    pub fn protocol(service: Upstream, reason: impl Into<String>) -> Self {
        Self::UpstreamProtocol {
            service,
            reason: reason.into(),
        }
    }

    pub fn schema(service: Upstream, detail: impl Into<String>) -> Self {
        Self::UpstreamSchema {
            service,
            detail: detail.into(),
        }
    }

    /// The HTTP status this error is reported to the caller with.
    pub fn status(&self) -> Status {
        match self {
            Self::UpstreamUnavailable {
                timed_out: true, ..
            } => Status::GatewayTimeout,
            Self::UpstreamUnavailable { .. } => Status::ServiceUnavailable,
            Self::UpstreamProtocol { .. } | Self::UpstreamSchema { .. } | Self::MissingField(_) => {
                Status::BadGateway
            }
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).respond_to(req)
    }
}
