//! Clients for the two upstream services, and the pipeline chaining them.
//!
//! Each client makes exactly one request per call, with no retries. The
//! shared `reqwest::Client` carries the per-call timeout and is cheap to clone.

use log::warn;
use reqwest::RequestBuilder;
use rocket::serde::json::{serde_json, Value};

use crate::error::{Error, Result, Upstream};

mod civic;
mod elections;
mod pipeline;

pub use civic::CivicResolver;
pub use elections::ElectionLookup;
pub use pipeline::Pipeline;

/// Send `request` and decode its body as JSON.
///
/// Transport failures (including timeouts) are [`Error::UpstreamUnavailable`];
/// a non-2xx status or a body that is not JSON is [`Error::UpstreamProtocol`].
async fn fetch_json(service: Upstream, request: RequestBuilder) -> Result<Value> {
    let response = request.send().await.map_err(|err| {
        warn!("Could not reach {service}: {err}");
        Error::unavailable(service, err)
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!("{service} answered {status}");
        return Err(Error::protocol(service, format!("unexpected status {status}")));
    }

    let body = response.bytes().await.map_err(|err| {
        warn!("Failed to read {service} response: {err}");
        Error::unavailable(service, err)
    })?;

    serde_json::from_slice(&body).map_err(|err| {
        warn!("{service} sent a body that is not JSON: {err}");
        Error::protocol(service, format!("invalid JSON body: {err}"))
    })
}
