use log::{info, warn};
use rocket::{form::Form, serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::RequestId;
use crate::lookup::Pipeline;
use crate::model::{summary::summary_or_empty, AddressInput, ElectionSummary};

pub fn routes() -> Vec<Route> {
    routes![search]
}

/// What a search hands back for display: the next election, plus the city
/// and state as the voter typed them.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub city: String,
    pub state: String,
    /// `{}` when no upcoming election is known.
    #[serde(serialize_with = "summary_or_empty", default)]
    pub results: ElectionSummary,
}

#[post("/search", data = "<address>")]
pub async fn search(
    id: RequestId,
    address: Form<AddressInput>,
    pipeline: &State<Pipeline>,
) -> Result<Json<SearchResults>> {
    let address = address.into_inner();

    let summary = pipeline.run(&address).await.map_err(|err| {
        warn!("req{id} election lookup failed: {err}");
        err
    })?;
    if summary.is_empty() {
        info!("req{id} no upcoming elections for {}, {}", address.city, address.state);
    }

    Ok(Json(SearchResults {
        city: address.city,
        state: address.state,
        results: summary,
    }))
}
