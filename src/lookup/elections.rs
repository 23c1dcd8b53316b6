use std::collections::BTreeSet;

use log::{debug, warn};
use reqwest::{header::ACCEPT, Client};
use rocket::serde::json::Value;

use crate::error::{Error, Result, Upstream};
use crate::model::{
    division::join_identifiers, election::lenient_items, ElectionRecord, JurisdictionIdentifier,
};

use super::fetch_json;

/// Finds upcoming elections for a set of civic divisions.
#[derive(Debug, Clone)]
pub struct ElectionLookup {
    http: Client,
    url: String,
}

impl ElectionLookup {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Upcoming elections in any of `divisions`. An empty list means the
    /// service knows of none; it is not an error.
    ///
    /// Records are returned as decoded, without checking that the fields a
    /// summary needs are present or well-typed.
    pub async fn lookup(
        &self,
        divisions: &BTreeSet<JurisdictionIdentifier>,
    ) -> Result<Vec<ElectionRecord>> {
        let joined = join_identifiers(divisions);
        let request = self
            .http
            .get(&self.url)
            .query(&[("district-divisions", joined.as_str())])
            .header(ACCEPT, "application/json");

        debug!("Looking up elections for {} divisions via {}", divisions.len(), self.url);
        let body = fetch_json(Upstream::Elections, request).await?;
        let records = records_from_body(body)?;
        debug!("Found {} upcoming elections", records.len());
        Ok(records)
    }
}

/// The service answers `{}` when it has nothing, and an array of records otherwise.
fn records_from_body(body: Value) -> Result<Vec<ElectionRecord>> {
    match body {
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        Value::Array(items) => Ok(lenient_items(items)),
        other => {
            warn!("{} sent neither `{{}}` nor an array", Upstream::Elections);
            Err(Error::schema(
                Upstream::Elections,
                format!("expected an array of elections or `{{}}`, got {}", kind_of(&other)),
            ))
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
