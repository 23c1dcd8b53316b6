//! Upstream election records, as returned by the elections service.
//!
//! Decoding never rejects a record. A field of the wrong JSON type reads as
//! absent, a list that is not an array reads as empty, and a list entry that
//! is not an object keeps its position as an empty entry. Whether a gap
//! matters is decided when the record is summarised.

use rocket::serde::json::{
    serde_json::{self, Number},
    Value,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::model::JurisdictionIdentifier;

/// One upcoming election.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ElectionRecord {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub website: Option<String>,
    /// RFC 3339 timestamp, kept as received.
    #[serde(deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub polling_place_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub polling_place_url_shortened: Option<String>,
    /// An estimate, integral or not, kept as received.
    #[serde(deserialize_with = "lenient")]
    pub population: Option<Number>,
    #[serde(deserialize_with = "lenient_list")]
    pub district_divisions: Vec<DivisionSubRecord>,
}

/// The part of an election administered by one jurisdiction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DivisionSubRecord {
    #[serde(deserialize_with = "lenient")]
    pub ocd_id: Option<JurisdictionIdentifier>,
    #[serde(deserialize_with = "lenient")]
    pub election_authority_level: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub voter_registration_authority_level: Option<String>,
    /// In whatever order the service chose.
    #[serde(deserialize_with = "lenient_list")]
    pub voting_methods: Vec<VotingMethod>,
}

/// One way of casting a ballot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct VotingMethod {
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<VotingMethodType>,
    #[serde(deserialize_with = "lenient")]
    pub primary: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub excuse_required: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub start: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub end: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VotingMethodType {
    EarlyVoting,
    InPerson,
    ByMail,
    /// Anything the service adds later.
    #[serde(other)]
    Other,
}

/// Decode leniently: a value of the wrong type is the same as no value.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(lenient_items(items)),
        _ => Ok(Vec::new()),
    }
}

/// Decode each item, standing in an empty one wherever an item is not an
/// object, so that positions are kept.
pub(crate) fn lenient_items<T>(items: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect()
}

impl VotingMethodType {
    /// Where the service conventionally lists this method.
    pub fn canonical_position(self) -> Option<usize> {
        match self {
            Self::EarlyVoting => Some(0),
            Self::InPerson => Some(1),
            Self::ByMail => Some(2),
            Self::Other => None,
        }
    }
}
