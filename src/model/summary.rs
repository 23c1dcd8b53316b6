use rocket::serde::json::serde_json::Number;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::model::{ElectionRecord, VotingMethod, VotingMethodType};

/// How voting-method availability is read off a division's method list.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodMatching {
    /// Each method is only recognised at its conventional index:
    /// early voting first, in person second, by mail third.
    #[default]
    Positional,
    /// Each method is recognised anywhere in the list.
    ByType,
}

impl MethodMatching {
    /// Whether `methods` offers `wanted`. Never fails: a short list, a missing
    /// type tag or a different method at the expected index all mean "no".
    /// Unrecognised methods are never offered.
    pub fn offers(self, methods: &[VotingMethod], wanted: VotingMethodType) -> bool {
        if wanted == VotingMethodType::Other {
            return false;
        }
        match self {
            Self::Positional => wanted
                .canonical_position()
                .and_then(|i| methods.get(i))
                .map_or(false, |method| method.kind == Some(wanted)),
            Self::ByType => methods.iter().any(|method| method.kind == Some(wanted)),
        }
    }
}

/// The fixed-shape description of an upcoming election handed to the caller.
///
/// The default value, with every field absent, means no upcoming election is
/// known for the address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionSummary {
    pub description: Option<String>,
    pub website: Option<String>,
    pub date: Option<String>,
    pub polling_place_url: Option<String>,
    pub population: Option<Number>,
    pub election_authority_level: Option<String>,
    pub early_voting: bool,
    pub in_person: bool,
    pub by_mail: bool,
}

impl ElectionSummary {
    /// Summarise the first election in `records`, using the first of its
    /// divisions for the authority level and voting methods.
    ///
    /// Callers with no records should use [`ElectionSummary::default`] instead;
    /// an empty slice is reported as a missing field.
    pub fn from_records(records: &[ElectionRecord], matching: MethodMatching) -> Result<Self> {
        let record = records.first().ok_or(Error::MissingField("elections"))?;
        let division = record
            .district_divisions
            .first()
            .ok_or(Error::MissingField("district-divisions"))?;
        let methods = &division.voting_methods;

        Ok(Self {
            description: Some(required(&record.description, "description")?),
            website: Some(required(&record.website, "website")?),
            date: Some(required(&record.date, "date")?),
            polling_place_url: Some(required(&record.polling_place_url, "polling-place-url")?),
            population: Some(
                record
                    .population
                    .clone()
                    .ok_or(Error::MissingField("population"))?,
            ),
            election_authority_level: Some(required(
                &division.election_authority_level,
                "election-authority-level",
            )?),
            early_voting: matching.offers(methods, VotingMethodType::EarlyVoting),
            in_person: matching.offers(methods, VotingMethodType::InPerson),
            by_mail: matching.offers(methods, VotingMethodType::ByMail),
        })
    }

    /// True iff this is the "no upcoming election" summary.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn required(field: &Option<String>, name: &'static str) -> Result<String> {
    field.clone().ok_or(Error::MissingField(name))
}

/// Serialize an empty summary as `{}` rather than a record of nulls.
pub fn summary_or_empty<S>(
    summary: &ElectionSummary,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if summary.is_empty() {
        serializer.serialize_map(Some(0))?.end()
    } else {
        summary.serialize(serializer)
    }
}
