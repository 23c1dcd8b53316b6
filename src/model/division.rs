use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::model::AddressInput;

/// Every U.S. division identifier starts with this.
const US_PREFIX: &str = "ocd-division/country:us";

/// An Open Civic Data division identifier, e.g.
/// `ocd-division/country:us/state:ny/place:brooklyn`.
///
/// Treated as opaque: identifiers returned by the civic-information service
/// are kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct JurisdictionIdentifier(String);

impl JurisdictionIdentifier {
    /// The state-level identifier for a state code or name.
    pub fn state(state: &str) -> Self {
        Self(format!("{US_PREFIX}/state:{}", normalize_state(state)))
    }

    /// The place-level identifier for a city within a state.
    pub fn place(state: &str, city: &str) -> Self {
        Self(format!(
            "{US_PREFIX}/state:{}/place:{}",
            normalize_state(state),
            normalize_city(city)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JurisdictionIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JurisdictionIdentifier {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

fn normalize_state(state: &str) -> String {
    state.to_lowercase()
}

fn normalize_city(city: &str) -> String {
    city.to_lowercase().replace(' ', "_")
}

/// The place- and state-level identifiers for a city, derived without
/// consulting any service. Only formats; an empty city or state still
/// produces a syntactically valid identifier.
pub fn fallback_identifiers(city: &str, state: &str) -> [JurisdictionIdentifier; 2] {
    [
        JurisdictionIdentifier::place(state, city),
        JurisdictionIdentifier::state(state),
    ]
}

/// [`fallback_identifiers`] for an address, comma-joined.
pub fn build_identifiers(address: &AddressInput) -> String {
    join_identifiers(&fallback_identifiers(&address.city, &address.state))
}

/// Join identifiers into the comma-separated form the elections service expects.
pub fn join_identifiers<'a>(ids: impl IntoIterator<Item = &'a JurisdictionIdentifier>) -> String {
    ids.into_iter()
        .map(JurisdictionIdentifier::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
