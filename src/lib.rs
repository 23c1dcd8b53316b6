#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{figment::Figment, Build, Rocket};

use crate::config::{ConfigFairing, LookupFairing};
use crate::logging::LoggerFairing;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod model;

/// Assemble the server from `Rocket.toml` and `ROCKET_*` environment variables.
pub fn build() -> Rocket<Build> {
    rocket_for_figment(rocket::Config::figment())
}

pub(crate) fn rocket_for_figment(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(LookupFairing)
}

#[cfg(test)]
pub(crate) const CIVIC_PATH: &str = "/civicinfo/v2/representatives";

#[cfg(test)]
pub(crate) const ELECTIONS_PATH: &str = "/elections/upcoming";

/// A server whose upstream services live at the given base URIs,
/// e.g. those of mock servers.
#[cfg(test)]
pub(crate) fn rocket_for_upstreams(civic_uri: &str, elections_uri: &str) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("civic_api_key", "test-key"))
        .merge(("civic_url", format!("{civic_uri}{CIVIC_PATH}")))
        .merge(("elections_url", format!("{elections_uri}{ELECTIONS_PATH}")))
        .merge(("upstream_timeout", 2));
    rocket_for_figment(figment)
}
