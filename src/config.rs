use std::fmt::{Debug, Formatter};
use std::time::Duration;

use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    figment::{self, Figment},
    Build, Rocket,
};
use serde::Deserialize;
use thiserror::Error;

use crate::lookup::Pipeline;
use crate::model::MethodMatching;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    #[serde(default = "default_civic_url")]
    civic_url: String,
    #[serde(default = "default_elections_url")]
    elections_url: String,
    #[serde(default = "default_upstream_timeout")]
    upstream_timeout: u64,
    #[serde(default)]
    voting_method_match: MethodMatching,
    // secrets
    civic_api_key: String,
}

fn default_civic_url() -> String {
    "https://www.googleapis.com/civicinfo/v2/representatives".to_string()
}

fn default_elections_url() -> String {
    "https://api.turbovote.org/elections/upcoming".to_string()
}

fn default_upstream_timeout() -> u64 {
    5
}

/// Reasons the server cannot be set up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid application config: {0}")]
    Config(#[from] figment::Error),
    #[error("Failed to build upstream HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Election lookup requires the application config")]
    ConfigNotLoaded,
}

impl Config {
    /// Extract the config from `figment`.
    pub fn from_figment(figment: &Figment) -> Result<Self, SetupError> {
        Ok(figment.extract()?)
    }

    /// Endpoint of the civic-information service.
    pub fn civic_url(&self) -> &str {
        &self.civic_url
    }

    /// Endpoint of the elections service.
    pub fn elections_url(&self) -> &str {
        &self.elections_url
    }

    /// Timeout applied to each outbound request, in seconds.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// How voting methods are recognised in election records.
    pub fn voting_method_match(&self) -> MethodMatching {
        self.voting_method_match
    }

    /// Key for the civic-information service.
    pub fn civic_api_key(&self) -> &str {
        &self.civic_api_key
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("civic_url", &self.civic_url)
            .field("elections_url", &self.elections_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("voting_method_match", &self.voting_method_match)
            .field("civic_api_key", &"[REDACTED]")
            .finish()
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match Config::from_figment(rocket.figment()) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                if let SetupError::Config(e) = e {
                    rocket::config::pretty_print_error(e);
                }
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// A fairing that builds the shared upstream HTTP client from the config and
/// places the lookup [`Pipeline`] into managed state.
/// Must be attached after [`ConfigFairing`].
pub struct LookupFairing;

#[rocket::async_trait]
impl Fairing for LookupFairing {
    fn info(&self) -> Info {
        Info {
            name: "Election lookup",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let pipeline = match rocket
            .state::<Config>()
            .ok_or(SetupError::ConfigNotLoaded)
            .and_then(Pipeline::from_config)
        {
            Ok(pipeline) => pipeline,
            Err(e) => {
                error!("{e}");
                return Err(rocket);
            }
        };
        info!("Election lookup ready: {pipeline:?}");

        rocket = rocket.manage(pipeline);
        Ok(rocket)
    }
}


#[cfg(test)]
mod tests {
    use rocket::{error::ErrorKind, figment::providers::Serialized};

    use super::*;

    #[test]
    fn defaults_fill_everything_but_the_key() {
        let config: Config = Figment::new()
            .merge(Serialized::default("civic_api_key", "abc"))
            .extract()
            .unwrap();
        assert_eq!(
            "https://www.googleapis.com/civicinfo/v2/representatives",
            config.civic_url()
        );
        assert_eq!(
            "https://api.turbovote.org/elections/upcoming",
            config.elections_url()
        );
        assert_eq!(Duration::from_secs(5), config.upstream_timeout());
        assert_eq!(MethodMatching::Positional, config.voting_method_match());
        assert_eq!("abc", config.civic_api_key());
    }

    #[test]
    fn api_key_is_required() {
        let result = Config::from_figment(&Figment::new());
        assert!(matches!(result, Err(SetupError::Config(_))));
    }

    #[rocket::async_test]
    async fn missing_key_aborts_ignition() {
        let figment = Figment::from(rocket::Config::debug_default());
        let err = match crate::rocket_for_figment(figment).ignite().await {
            Ok(_) => panic!("server ignited without an API key"),
            Err(err) => err,
        };
        match err.kind() {
            ErrorKind::FailedFairings(failed) => {
                assert!(failed.iter().any(|info| info.name == "Config"));
            }
            kind => panic!("unexpected ignition failure: {kind}"),
        }
    }

    #[test]
    fn matching_mode_is_configurable() {
        let config: Config = Figment::new()
            .merge(Serialized::default("civic_api_key", "abc"))
            .merge(Serialized::default("voting_method_match", "by_type"))
            .extract()
            .unwrap();
        assert_eq!(MethodMatching::ByType, config.voting_method_match());
    }

    #[test]
    fn debug_hides_api_key() {
        let config = Config::example("http://civic", "http://elections");
        assert!(!format!("{config:?}").contains("test-key"));
    }
}
