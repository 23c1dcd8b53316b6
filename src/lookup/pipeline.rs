use log::info;
use reqwest::Client;

use crate::config::{Config, SetupError};
use crate::error::Result;
use crate::model::{AddressInput, ElectionSummary, MethodMatching};

use super::{CivicResolver, ElectionLookup};

/// Address in, election summary out: resolve divisions, look up elections,
/// summarise the first one.
#[derive(Debug, Clone)]
pub struct Pipeline {
    resolver: CivicResolver,
    elections: ElectionLookup,
    matching: MethodMatching,
}

impl Pipeline {
    pub fn new(resolver: CivicResolver, elections: ElectionLookup, matching: MethodMatching) -> Self {
        Self {
            resolver,
            elections,
            matching,
        }
    }

    /// Build a pipeline whose two clients share one connection pool and
    /// time out after the configured interval.
    pub fn from_config(config: &Config) -> std::result::Result<Self, SetupError> {
        let http = Client::builder()
            .timeout(config.upstream_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::new(
            CivicResolver::new(http.clone(), config.civic_url(), config.civic_api_key()),
            ElectionLookup::new(http, config.elections_url()),
            config.voting_method_match(),
        ))
    }

    /// Summarise the next election for `address`.
    ///
    /// If no upcoming election is known the summary is empty; that is not an
    /// error. Upstream failures are passed through untouched.
    pub async fn run(&self, address: &AddressInput) -> Result<ElectionSummary> {
        let divisions = self.resolver.resolve(address).await?;
        let records = self.elections.lookup(&divisions).await?;
        if records.is_empty() {
            info!("No upcoming elections in {} divisions", divisions.len());
            return Ok(ElectionSummary::default());
        }
        ElectionSummary::from_records(&records, self.matching)
    }
}
