use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};

use log::{debug, warn};
use reqwest::Client;
use rocket::serde::json::Value;

use crate::error::{Error, Result, Upstream};
use crate::model::{AddressInput, JurisdictionIdentifier};

use super::fetch_json;

/// Resolves a mailing address to the civic divisions containing it.
#[derive(Clone)]
pub struct CivicResolver {
    http: Client,
    url: String,
    api_key: String,
}

impl CivicResolver {
    pub fn new(http: Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Ask the civic-information service which divisions `address` lies in.
    pub async fn resolve(&self, address: &AddressInput) -> Result<BTreeSet<JurisdictionIdentifier>> {
        let query = address.to_query();
        let request = self
            .http
            .get(&self.url)
            .query(&[("address", query.as_str()), ("key", self.api_key.as_str())]);

        debug!("Resolving divisions via {}", self.url);
        let body = fetch_json(Upstream::CivicInfo, request).await?;
        let divisions = divisions_from_body(&body)?;
        debug!("Address lies in {} divisions", divisions.len());
        Ok(divisions)
    }
}

/// Keep the API key out of logs.
impl Debug for CivicResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CivicResolver")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// The keys of the `divisions` object are the division identifiers.
fn divisions_from_body(body: &Value) -> Result<BTreeSet<JurisdictionIdentifier>> {
    let divisions = body
        .get("divisions")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            warn!("{} response has no `divisions` object", Upstream::CivicInfo);
            Error::schema(Upstream::CivicInfo, "missing `divisions` object")
        })?;

    Ok(divisions
        .keys()
        .map(|id| JurisdictionIdentifier::from(id.as_str()))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rocket::serde::json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    const PATH: &str = "/civicinfo/v2/representatives";

    fn resolver(server: &MockServer) -> CivicResolver {
        let http = Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        CivicResolver::new(http, format!("{}{PATH}", server.uri()), "test-key")
    }

    #[rocket::async_test]
    async fn returns_division_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .and(query_param("address", "200 E University Ave Gainesville FL 32601"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "normalizedInput": {"city": "Gainesville", "state": "FL", "zip": "32601"},
                "divisions": {
                    "ocd-division/country:us": {"name": "United States"},
                    "ocd-division/country:us/state:fl": {"name": "Florida"},
                    "ocd-division/country:us/state:fl/place:gainesville": {"name": "Gainesville city"}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let divisions = resolver(&server)
            .resolve(&AddressInput::gainesville())
            .await
            .unwrap();

        let expected: BTreeSet<_> = [
            "ocd-division/country:us",
            "ocd-division/country:us/state:fl",
            "ocd-division/country:us/state:fl/place:gainesville",
        ]
        .into_iter()
        .map(JurisdictionIdentifier::from)
        .collect();
        assert_eq!(expected, divisions);
    }

    #[rocket::async_test]
    async fn missing_divisions_is_a_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"offices": []})))
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve(&AddressInput::gainesville())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UpstreamSchema {
                service: Upstream::CivicInfo,
                ..
            }
        ));
    }

    #[rocket::async_test]
    async fn failure_status_is_a_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "Failed to parse address"}
            })))
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve(&AddressInput::gainesville())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamProtocol { .. }));
    }

    #[rocket::async_test]
    async fn malformed_body_is_a_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve(&AddressInput::gainesville())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamProtocol { .. }));
    }

    #[rocket::async_test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"divisions": {}}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = resolver(&server)
            .resolve(&AddressInput::gainesville())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UpstreamUnavailable {
                timed_out: true,
                ..
            }
        ));
        assert_eq!(rocket::http::Status::GatewayTimeout, err.status());
    }

    #[test]
    fn debug_hides_api_key() {
        let resolver = CivicResolver::new(Client::new(), "http://localhost", "sekrit");
        assert!(!format!("{resolver:?}").contains("sekrit"));
    }
}
