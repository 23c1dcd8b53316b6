use rocket::{serde::json::Json, Route};
use serde::{Deserialize, Serialize};

use crate::model::{division, POSTAL_ABBREVIATIONS};

pub fn routes() -> Vec<Route> {
    routes![states, divisions]
}

/// Division identifiers derived locally from a city and state.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divisions {
    pub ocd_ids: String,
}

/// Codes for the search form's state selector.
#[get("/states")]
pub fn states() -> Json<&'static [&'static str]> {
    Json(&POSTAL_ABBREVIATIONS[..])
}

#[get("/divisions?<city>&<state>")]
pub fn divisions(city: String, state: String) -> Json<Divisions> {
    let ids = division::fallback_identifiers(&city, &state);
    Json(Divisions {
        ocd_ids: division::join_identifiers(&ids),
    })
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client};

    use super::*;

    #[backend_test]
    async fn states_lists_every_code(client: Client) {
        let response = client.get(uri!(states)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let codes = response.into_json::<Vec<String>>().await.unwrap();
        assert_eq!(61, codes.len());
        assert!(codes.iter().any(|code| code == "DC"));
    }

    #[backend_test]
    async fn divisions_normalises_city_and_state(client: Client) {
        let response = client
            .get(uri!(divisions(city = "Staten Island", state = "NY")))
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(
            Some(Divisions {
                ocd_ids: "ocd-division/country:us/state:ny/place:staten_island,ocd-division/country:us/state:ny"
                    .to_string()
            }),
            response.into_json::<Divisions>().await
        );
    }
}
