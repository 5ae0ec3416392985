use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{FlightSession, SessionError};
use crate::model::{
    join_locations, LocationKind, Offer, OfferQuery, PriceGraphEntry, PriceGraphQuery, PriceRange,
    Route, SearchOptions,
};

type Pairs = Vec<(&'static str, String)>;

/// JSON-over-HTTP flight-data backend rooted at `endpoint`.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    offers: Vec<Offer>,
    #[serde(default)]
    price_range: Option<PriceRange>,
}

impl HttpSession {
    pub fn open(endpoint: Url, timeout: Duration) -> Result<Self, SessionError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, path: &str, pairs: &[(&'static str, String)]) -> Result<Url, SessionError> {
        let mut url = self.endpoint.join(path)?;
        url.query_pairs_mut().extend_pairs(pairs.iter());

        Ok(url)
    }

    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, SessionError> {
        debug!(%url, "GET");

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(SessionError::Status { status, url });
        }

        Ok(response.json()?)
    }
}

impl FlightSession for HttpSession {
    fn price_graph(&self, query: &PriceGraphQuery) -> Result<Vec<PriceGraphEntry>, SessionError> {
        let pairs = [
            vec![
                ("range_start_date", query.range_start_date.to_string()),
                ("range_end_date", query.range_end_date.to_string()),
                ("trip_length", query.trip_length.to_string()),
            ],
            route_pairs(&query.route),
            option_pairs(&query.options),
        ]
        .concat();

        self.get(self.url("price-graph", &pairs)?)
    }

    fn offers(
        &self,
        query: &OfferQuery,
    ) -> Result<(Vec<Offer>, Option<PriceRange>), SessionError> {
        let response: OffersResponse = self.get(self.url("offers", &offer_pairs(query))?)?;

        Ok((response.offers, response.price_range))
    }

    fn serialize_url(&self, query: &OfferQuery) -> Result<Url, SessionError> {
        self.url("search", &offer_pairs(query))
    }
}

fn offer_pairs(query: &OfferQuery) -> Pairs {
    [
        vec![
            ("date", query.date.to_string()),
            ("return_date", query.return_date.to_string()),
        ],
        route_pairs(&query.route),
        option_pairs(&query.options),
    ]
    .concat()
}

fn route_pairs(route: &Route) -> Pairs {
    let (src, dst) = match route.kind {
        LocationKind::City => ("src_cities", "dst_cities"),
        LocationKind::Airport => ("src_airports", "dst_airports"),
    };

    vec![
        (src, join_locations(&route.origins)),
        (dst, join_locations(&route.destinations)),
    ]
}

fn option_pairs(options: &SearchOptions) -> Pairs {
    vec![
        ("travelers", options.travelers.to_string()),
        ("class", options.cabin_class.code().to_string()),
        ("trip_type", options.trip_type.code().to_string()),
        ("stops", options.stops.code().to_string()),
        ("currency", options.currency.clone()),
        ("lang", options.language.clone()),
    ]
}

#[cfg(test)]
pub mod test {
    use super::*;

    use crate::model::{case, OfferQueryBuilder};

    fn session(endpoint: &str) -> HttpSession {
        HttpSession::open(
            crate::args::parser::parse_endpoint(endpoint).unwrap(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    fn query() -> OfferQuery {
        let request = case::sfo_jfk();

        OfferQueryBuilder::default()
            .date(request.start_date)
            .return_date(request.end_date)
            .route(request.route)
            .options(request.options)
            .build()
            .unwrap()
    }

    #[test]
    fn serialize_url_encodes_the_date_pair() {
        let url = session("http://flights.local/api").serialize_url(&query()).unwrap();

        assert_eq!(url.path(), "/api/search");
        assert_eq!(
            url.query(),
            Some(
                "date=2024-07-04&return_date=2024-07-11&src_airports=SFO&dst_airports=JFK\
                 &travelers=1&class=1&trip_type=1&stops=0&currency=USD&lang=en"
            )
        );
    }

    #[test]
    fn city_routes_use_city_keys() {
        let request = case::paris_rome();

        let pairs = route_pairs(&request.route);

        assert_eq!(
            pairs,
            vec![
                ("src_cities", "Paris".to_string()),
                ("dst_cities", "Rome,Milan".to_string()),
            ]
        );
    }

    #[test]
    fn offers_response_tolerates_missing_fields() {
        let response: OffersResponse = serde_json::from_str("{}").unwrap();

        assert!(response.offers.is_empty());
        assert!(response.price_range.is_none());
    }

    #[test]
    fn unreachable_backend_is_a_request_error() {
        let error = session("http://127.0.0.1:9/")
            .price_graph(&PriceGraphQuery::from(&case::sfo_jfk()))
            .unwrap_err();

        assert!(matches!(error, SessionError::Request(_)));
    }
}
