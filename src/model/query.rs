use chrono::NaiveDate;
use derive_builder::Builder;

use super::*;

/// Calendar query over a departure window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceGraphQuery {
    pub range_start_date: NaiveDate,
    pub range_end_date: NaiveDate,
    pub trip_length: u32,
    pub route: Route,
    pub options: SearchOptions,
}

impl From<&SearchRequest> for PriceGraphQuery {
    fn from(request: &SearchRequest) -> Self {
        Self {
            range_start_date: request.start_date,
            range_end_date: request.end_date,
            trip_length: request.trip_length,
            route: request.route.clone(),
            options: request.options.clone(),
        }
    }
}

/// Offers, price range, or share link for one date pair.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct OfferQuery {
    pub date: NaiveDate,
    pub return_date: NaiveDate,
    pub route: Route,
    pub options: SearchOptions,
}
