use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::*;

/// One date pair of the price calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceGraphEntry {
    pub start_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price: f64,
}

/// A priced itinerary. A price of zero means the backend had no fare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub start_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price: f64,
    pub src_airport_code: String,
    pub dst_airport_code: String,
}

impl Offer {
    pub fn has_price(&self) -> bool {
        self.price > 0.0
    }

    /// Strictly under the historical low; unpriced offers never qualify.
    pub fn is_good_deal(&self, range: &PriceRange) -> bool {
        self.has_price() && self.price < range.low
    }

    /// The single airport pair this offer flies, used for follow-up queries.
    pub fn route(&self) -> Route {
        Route::airports(&self.src_airport_code, &self.dst_airport_code)
    }

    pub fn whole_price(&self) -> i64 {
        self.price.trunc() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    #[serde(default)]
    pub high: Option<f64>,
}

/// Lowest strictly-positive price; the first one wins a tie.
pub fn best_offer(offers: &[Offer]) -> Option<&Offer> {
    offers
        .iter()
        .filter(|offer| offer.has_price())
        .min_by(|a, b| a.price.total_cmp(&b.price))
}
