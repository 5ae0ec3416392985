use thiserror::Error;
use url::Url;

use crate::model::{Offer, OfferQuery, PriceGraphEntry, PriceGraphQuery, PriceRange};

pub mod http;

pub use http::HttpSession;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("{url} responded with {status}")]
    Status {
        status: reqwest::StatusCode,
        url: Url,
    },

    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Failure reported by a collaborator that does not speak HTTP.
    #[error("backend error: {0}")]
    Backend(String),
}

/// The flight-data backend. Every call blocks until the backend answers.
pub trait FlightSession {
    /// Cheapest price for each date pair inside the query's departure window.
    fn price_graph(&self, query: &PriceGraphQuery) -> Result<Vec<PriceGraphEntry>, SessionError>;

    /// Offers for one date pair, with the historical price range when known.
    fn offers(
        &self,
        query: &OfferQuery,
    ) -> Result<(Vec<Offer>, Option<PriceRange>), SessionError>;

    /// Shareable link that reopens the search for one date pair.
    fn serialize_url(&self, query: &OfferQuery) -> Result<Url, SessionError>;
}
