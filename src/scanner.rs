use std::io::Write;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};
use url::Url;

use crate::model::offer::best_offer;
use crate::model::{
    Offer, OfferQuery, OfferQueryBuilder, PriceGraphEntry, PriceGraphQuery, Route, SearchRequest,
};
use crate::session::FlightSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub entries: usize,
    pub deals: usize,
}

/// A best offer priced under its historical low, with its share link.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub offer: Offer,
    pub url: Url,
}

/// Walks the price calendar in order and writes one block per good deal.
///
/// The first session error aborts the scan; blocks already written stay written.
pub fn scan<S, W>(session: &S, request: &SearchRequest, out: &mut W) -> Result<ScanSummary>
where
    S: FlightSession + ?Sized,
    W: Write,
{
    let calendar = session
        .price_graph(&PriceGraphQuery::from(request))
        .context("price calendar query failed")?;

    info!(entries = calendar.len(), "price calendar received");

    let mut summary = ScanSummary {
        entries: calendar.len(),
        deals: 0,
    };

    for entry in &calendar {
        if let Some(deal) = inspect(session, request, entry)? {
            write_deal(out, &deal)?;
            summary.deals += 1;
        }
    }

    out.flush()?;

    Ok(summary)
}

fn inspect<S>(session: &S, request: &SearchRequest, entry: &PriceGraphEntry) -> Result<Option<Deal>>
where
    S: FlightSession + ?Sized,
{
    debug!(
        start = %entry.start_date,
        ret = %entry.return_date,
        price = entry.price,
        "inspecting calendar entry"
    );

    let query = offer_query(request, entry.start_date, entry.return_date, request.route.clone())?;
    let (offers, _) = session.offers(&query).with_context(|| {
        format!(
            "offers query failed for {} {}",
            entry.start_date, entry.return_date
        )
    })?;

    let best = match best_offer(&offers) {
        Some(best) => best,
        None => {
            debug!(start = %entry.start_date, "no priced offers");
            return Ok(None);
        }
    };

    // The range is only known per airport pair, whatever the original route kind.
    let best_query = offer_query(request, best.start_date, best.return_date, best.route())?;
    let (_, range) = session.offers(&best_query).with_context(|| {
        format!(
            "price range query failed for {}-{} {}",
            best.src_airport_code, best.dst_airport_code, best.start_date
        )
    })?;
    let range = range.ok_or_else(|| {
        anyhow!(
            "missing price range for {}-{} {}",
            best.src_airport_code,
            best.dst_airport_code,
            best.start_date
        )
    })?;

    if !best.is_good_deal(&range) {
        debug!(price = best.price, low = range.low, "not under the historical low");
        return Ok(None);
    }

    let url = session
        .serialize_url(&best_query)
        .context("unable to build share link")?;

    info!(price = best.price, low = range.low, %url, "good deal");

    Ok(Some(Deal {
        offer: best.clone(),
        url,
    }))
}

fn offer_query(
    request: &SearchRequest,
    date: NaiveDate,
    return_date: NaiveDate,
    route: Route,
) -> Result<OfferQuery> {
    Ok(OfferQueryBuilder::default()
        .date(date)
        .return_date(return_date)
        .route(route)
        .options(request.options.clone())
        .build()?)
}

pub fn write_deal<W: Write>(out: &mut W, deal: &Deal) -> std::io::Result<()> {
    writeln!(out, "{} {}", deal.offer.start_date, deal.offer.return_date)?;
    writeln!(out, "price {}", deal.offer.whole_price())?;
    writeln!(out, "{}", deal.url)
}
