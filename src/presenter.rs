// Offer presentation: the ranked top-offers view and per-offer trip summaries
use std::fmt;

use thiserror::Error;
use tracing::{error, warn};

use crate::offers::{FlightOffer, OfferEnvelope};

// Error types for presentation
#[derive(Error, Debug)]
pub enum PresentationError {
    // A valid envelope with nothing to show; surfaced as its own display
    // state, not as an error banner
    #[error("No flight offers to present")]
    NoResults,

    // An offer violating the data-model invariants (no itineraries, or an
    // itinerary with no segments). Fails the whole call: a partially broken
    // result set is never displayed.
    #[error("Malformed offer at rank {0}: {1}")]
    MalformedOffer(usize, String),
}

// How many offers the ranked view shows at most
pub const TOP_OFFER_COUNT: usize = 3;

// Presenter configuration
#[derive(Debug, Clone)]
pub struct PresenterConfig {
    // The positional labels below read as if the backend returns offers
    // cheapest-first. That ordering is not part of the backend's contract,
    // so when this is set the presenter compares the displayed totals and
    // logs a warning if they are not ascending. Display is never altered.
    pub check_price_order: bool,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            check_price_order: true,
        }
    }
}

// Position-based display labels for the ranked offers. A display convention,
// not a price guarantee: rank 0 is labeled Cheapest because the backend is
// expected to put its preferred offer first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferLabel {
    Cheapest,
    BestValue,
    Recommended,
}

impl OfferLabel {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            0 => OfferLabel::Cheapest,
            1 => OfferLabel::BestValue,
            _ => OfferLabel::Recommended,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OfferLabel::Cheapest => "Cheapest",
            OfferLabel::BestValue => "Best Value",
            OfferLabel::Recommended => "Recommended",
        }
    }
}

impl fmt::Display for OfferLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// One offer selected for display, with its position, label and summary
#[derive(Debug, Clone)]
pub struct RankedOffer {
    pub offer: FlightOffer,
    pub rank: usize,
    pub label: OfferLabel,
    pub summary: TripSummary,
}

impl RankedOffer {
    // "USD 823.40", exactly as quoted
    pub fn price_label(&self) -> String {
        format!("{} {}", self.offer.price.currency, self.offer.price.total)
    }
}

// Display-ready summary of an offer's first itinerary
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub origin_code: String,
    pub destination_code: String,
    pub stop_count: usize,
    pub carrier_code: String,
    pub flight_number: String,
    pub human_duration: String,
}

impl TripSummary {
    pub fn route_label(&self) -> String {
        format!("{} -> {}", self.origin_code, self.destination_code)
    }

    pub fn stops_label(&self) -> String {
        if self.stop_count == 0 {
            "Nonstop".to_string()
        } else {
            format!("{} stop(s)", self.stop_count)
        }
    }
}

// Humanize an ISO-8601-style duration: strip the leading "PT" marker and
// lowercase the remainder ("PT5H30M" -> "5h30m"). A string without the
// marker is passed through untouched rather than rejected.
pub fn humanize_duration(duration: &str) -> String {
    match duration.strip_prefix("PT") {
        Some(rest) => rest.to_lowercase(),
        None => duration.to_string(),
    }
}

// Offer presenter: turns a response envelope into the ranked display view.
// A pure transformation; safe to reuse across searches.
pub struct OfferPresenter {
    config: PresenterConfig,
}

impl OfferPresenter {
    pub fn new() -> Self {
        Self::with_config(PresenterConfig::default())
    }

    pub fn with_config(config: PresenterConfig) -> Self {
        Self { config }
    }

    // Select the first min(TOP_OFFER_COUNT, len) offers in the order the
    // backend returned them, label them positionally and derive a summary
    // for each. No re-sorting happens here.
    pub fn present(&self, envelope: OfferEnvelope) -> Result<Vec<RankedOffer>, PresentationError> {
        if !envelope.success {
            return Err(PresentationError::NoResults);
        }
        let offers = envelope.data.unwrap_or_default();
        if offers.is_empty() {
            return Err(PresentationError::NoResults);
        }

        if self.config.check_price_order {
            warn_if_not_price_ascending(&offers);
        }

        let mut ranked = Vec::with_capacity(TOP_OFFER_COUNT.min(offers.len()));
        for (rank, offer) in offers.into_iter().take(TOP_OFFER_COUNT).enumerate() {
            let summary = summarize(&offer).map_err(|reason| {
                error!(rank, %reason, "Rejecting offer batch: malformed offer");
                PresentationError::MalformedOffer(rank, reason)
            })?;
            ranked.push(RankedOffer {
                rank,
                label: OfferLabel::for_rank(rank),
                summary,
                offer,
            });
        }
        Ok(ranked)
    }
}

impl Default for OfferPresenter {
    fn default() -> Self {
        Self::new()
    }
}

// Derive the display summary from an offer's first itinerary
fn summarize(offer: &FlightOffer) -> Result<TripSummary, String> {
    let itinerary = offer
        .itineraries
        .first()
        .ok_or_else(|| "offer carries no itineraries".to_string())?;
    let first = itinerary
        .segments
        .first()
        .ok_or_else(|| "itinerary carries no segments".to_string())?;
    let last = itinerary.segments.last().unwrap_or(first);

    Ok(TripSummary {
        origin_code: first.departure.iata_code.clone(),
        destination_code: last.arrival.iata_code.clone(),
        stop_count: itinerary.segments.len() - 1,
        carrier_code: first.carrier_code.clone(),
        flight_number: first.number.clone(),
        human_duration: humanize_duration(&itinerary.duration),
    })
}

// Compare the displayed offers' totals and flag a non-ascending sequence.
// Totals that do not parse as decimals are skipped.
fn warn_if_not_price_ascending(offers: &[FlightOffer]) {
    let totals: Vec<f64> = offers
        .iter()
        .take(TOP_OFFER_COUNT)
        .filter_map(|offer| offer.price.total.parse().ok())
        .collect();
    if totals.len() < 2 {
        return;
    }
    if let Some(position) = totals.windows(2).position(|pair| pair[0] > pair[1]) {
        warn!(
            position,
            "Backend offer order is not price-ascending; positional labels may mislead"
        );
    }
}
