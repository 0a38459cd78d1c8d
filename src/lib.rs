// Main library file for the flight-offer search pipeline

// Export the pipeline stages
pub mod client;
pub mod criteria;
pub mod offers;
pub mod pipeline;
pub mod presenter;

// Re-export key types for convenience
pub use client::{
    ClientConfig, ClientError, ClientStatsReport, FlightSearchApi, HttpSearchClient, RequestError,
};
pub use criteria::SearchCriteria;
pub use offers::{FlightOffer, OfferEnvelope};
pub use pipeline::{
    run_and_track, SearchOutcome, SearchPipeline, SearchResults, SearchSession, SearchState,
};
pub use presenter::{
    OfferLabel, OfferPresenter, PresentationError, PresenterConfig, RankedOffer, TripSummary,
};
