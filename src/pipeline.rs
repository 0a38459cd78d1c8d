// Search pipeline: wires the client and presenter together and tracks the
// per-session display state across overlapping searches

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::client::{FlightSearchApi, RequestError};
use crate::criteria::SearchCriteria;
use crate::presenter::{OfferPresenter, PresentationError, RankedOffer};

// Everything a finished search can produce
#[derive(Debug)]
pub enum SearchOutcome {
    Results(SearchResults),
    NoResults,
    RequestFailed(RequestError),
    PresentationFailed(PresentationError),
}

impl SearchOutcome {
    // The display state this outcome maps to
    pub fn into_state(self) -> SearchState {
        match self {
            SearchOutcome::Results(results) => SearchState::Loaded(results),
            SearchOutcome::NoResults => SearchState::NoResults,
            SearchOutcome::RequestFailed(err) => SearchState::Failed(err.to_string()),
            SearchOutcome::PresentationFailed(err) => SearchState::Failed(err.to_string()),
        }
    }
}

// The ranked view plus the full-result count it was cut from
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub total_found: usize,
    pub offers: Vec<RankedOffer>,
}

impl SearchResults {
    pub fn headline(&self) -> String {
        format!("Found {} flights", self.total_found)
    }
}

// Display state of one search session
#[derive(Debug, Clone, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    // A well-formed response with nothing to show; distinct from Failed
    NoResults,
    Failed(String),
    Loaded(SearchResults),
}

// Ticket identifying one started search within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

// Tracks the latest search and its display state. Outcomes apply
// last-writer-wins: completing a superseded ticket leaves the state alone,
// so a slow older search can never overwrite a newer one.
#[derive(Default)]
pub struct SearchSession {
    inner: RwLock<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    generation: u64,
    state: SearchState,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    // Start a new search: bump the generation and move to Loading. Any
    // still-running older search is superseded from this point on.
    pub fn begin(&self) -> SearchTicket {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.state = SearchState::Loading;
        SearchTicket(inner.generation)
    }

    // Apply a finished search's outcome. Returns false, changing nothing,
    // when a newer search has begun since the ticket was issued.
    pub fn complete(&self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        let mut inner = self.inner.write();
        if ticket.0 != inner.generation {
            debug!(
                ticket = ticket.0,
                current = inner.generation,
                "Dropping superseded search result"
            );
            return false;
        }
        inner.state = outcome.into_state();
        true
    }

    pub fn state(&self) -> SearchState {
        self.inner.read().state.clone()
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.inner.read().state, SearchState::Loading)
    }
}

// The retrieval-and-presentation pipeline
pub struct SearchPipeline<A: FlightSearchApi> {
    api: A,
    presenter: OfferPresenter,
}

impl<A: FlightSearchApi> SearchPipeline<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            presenter: OfferPresenter::new(),
        }
    }

    pub fn with_presenter(api: A, presenter: OfferPresenter) -> Self {
        Self { api, presenter }
    }

    // One search end to end: a single request, then presentation. The
    // full-result count is captured before the view is cut to the top few.
    pub async fn run(&self, criteria: SearchCriteria) -> SearchOutcome {
        let envelope = match self.api.search(criteria).await {
            Ok(envelope) => envelope,
            Err(err) => return SearchOutcome::RequestFailed(err),
        };
        let total_found = envelope.offer_count();

        match self.presenter.present(envelope) {
            Ok(offers) => {
                info!(total_found, shown = offers.len(), "Search presented");
                SearchOutcome::Results(SearchResults {
                    total_found,
                    offers,
                })
            }
            Err(PresentationError::NoResults) => {
                info!("Search returned no offers");
                SearchOutcome::NoResults
            }
            Err(err) => SearchOutcome::PresentationFailed(err),
        }
    }
}

// Run one search against a session: begin, run, apply under the ticket.
// Returns whether the outcome was applied (false means superseded).
pub async fn run_and_track<A: FlightSearchApi>(
    pipeline: &SearchPipeline<A>,
    session: &SearchSession,
    criteria: SearchCriteria,
) -> bool {
    let ticket = session.begin();
    let outcome = pipeline.run(criteria).await;
    session.complete(ticket, outcome)
}
