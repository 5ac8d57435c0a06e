//! Consumer-facing fetch controller
//!
//! Bridges the API client and the UI: fetches run as background tasks that
//! report back over a channel, while the controller tracks a single
//! `idle -> loading -> (success | error)` lifecycle for the current request.
//! A generation counter implements supersession: issuing a new fetch while
//! one is pending invalidates the old one, and its eventual result is
//! discarded silently instead of overwriting newer state.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{ApiError, EnemApiClient, QuestionsQuery, RateLimitInfo};
use crate::data::{Discipline, PageMetadata, Question, QuestionsPage};

/// Cap on the number of requests a single auto-paginating search may issue
pub const MAX_SEARCH_REQUESTS: u32 = 10;

/// Matching questions after which an auto-paginating search stops early
pub const SEARCH_TARGET: usize = 20;

/// What a finished fetch produced
#[derive(Debug)]
pub enum FetchPayload {
    /// A page of questions (plain fetch or accumulated search result)
    Page(QuestionsPage),
    /// A single question looked up by year and index
    Single(Question),
}

/// Lifecycle of the controller's current fetch
///
/// Returns to `Idle` only on explicit reset; a new fetch while `Loading`
/// supersedes the pending one.
#[derive(Debug)]
pub enum FetchState {
    /// No fetch issued since construction or the last reset
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch finished with a payload
    Success(FetchPayload),
    /// The latest fetch failed
    Error(ApiError),
}

impl FetchState {
    /// Returns true while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Returns the page payload of a successful fetch, if that is what the
    /// latest fetch produced.
    #[allow(dead_code)]
    pub fn page(&self) -> Option<&QuestionsPage> {
        match self {
            FetchState::Success(FetchPayload::Page(page)) => Some(page),
            _ => None,
        }
    }

    /// Returns the single-question payload of a successful fetch, if any.
    #[allow(dead_code)]
    pub fn single(&self) -> Option<&Question> {
        match self {
            FetchState::Success(FetchPayload::Single(question)) => Some(question),
            _ => None,
        }
    }

    /// Returns the error of a failed fetch, if any.
    #[allow(dead_code)]
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            FetchState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// A finished fetch tagged with the generation that issued it
#[derive(Debug)]
struct Delivery {
    generation: u64,
    result: Result<FetchPayload, ApiError>,
}

/// Handle a background fetch task uses to report its outcome
///
/// Captures the generation at issue time; the controller compares it against
/// the latest issued generation before committing, so a superseded task's
/// outcome goes nowhere.
#[derive(Debug)]
struct FetchTicket {
    generation: u64,
    tx: mpsc::Sender<Delivery>,
}

impl FetchTicket {
    /// Reports the outcome of the fetch this ticket was issued for.
    async fn deliver(self, result: Result<FetchPayload, ApiError>) {
        let _ = self
            .tx
            .send(Delivery {
                generation: self.generation,
                result,
            })
            .await;
    }
}

/// Controller driving question fetches for one consumer
///
/// Owns the fetch state machine and the supersession bookkeeping. All
/// mutation happens in the consumer's task: background fetches only ever
/// send messages, committed by [`poll`](QuestionsController::poll).
#[derive(Debug)]
pub struct QuestionsController {
    /// Shared API client performing the actual requests
    client: Arc<EnemApiClient>,
    /// Current fetch lifecycle state
    state: FetchState,
    /// Generation of the most recently issued fetch
    generation: u64,
    /// Sender cloned into fetch tickets
    tx: mpsc::Sender<Delivery>,
    /// Receiver drained by `poll`
    rx: mpsc::Receiver<Delivery>,
}

impl QuestionsController {
    /// Creates a controller on top of a shared API client.
    pub fn new(client: Arc<EnemApiClient>) -> Self {
        let (tx, rx) = mpsc::channel(16);
        Self {
            client,
            state: FetchState::Idle,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Returns the current fetch state.
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Returns true while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Starts fetching a page of questions, superseding any pending fetch.
    pub fn fetch_questions(&mut self, query: QuestionsQuery) {
        let (ticket, client) = self.begin();
        tokio::spawn(async move {
            let result = client.get_questions(&query).await.map(FetchPayload::Page);
            ticket.deliver(result).await;
        });
    }

    /// Starts fetching a single question, superseding any pending fetch.
    pub fn fetch_question(&mut self, year: String, index: u32) {
        let (ticket, client) = self.begin();
        tokio::spawn(async move {
            let result = client
                .get_question(&year, index)
                .await
                .map(FetchPayload::Single);
            ticket.deliver(result).await;
        });
    }

    /// Starts an auto-paginating search, superseding any pending fetch.
    ///
    /// Pages are fetched with increasing offsets until enough questions
    /// matching the query's discipline filter have accumulated, the provider
    /// runs out of pages, or the request cap is hit (see
    /// [`collect_questions`]).
    pub fn search_questions(&mut self, query: QuestionsQuery) {
        let (ticket, client) = self.begin();
        tokio::spawn(async move {
            let result = collect_questions(&client, query)
                .await
                .map(FetchPayload::Page);
            ticket.deliver(result).await;
        });
    }

    /// Commits any finished fetches. Returns true when the state changed.
    ///
    /// Outcomes from superseded fetches are discarded without touching the
    /// state: they are not errors and are never delivered.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(delivery) = self.rx.try_recv() {
            if delivery.generation != self.generation {
                continue;
            }
            self.state = match delivery.result {
                Ok(payload) => FetchState::Success(payload),
                Err(err) => FetchState::Error(err),
            };
            changed = true;
        }
        changed
    }

    /// Returns to `Idle`, invalidating any in-flight fetch.
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = FetchState::Idle;
    }

    /// Drops every cached response held by the underlying client.
    pub fn clear_cache(&self) {
        self.client.clear_cache();
    }

    /// Returns the latest rate-limit snapshot seen by the client.
    pub fn rate_limit(&self) -> Option<RateLimitInfo> {
        self.client.rate_limit()
    }

    /// Issues a new generation, marks the state loading, and hands out the
    /// ticket the background task will deliver through.
    fn begin(&mut self) -> (FetchTicket, Arc<EnemApiClient>) {
        self.generation += 1;
        self.state = FetchState::Loading;
        (
            FetchTicket {
                generation: self.generation,
                tx: self.tx.clone(),
            },
            Arc::clone(&self.client),
        )
    }
}

/// Progress bookkeeping of an auto-paginating search
///
/// Pure state: records pages and decides whether to keep going, so the halt
/// conditions are testable without a network. With a discipline filter only
/// matching questions count toward the target; every fetched question is
/// kept in arrival order regardless.
#[derive(Debug)]
pub struct SearchProgress {
    /// Discipline whose questions count toward the target, if any
    discipline: Option<Discipline>,
    /// Everything fetched so far, in arrival order
    questions: Vec<Question>,
    /// Questions counted toward the target so far
    matched: usize,
    /// Requests issued so far
    requests: u32,
    /// Offset the next request should use
    next_offset: u32,
    /// Whether the provider reported no more pages
    exhausted: bool,
    /// Metadata of the most recent page
    last_metadata: Option<PageMetadata>,
}

impl SearchProgress {
    /// Creates progress state for a search starting at the query's offset.
    pub fn new(query: &QuestionsQuery) -> Self {
        Self {
            discipline: query.discipline,
            questions: Vec::new(),
            matched: 0,
            requests: 0,
            next_offset: query.offset,
            exhausted: false,
            last_metadata: None,
        }
    }

    /// Records one fetched page and advances the offset past it.
    pub fn record_page(&mut self, page: QuestionsPage) {
        self.requests += 1;
        self.next_offset = page.metadata.offset + page.questions.len() as u32;
        self.exhausted = !page.metadata.has_more;
        self.matched += match self.discipline {
            Some(discipline) => page
                .questions
                .iter()
                .filter(|q| q.discipline == discipline.as_str())
                .count(),
            None => page.questions.len(),
        };
        self.last_metadata = Some(page.metadata.clone());
        self.questions.extend(page.questions);
    }

    /// Whether another page should be fetched.
    ///
    /// False as soon as the request cap is reached, the provider has no more
    /// pages, or enough matching questions were accumulated. The cap is
    /// mandatory: without it a sparse filter could poll indefinitely.
    pub fn should_continue(&self) -> bool {
        self.requests < MAX_SEARCH_REQUESTS
            && !self.exhausted
            && self.matched < SEARCH_TARGET
    }

    /// Requests issued so far.
    #[allow(dead_code)]
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Questions counted toward the target so far.
    #[allow(dead_code)]
    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Offset the next request would use.
    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    /// Consumes the progress into one accumulated page.
    ///
    /// The metadata of the last fetched page is kept so `has_more` and
    /// `total` still describe the provider's view of the query.
    pub fn into_page(self) -> QuestionsPage {
        QuestionsPage {
            metadata: self.last_metadata.unwrap_or(PageMetadata {
                limit: 0,
                offset: 0,
                total: 0,
                has_more: false,
            }),
            questions: self.questions,
        }
    }
}

/// Fetches pages until the search halt conditions trigger.
///
/// Stops when [`SEARCH_TARGET`] matching questions accumulated, the provider
/// reports no further pages, or [`MAX_SEARCH_REQUESTS`] requests were issued,
/// whichever comes first. Any page-level error aborts the whole search.
pub async fn collect_questions(
    client: &EnemApiClient,
    query: QuestionsQuery,
) -> Result<QuestionsPage, ApiError> {
    let mut progress = SearchProgress::new(&query);

    loop {
        let page_query = query.clone().with_offset(progress.next_offset());
        let page = client.get_questions(&page_query).await?;
        progress.record_page(page);
        if !progress.should_continue() {
            break;
        }
    }

    Ok(progress.into_page())
}
