//! Application state management for the ENEM question-bank browser
//!
//! This module contains the main application state, handling keyboard input,
//! fetch lifecycle updates from the controller, and state transitions
//! between the list and question-resolution views.

use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::api::{EnemApiClient, QuestionsQuery};
use crate::cli::StartupConfig;
use crate::controller::{FetchPayload, FetchState, QuestionsController};
use crate::data::{sample_page, Discipline, Language, PageMetadata, Question, QuestionsPage};

/// Years the `y` key cycles through
const YEARS: [&str; 4] = ["2023", "2022", "2021", "2020"];

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching the first page
    Loading,
    /// List view showing the fetched questions
    QuestionList,
    /// Resolution view for the question at this list position
    QuestionDetail(usize),
}

/// What `poll_fetches` committed this tick
enum Committed {
    Page(QuestionsPage),
    Single(Question),
    Error(String, Option<u16>),
    Nothing,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Index of currently selected question in list view
    pub selected_index: usize,
    /// Questions currently shown in the list
    pub questions: Vec<Question>,
    /// Pagination metadata of the last committed page
    pub metadata: Option<PageMetadata>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Query driving the next fetch
    pub query: QuestionsQuery,
    /// Whether fetches run the auto-paginating search
    pub auto_search: bool,
    /// Whether the list currently shows the built-in sample questions
    pub using_sample_data: bool,
    /// Message of the last failed fetch, cleared on success
    pub last_error: Option<String>,
    /// HTTP status of the last failed fetch, when the failure had one
    pub last_error_status: Option<u16>,
    /// Timestamp of last successful data refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for the question detail view
    pub detail_scroll_offset: u16,
    /// Alternative picked in the detail view, as an index into alternatives
    pub selected_answer: Option<usize>,
    /// Whether the correct answer is revealed in the detail view
    pub answer_revealed: bool,
    /// Fetch controller owning the in-flight request
    controller: QuestionsController,
}

impl App {
    /// Creates a new App instance with default state
    pub fn new() -> Self {
        Self::with_startup_config(StartupConfig::default())
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// CLI filters become the initial query; `--search` switches the initial
    /// load to the auto-paginating search.
    pub fn with_startup_config(config: StartupConfig) -> Self {
        let client = Arc::new(EnemApiClient::default());
        Self {
            state: AppState::Loading,
            selected_index: 0,
            questions: Vec::new(),
            metadata: None,
            should_quit: false,
            query: config.query,
            auto_search: config.auto_search,
            using_sample_data: false,
            last_error: None,
            last_error_status: None,
            last_refresh: None,
            show_help: false,
            detail_scroll_offset: 0,
            selected_answer: None,
            answer_revealed: false,
            controller: QuestionsController::new(client),
        }
    }

    /// Returns the number of questions in the list
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Returns the currently selected question, if any
    pub fn selected_question(&self) -> Option<&Question> {
        self.questions.get(self.selected_index)
    }

    /// Returns true while a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    /// Returns the latest rate-limit snapshot, if any response carried one
    pub fn rate_limit(&self) -> Option<crate::api::RateLimitInfo> {
        self.controller.rate_limit()
    }

    /// Issues the initial fetch for the startup query
    pub fn start_initial_load(&mut self) {
        self.issue_fetch();
    }

    /// Starts a fetch for the current query, superseding any pending one
    fn issue_fetch(&mut self) {
        if self.auto_search {
            self.controller.search_questions(self.query.clone());
        } else {
            self.controller.fetch_questions(self.query.clone());
        }
    }

    /// Commits finished fetches into the app state.
    ///
    /// Returns true when something changed and the UI should redraw.
    pub fn poll_fetches(&mut self) -> bool {
        if !self.controller.poll() {
            return false;
        }

        let committed = match self.controller.state() {
            FetchState::Success(FetchPayload::Page(page)) => Committed::Page(page.clone()),
            FetchState::Success(FetchPayload::Single(question)) => {
                Committed::Single(question.clone())
            }
            FetchState::Error(err) => Committed::Error(err.to_string(), err.status()),
            _ => Committed::Nothing,
        };

        match committed {
            Committed::Page(page) => self.apply_page(page),
            Committed::Single(question) => self.apply_question(question),
            Committed::Error(message, status) => self.apply_error(message, status),
            Committed::Nothing => {}
        }
        true
    }

    /// Replaces the question list with a freshly fetched page
    fn apply_page(&mut self, page: QuestionsPage) {
        self.questions = page.questions;
        self.metadata = Some(page.metadata);
        self.using_sample_data = false;
        self.last_error = None;
        self.last_error_status = None;
        self.last_refresh = Some(Local::now());

        if self.selected_index >= self.questions.len() {
            self.selected_index = 0;
        }
        match self.state {
            AppState::Loading => self.state = AppState::QuestionList,
            AppState::QuestionDetail(index) if index >= self.questions.len() => {
                self.reset_detail_state();
                self.state = AppState::QuestionList;
            }
            _ => {}
        }
    }

    /// Replaces the question shown in the detail view with a fresh copy
    fn apply_question(&mut self, question: Question) {
        if let AppState::QuestionDetail(index) = self.state {
            if let Some(slot) = self.questions.get_mut(index) {
                *slot = question;
                self.last_refresh = Some(Local::now());
            }
        }
    }

    /// Records a failed fetch and falls back to sample data when the list
    /// would otherwise be empty
    fn apply_error(&mut self, message: String, status: Option<u16>) {
        self.last_error = Some(message);
        self.last_error_status = status;

        if self.questions.is_empty() {
            let page = sample_page();
            self.questions = page.questions;
            self.metadata = Some(page.metadata);
            self.using_sample_data = true;
        }
        if self.state == AppState::Loading {
            self.state = AppState::QuestionList;
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (any view); `Esc` quits from the list, goes back elsewhere
    /// - `Up`/`k`, `Down`/`j`: Move selection / scroll
    /// - `Enter`: Open question (list) or reveal answer (detail)
    /// - `1`-`4`/`0`: Set or clear the discipline filter
    /// - `y`: Cycle exam year; `l`: Cycle language filter
    /// - `r`: Refetch; `s`: Auto-paginating search; `c`: Clear response cache
    /// - `a`-`e`: Pick an alternative (detail view)
    /// - `n`/`p`: Next/previous question (detail view); `f`: Refetch question
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys while shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::QuestionList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if self.selected_question().is_some() {
                        self.reset_detail_state();
                        self.state = AppState::QuestionDetail(self.selected_index);
                    }
                }
                KeyCode::Char('1') => self.set_discipline(Some(Discipline::Matematica)),
                KeyCode::Char('2') => self.set_discipline(Some(Discipline::Linguagens)),
                KeyCode::Char('3') => self.set_discipline(Some(Discipline::Humanas)),
                KeyCode::Char('4') => self.set_discipline(Some(Discipline::Natureza)),
                KeyCode::Char('0') => self.set_discipline(None),
                KeyCode::Char('y') => {
                    self.cycle_year();
                    self.issue_fetch();
                }
                KeyCode::Char('l') => {
                    self.cycle_language();
                    self.issue_fetch();
                }
                KeyCode::Char('r') => {
                    self.issue_fetch();
                }
                KeyCode::Char('s') => {
                    self.auto_search = true;
                    self.issue_fetch();
                }
                KeyCode::Char('c') => {
                    self.controller.clear_cache();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::QuestionDetail(index) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.reset_detail_state();
                    self.state = AppState::QuestionList;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.scroll_down();
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.scroll_up();
                }
                KeyCode::Char('g') => {
                    self.detail_scroll_offset = 0;
                }
                KeyCode::Char('G') => {
                    self.scroll_to_bottom();
                }
                KeyCode::Char(c @ 'a'..='e') => {
                    self.select_answer((c as u8 - b'a') as usize);
                }
                KeyCode::Enter => {
                    self.reveal_answer();
                }
                KeyCode::Char('n') => {
                    self.open_question(index + 1);
                }
                KeyCode::Char('p') => {
                    if index > 0 {
                        self.open_question(index - 1);
                    }
                }
                KeyCode::Char('f') => {
                    self.refetch_current_question();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.question_count();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.question_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Sets the discipline filter and refetches from page zero
    fn set_discipline(&mut self, discipline: Option<Discipline>) {
        self.query.discipline = discipline;
        self.query.offset = 0;
        self.selected_index = 0;
        self.issue_fetch();
    }

    /// Advances the exam year to the next one in the cycle
    fn cycle_year(&mut self) {
        let position = YEARS.iter().position(|y| *y == self.query.year);
        let next = match position {
            Some(i) => YEARS[(i + 1) % YEARS.len()],
            None => YEARS[0],
        };
        self.query.year = next.to_string();
        self.query.offset = 0;
        self.selected_index = 0;
    }

    /// Cycles the language filter: none -> ingles -> espanhol -> none
    fn cycle_language(&mut self) {
        self.query.language = match self.query.language {
            None => Some(Language::Ingles),
            Some(Language::Ingles) => Some(Language::Espanhol),
            Some(Language::Espanhol) => None,
        };
        self.query.offset = 0;
        self.selected_index = 0;
    }

    /// Opens the question at the given list position in the detail view
    fn open_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.reset_detail_state();
            self.selected_index = index;
            self.state = AppState::QuestionDetail(index);
        }
    }

    /// Refetches the question shown in the detail view from the provider
    fn refetch_current_question(&mut self) {
        if let AppState::QuestionDetail(index) = self.state {
            if let Some(question) = self.questions.get(index) {
                self.controller
                    .fetch_question(question.year.to_string(), question.index);
            }
        }
    }

    /// Picks an alternative in the detail view.
    ///
    /// Ignored once the answer is revealed or when the letter is out of
    /// range for the question.
    fn select_answer(&mut self, position: usize) {
        if self.answer_revealed {
            return;
        }
        if let AppState::QuestionDetail(index) = self.state {
            if let Some(question) = self.questions.get(index) {
                if position < question.alternatives.len() {
                    self.selected_answer = Some(position);
                }
            }
        }
    }

    /// Reveals the correct answer once an alternative was picked
    fn reveal_answer(&mut self) {
        if self.selected_answer.is_some() {
            self.answer_revealed = true;
        }
    }

    /// Scrolls up in the detail view, stopping at 0
    fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the detail view up to a renderer-clamped maximum
    fn scroll_down(&mut self) {
        const MAX_SCROLL: u16 = 100;
        if self.detail_scroll_offset < MAX_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }

    /// Scrolls to the bottom; the renderer clamps to actual content height
    fn scroll_to_bottom(&mut self) {
        self.detail_scroll_offset = 100;
    }

    /// Resets detail view state when navigating between questions
    fn reset_detail_state(&mut self) {
        self.detail_scroll_offset = 0;
        self.selected_answer = None;
        self.answer_revealed = false;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
