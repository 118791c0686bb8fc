//! crates/app_review_core/src/session.rs
//!
//! The session state machine. Every user action and every fetch completion is
//! an `Event`; `SessionState::apply` folds it into the state and returns the
//! fetch, if any, that the caller must now perform.
//!
//! Fetches are tagged with a sequence number when issued. A completion is only
//! applied if it belongs to the most recent request of its kind, so a slow,
//! superseded response can never overwrite newer state.

use tracing::debug;

use crate::cache::PlatformTableCache;
use crate::display::{self, RenderPlan};
use crate::domain::{ErrorInfo, Platform, Record, TableSnapshot, ViewMode};
use crate::ports::AnswerPayload;

//=========================================================================================
// Phases, Events and Effects
//=========================================================================================

/// The coarse phase of the session, as seen by the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    LoadingTable,
    TableReady,
    LoadingAnswer,
    AnswerReady,
    AnswerError,
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Load the table for the active platform (initial page load).
    TableRequested,
    /// The user clicked a platform on the selector.
    PlatformSelected(Platform),
    TableLoaded {
        seq: u64,
        platform: Platform,
        records: Vec<Record>,
    },
    TableFailed {
        seq: u64,
        platform: Platform,
        error: ErrorInfo,
    },
    /// A typed question or a clicked example.
    QuestionSubmitted(String),
    AnswerLoaded {
        seq: u64,
        payload: AnswerPayload,
    },
    AnswerFailed {
        seq: u64,
        error: ErrorInfo,
    },
    /// The retry affordance shown next to an answer error.
    RetryRequested,
    ViewModeChanged(ViewMode),
    /// Full session reset, equivalent to reloading the page.
    Reset,
}

/// A fetch the caller must perform, reporting back with the same `seq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchTable {
        seq: u64,
        platform: Platform,
    },
    FetchAnswer {
        seq: u64,
        question: String,
        platform: Platform,
    },
}

//=========================================================================================
// SessionState
//=========================================================================================

/// The state of one page session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub platform: Platform,
    pub view_mode: ViewMode,
    pub phase: Phase,
    /// True while an answer request is in flight.
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    /// The table shown for the active platform; `None` renders empty.
    pub table: Option<TableSnapshot>,
    pub answer: Option<String>,
    pub answer_table: Option<TableSnapshot>,
    pub last_question: String,
    pub cache: PlatformTableCache,
    home_platform: Platform,
    home_view_mode: ViewMode,
    table_requested: bool,
    next_seq: u64,
    latest_table_seq: Option<u64>,
    latest_answer_seq: Option<u64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Platform::default(), ViewMode::default())
    }
}

impl SessionState {
    /// Creates an idle session. `Reset` returns the session to these values.
    pub fn new(platform: Platform, view_mode: ViewMode) -> Self {
        Self {
            platform,
            view_mode,
            phase: Phase::Idle,
            loading: false,
            error: None,
            table: None,
            answer: None,
            answer_table: None,
            last_question: String::new(),
            cache: PlatformTableCache::new(),
            home_platform: platform,
            home_view_mode: view_mode,
            table_requested: false,
            next_seq: 0,
            latest_table_seq: None,
            latest_answer_seq: None,
        }
    }

    /// Folds one event into the state.
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::TableRequested => self.request_table(),
            Event::PlatformSelected(platform) => {
                if platform == self.platform && self.table_requested {
                    return None;
                }
                self.platform = platform;
                self.request_table()
            }
            Event::TableLoaded {
                seq,
                platform,
                records,
            } => {
                if !self.is_latest(self.latest_table_seq, seq) {
                    debug!(seq, %platform, "Discarding superseded table response.");
                    return None;
                }
                let snapshot = TableSnapshot::adopt(records);
                self.cache.put(platform, snapshot.clone());
                if platform == self.platform {
                    self.table = Some(snapshot);
                }
                self.finish_table_load();
                None
            }
            Event::TableFailed {
                seq,
                platform,
                error,
            } => {
                if !self.is_latest(self.latest_table_seq, seq) {
                    debug!(seq, %platform, "Discarding superseded table failure.");
                    return None;
                }
                self.table = None;
                // The error slot belongs to the in-flight answer while loading;
                // the table pane just stays empty.
                if self.loading {
                    debug!(seq, %platform, "Table failure during answer request: {}", error);
                } else {
                    self.error = Some(error);
                }
                self.finish_table_load();
                None
            }
            Event::QuestionSubmitted(question) => self.submit(question),
            Event::AnswerLoaded { seq, payload } => {
                if !self.is_latest(self.latest_answer_seq, seq) {
                    debug!(seq, "Discarding superseded answer response.");
                    return None;
                }
                self.answer = Some(payload.answer);
                self.answer_table = Some(TableSnapshot::adopt(payload.table));
                self.error = None;
                self.loading = false;
                self.phase = Phase::AnswerReady;
                None
            }
            Event::AnswerFailed { seq, error } => {
                if !self.is_latest(self.latest_answer_seq, seq) {
                    debug!(seq, "Discarding superseded answer failure.");
                    return None;
                }
                self.answer = None;
                self.answer_table = None;
                self.error = Some(error);
                self.loading = false;
                self.phase = Phase::AnswerError;
                None
            }
            Event::RetryRequested => {
                if self.phase != Phase::AnswerError || self.last_question.is_empty() {
                    return None;
                }
                let question = self.last_question.clone();
                self.submit(question)
            }
            Event::ViewModeChanged(view_mode) => {
                self.view_mode = view_mode;
                None
            }
            Event::Reset => {
                // The sequence counter survives so responses from before the
                // reset can never match a new request.
                let next_seq = self.next_seq;
                *self = SessionState::new(self.home_platform, self.home_view_mode);
                self.next_seq = next_seq;
                self.request_table()
            }
        }
    }

    fn request_table(&mut self) -> Option<Effect> {
        self.table_requested = true;
        self.error = None;
        // Issued even on a cache hit, so any older in-flight table fetch is
        // superseded by this request.
        let seq = self.issue_seq();
        self.latest_table_seq = Some(seq);

        if let Some(snapshot) = self.cache.get(self.platform) {
            self.table = Some(snapshot.clone());
            if !self.loading {
                self.phase = Phase::TableReady;
            }
            return None;
        }

        self.table = None;
        if !self.loading {
            self.phase = Phase::LoadingTable;
        }
        Some(Effect::FetchTable {
            seq,
            platform: self.platform,
        })
    }

    fn submit(&mut self, question: String) -> Option<Effect> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        self.last_question = question.to_string();
        self.answer = None;
        self.answer_table = None;
        self.error = None;
        self.loading = true;
        self.phase = Phase::LoadingAnswer;

        let seq = self.issue_seq();
        self.latest_answer_seq = Some(seq);
        Some(Effect::FetchAnswer {
            seq,
            question: self.last_question.clone(),
            platform: self.platform,
        })
    }

    fn finish_table_load(&mut self) {
        if self.phase == Phase::LoadingTable {
            self.phase = Phase::TableReady;
        }
    }

    fn issue_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn is_latest(&self, latest: Option<u64>, seq: u64) -> bool {
        latest == Some(seq)
    }

    //=====================================================================================
    // Views for the render surface
    //=====================================================================================

    /// Example questions are offered until the first question is asked.
    pub fn show_examples(&self) -> bool {
        self.last_question.is_empty()
    }

    /// The answer, if it should currently be displayed.
    pub fn visible_answer(&self) -> Option<&str> {
        if self.loading || self.error.is_some() {
            return None;
        }
        self.answer.as_deref()
    }

    pub fn table_plan(&self) -> RenderPlan {
        plan_for(self.view_mode, self.table.as_ref())
    }

    pub fn answer_table_plan(&self) -> RenderPlan {
        plan_for(self.view_mode, self.answer_table.as_ref())
    }
}

fn plan_for(view_mode: ViewMode, snapshot: Option<&TableSnapshot>) -> RenderPlan {
    snapshot
        .map(|s| display::select(view_mode, s))
        .unwrap_or(RenderPlan::Empty)
}
