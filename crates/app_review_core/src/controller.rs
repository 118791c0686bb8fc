//! crates/app_review_core/src/controller.rs
//!
//! Drives a `SessionState` against a `ReviewGateway`: user actions are applied
//! to the state, any resulting fetch is performed, and its outcome is applied
//! back as a completion event.
//!
//! The state lock is never held across a network call, so several requests may
//! be in flight at once. Which of them still matters is decided by the
//! sequence numbers inside `SessionState`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{Platform, ViewMode};
use crate::ports::ReviewGateway;
use crate::session::{Effect, Event, SessionState};

pub struct SessionController {
    gateway: Arc<dyn ReviewGateway>,
    state: Mutex<SessionState>,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn ReviewGateway>, state: SessionState) -> Self {
        Self {
            gateway,
            state: Mutex::new(state),
        }
    }

    /// Loads the table for the active platform, from cache when possible.
    pub async fn load_table(&self) {
        self.dispatch(Event::TableRequested).await;
    }

    pub async fn select_platform(&self, platform: Platform) {
        self.dispatch(Event::PlatformSelected(platform)).await;
    }

    pub async fn submit_question(&self, question: impl Into<String>) {
        self.dispatch(Event::QuestionSubmitted(question.into())).await;
    }

    pub async fn retry(&self) {
        self.dispatch(Event::RetryRequested).await;
    }

    pub async fn set_view_mode(&self, view_mode: ViewMode) {
        self.dispatch(Event::ViewModeChanged(view_mode)).await;
    }

    /// Starts over as if the page had been reloaded.
    pub async fn reset(&self) {
        self.dispatch(Event::Reset).await;
    }

    /// A copy of the current state for rendering.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Applies an event and performs the fetch it asks for, if any.
    pub async fn dispatch(&self, event: Event) {
        if let Some(effect) = self.apply(event).await {
            self.perform(effect).await;
        }
    }

    /// Applies an event without performing its fetch.
    ///
    /// Callers that want requests to overlap apply events in order and run
    /// each returned effect with [`SessionController::perform`] on its own task.
    pub async fn apply(&self, event: Event) -> Option<Effect> {
        self.state.lock().await.apply(event)
    }

    /// Performs a fetch and applies its completion.
    pub async fn perform(&self, effect: Effect) {
        let completion = match effect {
            Effect::FetchTable { seq, platform } => {
                info!(%platform, seq, "Fetching review table.");
                match self.gateway.fetch_table(platform).await {
                    Ok(records) => {
                        info!(%platform, seq, rows = records.len(), "Review table loaded.");
                        Event::TableLoaded {
                            seq,
                            platform,
                            records,
                        }
                    }
                    Err(e) => {
                        warn!(%platform, seq, cause = %e.cause, "Review table fetch failed.");
                        Event::TableFailed {
                            seq,
                            platform,
                            error: e.to_error_info(),
                        }
                    }
                }
            }
            Effect::FetchAnswer {
                seq,
                question,
                platform,
            } => {
                info!(%platform, seq, "Submitting question: '{}'", question);
                match self.gateway.fetch_answer(&question, platform).await {
                    Ok(payload) => {
                        info!(%platform, seq, rows = payload.table.len(), "Answer received.");
                        Event::AnswerLoaded { seq, payload }
                    }
                    Err(e) => {
                        warn!(%platform, seq, cause = %e.cause, "Question request failed.");
                        Event::AnswerFailed {
                            seq,
                            error: e.to_error_info(),
                        }
                    }
                }
            }
        };

        // Completions never ask for another fetch.
        if let Some(effect) = self.apply(completion).await {
            debug!(?effect, "Ignoring effect produced by a completion event.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RenderPlan;
    use crate::domain::Record;
    use crate::ports::{AnswerPayload, FetchCause, FetchError, FetchResult};
    use crate::prompts::EXAMPLE_QUESTIONS;
    use crate::session::Phase;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    /// An in-memory gateway that records every call it receives.
    #[derive(Default)]
    struct ScriptedGateway {
        tables: StdMutex<HashMap<Platform, Vec<Record>>>,
        table_calls: StdMutex<Vec<Platform>>,
        answer_calls: StdMutex<Vec<(String, Platform)>>,
        fail_answers: StdMutex<bool>,
        gates: StdMutex<HashMap<String, Arc<Notify>>>,
    }

    impl ScriptedGateway {
        fn with_table(self, platform: Platform, ratings: &[i64]) -> Self {
            let records = ratings
                .iter()
                .map(|r| Record::new().with("Rating", *r))
                .collect();
            self.tables.lock().unwrap().insert(platform, records);
            self
        }

        fn gate(&self, question: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.gates
                .lock()
                .unwrap()
                .insert(question.to_string(), notify.clone());
            notify
        }

        fn table_calls(&self) -> Vec<Platform> {
            self.table_calls.lock().unwrap().clone()
        }

        fn answer_calls(&self) -> Vec<(String, Platform)> {
            self.answer_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReviewGateway for ScriptedGateway {
        async fn fetch_table(&self, platform: Platform) -> FetchResult<Vec<Record>> {
            self.table_calls.lock().unwrap().push(platform);
            let table = self.tables.lock().unwrap().get(&platform).cloned();
            table.ok_or_else(|| {
                FetchError::table(FetchCause::Status {
                    status: 500,
                    detail: "no such blob".into(),
                })
            })
        }

        async fn fetch_answer(
            &self,
            question: &str,
            platform: Platform,
        ) -> FetchResult<AnswerPayload> {
            self.answer_calls
                .lock()
                .unwrap()
                .push((question.to_string(), platform));
            let gate = self.gates.lock().unwrap().get(question).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if *self.fail_answers.lock().unwrap() {
                return Err(FetchError::answer(FetchCause::Transport(
                    "connection reset".into(),
                )));
            }
            Ok(AnswerPayload {
                answer: format!("answer to {}", question),
                table: vec![Record::new().with("Topic", "login")],
            })
        }
    }

    fn controller(gateway: Arc<ScriptedGateway>) -> SessionController {
        SessionController::new(gateway, SessionState::default())
    }

    #[tokio::test]
    async fn repeated_table_loads_hit_the_network_once() {
        let gateway = Arc::new(ScriptedGateway::default().with_table(Platform::Android, &[5, 3]));
        let controller = controller(gateway.clone());

        controller.load_table().await;
        controller.load_table().await;

        assert_eq!(gateway.table_calls(), vec![Platform::Android]);
        let state = controller.state().await;
        assert_eq!(state.phase, Phase::TableReady);
        let ids: Vec<usize> = state
            .table
            .as_ref()
            .map(|t| t.rows().iter().map(|r| r.id).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec![0, 1]);
    }

    #[tokio::test]
    async fn switching_to_an_uncached_platform_fetches_once() {
        let gateway = Arc::new(
            ScriptedGateway::default()
                .with_table(Platform::Android, &[5])
                .with_table(Platform::Ios, &[2, 4]),
        );
        let controller = controller(gateway.clone());
        controller.load_table().await;

        controller.select_platform(Platform::Ios).await;
        assert_eq!(gateway.table_calls(), vec![Platform::Android, Platform::Ios]);

        let state = controller.state().await;
        assert!(state.cache.contains(Platform::Android));
        assert!(state.cache.contains(Platform::Ios));
        assert_eq!(state.table.as_ref().map(|t| t.len()), Some(2));

        // Both platforms are cached now; switching back costs nothing.
        controller.select_platform(Platform::Android).await;
        controller.select_platform(Platform::Ios).await;
        assert_eq!(gateway.table_calls().len(), 2);
    }

    #[tokio::test]
    async fn failed_table_load_is_retried_on_next_switch() {
        let gateway = Arc::new(ScriptedGateway::default().with_table(Platform::Android, &[5]));
        let controller = controller(gateway.clone());
        controller.load_table().await;

        controller.select_platform(Platform::Ios).await;
        let state = controller.state().await;
        assert_eq!(state.phase, Phase::TableReady);
        assert_eq!(state.table_plan(), RenderPlan::Empty);
        assert_eq!(
            state.error.as_ref().map(|e| e.message.as_str()),
            Some("Sorry, we could not load the app review data, please try again.")
        );
        assert!(!state.cache.contains(Platform::Ios));

        controller.select_platform(Platform::Android).await;
        controller.select_platform(Platform::Ios).await;
        assert_eq!(
            gateway.table_calls(),
            vec![Platform::Android, Platform::Ios, Platform::Ios]
        );
    }

    #[tokio::test]
    async fn example_click_produces_an_answer() {
        let gateway = Arc::new(ScriptedGateway::default());
        let controller = controller(gateway.clone());
        assert_eq!(controller.state().await.phase, Phase::Idle);

        let example = EXAMPLE_QUESTIONS[0].question;
        controller.submit_question(example).await;

        assert_eq!(
            gateway.answer_calls(),
            vec![(
                "What are the top 10 topics since 2023-01-01?".to_string(),
                Platform::Android
            )]
        );
        let state = controller.state().await;
        assert_eq!(state.phase, Phase::AnswerReady);
        assert!(!state.loading);
        assert_eq!(
            state.visible_answer(),
            Some("answer to What are the top 10 topics since 2023-01-01?")
        );
        assert_eq!(state.answer_table.as_ref().map(|t| t.len()), Some(1));
        assert!(!state.show_examples());
    }

    #[tokio::test]
    async fn answer_failure_then_retry() {
        let gateway = Arc::new(ScriptedGateway::default());
        *gateway.fail_answers.lock().unwrap() = true;
        let controller = controller(gateway.clone());

        controller.submit_question("What do customer say regarding login issues?").await;
        let state = controller.state().await;
        assert_eq!(state.phase, Phase::AnswerError);
        assert_eq!(
            state.error.as_ref().map(|e| e.message.as_str()),
            Some("Sorry, we could not answer your question, please try again.")
        );

        *gateway.fail_answers.lock().unwrap() = false;
        controller.select_platform(Platform::Ios).await;
        controller.submit_question("What do customer say regarding login issues?").await;
        controller.retry().await;

        // Retry is ignored outside the error phase.
        assert_eq!(gateway.answer_calls().len(), 2);
        assert_eq!(controller.state().await.phase, Phase::AnswerReady);
    }

    #[tokio::test]
    async fn retry_replays_the_last_question() {
        let gateway = Arc::new(ScriptedGateway::default());
        *gateway.fail_answers.lock().unwrap() = true;
        let controller = controller(gateway.clone());

        controller.submit_question("average rating?").await;
        *gateway.fail_answers.lock().unwrap() = false;
        controller.retry().await;

        assert_eq!(
            gateway.answer_calls(),
            vec![
                ("average rating?".to_string(), Platform::Android),
                ("average rating?".to_string(), Platform::Android),
            ]
        );
        assert_eq!(
            controller.state().await.visible_answer(),
            Some("answer to average rating?")
        );
    }

    #[tokio::test]
    async fn late_response_for_a_superseded_question_is_dropped() {
        let gateway = Arc::new(ScriptedGateway::default());
        let slow = gateway.gate("slow question");
        let controller = controller(gateway.clone());

        futures::join!(controller.submit_question("slow question"), async {
            let state = controller.state().await;
            assert_eq!(state.phase, Phase::LoadingAnswer);
            assert!(state.loading);
            assert!(state.answer.is_none());

            controller.submit_question("fast question").await;
            slow.notify_one();
        });

        let state = controller.state().await;
        assert_eq!(gateway.answer_calls().len(), 2);
        assert_eq!(state.answer.as_deref(), Some("answer to fast question"));
        assert_eq!(state.last_question, "fast question");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn apply_shows_loading_before_the_fetch_runs() {
        let gateway = Arc::new(ScriptedGateway::default());
        let controller = controller(gateway.clone());

        let effect = controller.apply(Event::QuestionSubmitted("average rating?".into())).await;
        let state = controller.state().await;
        assert!(state.loading);
        assert!(gateway.answer_calls().is_empty());

        controller.perform(effect.unwrap()).await;
        let state = controller.state().await;
        assert!(!state.loading);
        assert_eq!(state.visible_answer(), Some("answer to average rating?"));
    }

    #[tokio::test]
    async fn reset_clears_cache_and_refetches() {
        let gateway = Arc::new(ScriptedGateway::default().with_table(Platform::Android, &[1]));
        let controller = controller(gateway.clone());
        controller.load_table().await;
        controller.set_view_mode(ViewMode::Cards).await;

        controller.reset().await;

        let state = controller.state().await;
        assert_eq!(gateway.table_calls().len(), 2);
        assert_eq!(state.view_mode, ViewMode::Table);
        assert!(matches!(state.table_plan(), RenderPlan::TableView { .. }));
    }
}
