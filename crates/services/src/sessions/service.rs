use chrono::{DateTime, Utc};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use wonder_core::model::{Question, QuizResult};
use wonder_core::{
    Advance, AnswerOutcome, Countdown, CountdownState, CountdownTick, RoundController, RoundState,
};

use crate::error::SessionError;
use crate::sources::Topic;

/// Receives every countdown value, starting with the full duration.
pub type TickObserver = Arc<dyn Fn(u32) + Send + Sync>;

/// What one elapsed second did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTick {
    Idle,
    Ticked(u32),
    /// The countdown hit zero and closed the current question.
    TimedOut(AnswerOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz or Nature Lab run: the round state machine plus its countdown.
///
/// Answering and expiring both go through `&mut self`, and each stops the
/// countdown in the same call that closes the question, so exactly one of them
/// wins for any index.
pub struct QuizSession {
    topic: Topic,
    round: RoundController,
    countdown: Countdown,
    seconds_per_question: NonZeroU32,
    started_at: DateTime<Utc>,
    result: Option<QuizResult>,
    recorded: bool,
    observer: Option<TickObserver>,
}

impl QuizSession {
    /// A countdown always has at least one second, so every question can time out.
    #[must_use]
    pub fn new(topic: Topic, seconds_per_question: NonZeroU32, started_at: DateTime<Utc>) -> Self {
        let round = RoundController::new(topic.activity(), topic.label());
        Self {
            topic,
            round,
            countdown: Countdown::new(),
            seconds_per_question,
            started_at,
            result: None,
            recorded: false,
            observer: None,
        }
    }

    /// Forward countdown values to `observer` from the next question on.
    pub fn set_tick_observer(&mut self, observer: TickObserver) {
        self.observer = Some(observer);
    }

    /// Install questions and start the first countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` if the session was already loaded.
    pub fn load(&mut self, questions: Vec<Question>) -> Result<RoundState, SessionError> {
        let state = self.round.load(questions)?;
        if matches!(state, RoundState::Presenting(_)) {
            self.start_countdown();
        }
        Ok(state)
    }

    /// The source failed: finish without presenting anything.
    pub fn load_failed(&mut self) {
        self.round.load_failed();
    }

    /// Answer the open question and stop its countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` when no question is open or the answer is
    /// not one of its options.
    pub fn select(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        let outcome = self.round.select(answer)?.clone();
        self.countdown.stop();
        Ok(outcome)
    }

    /// Advance the countdown by one second, timing the question out at zero.
    pub fn tick(&mut self) -> SessionTick {
        let tick = self.countdown.tick();
        self.resolve_tick(tick)
    }

    /// [`QuizSession::tick`] that ignores ticks from an earlier question's countdown.
    pub fn tick_generation(&mut self, generation: u64) -> SessionTick {
        let tick = self.countdown.tick_generation(generation);
        self.resolve_tick(tick)
    }

    /// Move on after an answered question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` if the current question is still open or
    /// the session already finished.
    pub fn advance(&mut self, finished_at: DateTime<Utc>) -> Result<Advance, SessionError> {
        let step = self.round.advance(finished_at)?;
        match &step {
            Advance::Next(_) => self.start_countdown(),
            Advance::Finished(result) => self.result = Some(result.clone()),
        }
        Ok(step)
    }

    /// Stop the countdown for good (the user navigated away).
    pub fn abandon(&mut self) {
        self.countdown.stop();
    }

    pub(crate) fn mark_recorded(&mut self) {
        self.recorded = true;
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.round.state()
    }

    #[must_use]
    pub fn round(&self) -> &RoundController {
        &self.round
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.round.current_question()
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.round.last_outcome()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.round.score()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.round.total()
    }

    #[must_use]
    pub fn countdown(&self) -> CountdownState {
        self.countdown.state()
    }

    #[must_use]
    pub fn countdown_generation(&self) -> u64 {
        self.countdown.generation()
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question.get()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.round.is_finished()
    }

    /// Finished without presenting any question.
    #[must_use]
    pub fn is_empty_finish(&self) -> bool {
        self.round.state() == RoundState::FinishedEmpty
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Whether the result has been written to history.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    fn start_countdown(&mut self) {
        match self.observer.clone() {
            Some(observer) => {
                self.countdown
                    .start(self.seconds_per_question.get(), move |s| observer(s), || {});
            }
            None => {
                self.countdown.start_quiet(self.seconds_per_question.get());
            }
        }
    }

    fn resolve_tick(&mut self, tick: CountdownTick) -> SessionTick {
        match tick {
            CountdownTick::Idle => SessionTick::Idle,
            CountdownTick::Ticked(remaining) => SessionTick::Ticked(remaining),
            CountdownTick::Expired => match self.round.expire() {
                Ok(outcome) => SessionTick::TimedOut(outcome.clone()),
                Err(_) => SessionTick::Idle,
            },
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("topic", &self.topic)
            .field("state", &self.round.state())
            .field("score", &self.round.score())
            .field("countdown", &self.countdown.state())
            .field("recorded", &self.recorded)
            .finish_non_exhaustive()
    }
}
