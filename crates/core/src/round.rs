//! Round progression state machine.
//!
//! `RoundController` owns a question list and walks it one question at a time:
//! `Loading -> Presenting(i) -> Answered(i) -> Presenting(i + 1) ... -> Finished`.
//! It has no notion of time; the caller reports a timeout through [`RoundController::expire`].

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{ActivityType, Question, QuizResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("round is still loading")]
    NotLoaded,
    #[error("round already loaded")]
    AlreadyLoaded,
    #[error("no question is awaiting an answer")]
    NotPresenting,
    #[error("current question has not been answered")]
    NotAnswered,
    #[error("round is finished")]
    Finished,
    #[error("not an option for this question: {0}")]
    UnknownOption(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Loading,
    Presenting(usize),
    Answered(usize),
    Finished,
    /// Finished without ever presenting a question (empty or failed load).
    FinishedEmpty,
}

impl RoundState {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, RoundState::Finished | RoundState::FinishedEmpty)
    }
}

/// How the current question was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Selected(String),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub index: usize,
    pub resolution: Resolution,
    pub correct: bool,
    pub correct_answer: String,
}

impl AnswerOutcome {
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Selected(answer) => Some(answer),
            Resolution::TimedOut => None,
        }
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.resolution == Resolution::TimedOut
    }
}

/// Result of moving past an answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    Finished(QuizResult),
}

#[derive(Debug, Clone)]
pub struct RoundController {
    activity: ActivityType,
    label: String,
    questions: Vec<Question>,
    state: RoundState,
    score: u32,
    outcomes: Vec<AnswerOutcome>,
}

impl RoundController {
    /// A controller in `Loading`, waiting for [`RoundController::load`].
    #[must_use]
    pub fn new(activity: ActivityType, label: impl Into<String>) -> Self {
        Self {
            activity,
            label: label.into(),
            questions: Vec::new(),
            state: RoundState::Loading,
            score: 0,
            outcomes: Vec::new(),
        }
    }

    /// Install the question list. An empty list finishes immediately.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::AlreadyLoaded` if called outside `Loading`.
    pub fn load(&mut self, questions: Vec<Question>) -> Result<RoundState, RoundError> {
        if self.state != RoundState::Loading {
            return Err(RoundError::AlreadyLoaded);
        }
        self.state = if questions.is_empty() {
            RoundState::FinishedEmpty
        } else {
            RoundState::Presenting(0)
        };
        self.questions = questions;
        Ok(self.state)
    }

    /// The source failed; nothing will be presented and nothing is recorded.
    pub fn load_failed(&mut self) {
        if self.state == RoundState::Loading {
            self.state = RoundState::FinishedEmpty;
        }
    }

    /// Answer the current question.
    ///
    /// # Errors
    ///
    /// `NotPresenting` when the question is already closed (second click, or the
    /// timer won the race), `UnknownOption` for text that is not an option.
    pub fn select(&mut self, answer: &str) -> Result<&AnswerOutcome, RoundError> {
        let index = self.presenting_index()?;
        let question = &self.questions[index];
        if !question.has_option(answer) {
            return Err(RoundError::UnknownOption(answer.to_string()));
        }
        let correct = question.is_correct(answer);
        Ok(self.close(index, Resolution::Selected(answer.to_string()), correct))
    }

    /// The timer ran out on the current question. Counts as incorrect.
    ///
    /// # Errors
    ///
    /// `NotPresenting` if the question was already answered.
    pub fn expire(&mut self) -> Result<&AnswerOutcome, RoundError> {
        let index = self.presenting_index()?;
        Ok(self.close(index, Resolution::TimedOut, false))
    }

    /// Move past the answered question, producing the result after the last one.
    ///
    /// # Errors
    ///
    /// `NotAnswered` while a question is still open, `Finished` after the end.
    pub fn advance(&mut self, finished_at: DateTime<Utc>) -> Result<Advance, RoundError> {
        match self.state {
            RoundState::Answered(index) if index + 1 < self.questions.len() => {
                self.state = RoundState::Presenting(index + 1);
                Ok(Advance::Next(index + 1))
            }
            RoundState::Answered(_) => {
                self.state = RoundState::Finished;
                let result = QuizResult::new(
                    self.activity,
                    self.label.clone(),
                    self.score,
                    self.total(),
                    finished_at,
                )
                .map_err(|_| RoundError::Finished)?;
                Ok(Advance::Finished(result))
            }
            RoundState::Presenting(_) => Err(RoundError::NotAnswered),
            RoundState::Loading => Err(RoundError::NotLoaded),
            RoundState::Finished | RoundState::FinishedEmpty => Err(RoundError::Finished),
        }
    }

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    #[must_use]
    pub fn activity(&self) -> ActivityType {
        self.activity
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of questions in the session.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    /// Index of the question on screen, open or answered.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            RoundState::Presenting(i) | RoundState::Answered(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index()
            .is_some_and(|i| i + 1 == self.questions.len())
    }

    /// Outcome of the question currently shown as answered.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        match self.state {
            RoundState::Answered(_) => self.outcomes.last(),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    fn presenting_index(&self) -> Result<usize, RoundError> {
        match self.state {
            RoundState::Presenting(index) => Ok(index),
            RoundState::Loading => Err(RoundError::NotLoaded),
            RoundState::Answered(_) => Err(RoundError::NotPresenting),
            RoundState::Finished | RoundState::FinishedEmpty => Err(RoundError::Finished),
        }
    }

    fn close(&mut self, index: usize, resolution: Resolution, correct: bool) -> &AnswerOutcome {
        if correct {
            self.score += 1;
        }
        self.state = RoundState::Answered(index);
        self.outcomes.push(AnswerOutcome {
            index,
            resolution,
            correct,
            correct_answer: self.questions[index].correct_answer().to_string(),
        });
        &self.outcomes[self.outcomes.len() - 1]
    }
}
