//! Drives a [`QuizSession`] on a background task with a one-second ticker.
//!
//! The task owns the session outright. Commands from the UI and ticks from the
//! interval are handled one at a time inside a single `select!`, so an answer
//! and an expiry for the same question can never both land.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use wonder_core::model::{QuizResult, Specimen};
use wonder_core::{Advance, AnswerOutcome};

use super::service::{QuizSession, SessionTick};
use super::workflow::QuizLoopService;
use crate::error::SessionError;
use crate::sources::{QuestionSource, Topic};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerCommand {
    Select(String),
    Advance,
    Cancel,
}

/// Question as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedQuestion {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub seconds: u32,
    pub specimen: Option<Specimen>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    Presented(PresentedQuestion),
    Tick { remaining: u32 },
    Answered { outcome: AnswerOutcome, score: u32 },
    /// `result` is `None` when no question was ever presented.
    Finished { result: Option<QuizResult>, recorded: bool },
    Rejected(String),
}

/// Command side of a running session. Cheap to clone into event handlers.
#[derive(Debug, Clone)]
pub struct SessionControl {
    commands: mpsc::UnboundedSender<RunnerCommand>,
}

impl SessionControl {
    /// # Errors
    ///
    /// Returns `SessionError::RunnerClosed` once the session task has ended.
    pub fn select(&self, answer: impl Into<String>) -> Result<(), SessionError> {
        self.send(RunnerCommand::Select(answer.into()))
    }

    /// # Errors
    ///
    /// Returns `SessionError::RunnerClosed` once the session task has ended.
    pub fn advance(&self) -> Result<(), SessionError> {
        self.send(RunnerCommand::Advance)
    }

    /// Abandon the session. Nothing is recorded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RunnerClosed` once the session task has ended.
    pub fn cancel(&self) -> Result<(), SessionError> {
        self.send(RunnerCommand::Cancel)
    }

    fn send(&self, command: RunnerCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::RunnerClosed)
    }
}

/// Event side of a running session.
#[derive(Debug)]
pub struct SessionEvents {
    events: mpsc::UnboundedReceiver<RunnerEvent>,
}

impl SessionEvents {
    /// Next event, or `None` after the task has ended and the queue drained.
    pub async fn next_event(&mut self) -> Option<RunnerEvent> {
        self.events.recv().await
    }
}

/// UI side of a running session.
#[derive(Debug)]
pub struct SessionHandle {
    control: SessionControl,
    events: SessionEvents,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// See [`SessionControl::select`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RunnerClosed` once the session task has ended.
    pub fn select(&self, answer: impl Into<String>) -> Result<(), SessionError> {
        self.control.select(answer)
    }

    /// # Errors
    ///
    /// Returns `SessionError::RunnerClosed` once the session task has ended.
    pub fn advance(&self) -> Result<(), SessionError> {
        self.control.advance()
    }

    /// # Errors
    ///
    /// Returns `SessionError::RunnerClosed` once the session task has ended.
    pub fn cancel(&self) -> Result<(), SessionError> {
        self.control.cancel()
    }

    pub async fn next_event(&mut self) -> Option<RunnerEvent> {
        self.events.next_event().await
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }

    /// Separate the command and event halves. The task keeps running.
    #[must_use]
    pub fn split(self) -> (SessionControl, SessionEvents) {
        (self.control, self.events)
    }
}

/// Start `topic` on a new task. Must be called inside a Tokio runtime.
#[must_use]
pub fn spawn_session(
    service: Arc<QuizLoopService>,
    source: Arc<dyn QuestionSource>,
    topic: Topic,
) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(service, source, topic, command_rx, event_tx));
    SessionHandle {
        control: SessionControl {
            commands: command_tx,
        },
        events: SessionEvents { events: event_rx },
        task,
    }
}

async fn run(
    service: Arc<QuizLoopService>,
    source: Arc<dyn QuestionSource>,
    topic: Topic,
    mut commands: mpsc::UnboundedReceiver<RunnerCommand>,
    events: mpsc::UnboundedSender<RunnerEvent>,
) {
    let loaded = tokio::select! {
        session = service.start(source.as_ref(), topic) => Some(session),
        () = wait_for_cancel(&mut commands, &events) => None,
    };
    let Some(mut session) = loaded else {
        tracing::info!("session cancelled while loading");
        return;
    };

    if session.is_finished() {
        emit(&events, RunnerEvent::Finished {
            result: None,
            recorded: false,
        });
        return;
    }
    present(&session, &events);

    let mut ticker = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                None | Some(RunnerCommand::Cancel) => {
                    session.abandon();
                    tracing::info!(topic = %session.topic(), "session abandoned");
                    return;
                }
                Some(RunnerCommand::Select(answer)) => match session.select(&answer) {
                    Ok(outcome) => emit(&events, RunnerEvent::Answered {
                        outcome,
                        score: session.score(),
                    }),
                    Err(err) => emit(&events, RunnerEvent::Rejected(err.to_string())),
                },
                Some(RunnerCommand::Advance) => match service.advance(&mut session).await {
                    Ok(Advance::Next(_)) => {
                        present(&session, &events);
                        ticker.reset();
                    }
                    Ok(Advance::Finished(result)) => {
                        emit(&events, RunnerEvent::Finished {
                            result: Some(result),
                            recorded: true,
                        });
                        return;
                    }
                    Err(SessionError::Storage(_)) => {
                        emit(&events, RunnerEvent::Finished {
                            result: session.result().cloned(),
                            recorded: false,
                        });
                        return;
                    }
                    Err(err) => emit(&events, RunnerEvent::Rejected(err.to_string())),
                },
            },
            _ = ticker.tick() => match session.tick() {
                SessionTick::Idle => {}
                SessionTick::Ticked(remaining) => emit(&events, RunnerEvent::Tick { remaining }),
                SessionTick::TimedOut(outcome) => {
                    emit(&events, RunnerEvent::Tick { remaining: 0 });
                    emit(&events, RunnerEvent::Answered {
                        outcome,
                        score: session.score(),
                    });
                }
            },
        }
    }
}

async fn wait_for_cancel(
    commands: &mut mpsc::UnboundedReceiver<RunnerCommand>,
    events: &mpsc::UnboundedSender<RunnerEvent>,
) {
    loop {
        match commands.recv().await {
            None | Some(RunnerCommand::Cancel) => return,
            Some(_) => emit(events, RunnerEvent::Rejected("questions are still loading".into())),
        }
    }
}

fn present(session: &QuizSession, events: &mpsc::UnboundedSender<RunnerEvent>) {
    let round = session.round();
    let (Some(index), Some(question)) = (round.current_index(), round.current_question()) else {
        return;
    };
    emit(
        events,
        RunnerEvent::Presented(PresentedQuestion {
            index,
            total: round.total() as usize,
            prompt: question.prompt().to_string(),
            options: question.options().to_vec(),
            seconds: session.seconds_per_question(),
            specimen: question.specimen().cloned(),
        }),
    );
    emit(
        events,
        RunnerEvent::Tick {
            remaining: session.countdown().remaining_seconds,
        },
    );
}

fn emit(events: &mpsc::UnboundedSender<RunnerEvent>, event: RunnerEvent) {
    // A dropped receiver also drops the command sender, which ends the loop.
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;
    use storage::repository::{HistoryRepository, InMemoryRepository};
    use wonder_core::model::Question;

    use crate::Clock;
    use crate::sources::StaticQuestionSource;

    const THREE_SECONDS: NonZeroU32 = NonZeroU32::new(3).unwrap();

    fn fixture(n: usize) -> (Arc<QuizLoopService>, Arc<dyn QuestionSource>, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        let service = Arc::new(
            QuizLoopService::new(Clock::system(), repo.clone())
                .with_timers(THREE_SECONDS, THREE_SECONDS),
        );
        let questions = (0..n)
            .map(|i| Question::new(format!("Q{i}"), "right", vec!["right".into(), "wrong".into()]).unwrap())
            .collect();
        (service, Arc::new(StaticQuestionSource::new(questions)), repo)
    }

    async fn expect_presented(handle: &mut SessionHandle) -> PresentedQuestion {
        let Some(RunnerEvent::Presented(q)) = handle.next_event().await else {
            panic!("expected a presented question");
        };
        assert_eq!(handle.next_event().await, Some(RunnerEvent::Tick { remaining: q.seconds }));
        q
    }

    #[tokio::test(start_paused = true)]
    async fn answer_then_advance_to_finish() {
        let (service, source, repo) = fixture(2);
        let mut handle = spawn_session(service, source, Topic::NatureLab);

        let first = expect_presented(&mut handle).await;
        assert_eq!((first.index, first.total), (0, 2));
        handle.select("right").unwrap();
        let Some(RunnerEvent::Answered { outcome, score }) = handle.next_event().await else {
            panic!("expected answer");
        };
        assert!(outcome.correct);
        assert_eq!(score, 1);

        handle.advance().unwrap();
        expect_presented(&mut handle).await;
        handle.select("wrong").unwrap();
        assert!(matches!(handle.next_event().await, Some(RunnerEvent::Answered { score: 1, .. })));
        handle.advance().unwrap();

        let Some(RunnerEvent::Finished { result: Some(result), recorded }) = handle.next_event().await
        else {
            panic!("expected finish");
        };
        assert!(recorded);
        assert_eq!((result.score(), result.total()), (1, 2));
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert_eq!(handle.next_event().await, None);
        assert!(matches!(handle.advance(), Err(SessionError::RunnerClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_times_out_question() {
        let (service, source, _repo) = fixture(1);
        let mut handle = spawn_session(service, source, Topic::NatureLab);
        expect_presented(&mut handle).await;

        for remaining in [2, 1, 0] {
            assert_eq!(handle.next_event().await, Some(RunnerEvent::Tick { remaining }));
        }
        let Some(RunnerEvent::Answered { outcome, score }) = handle.next_event().await else {
            panic!("expected timeout");
        };
        assert!(outcome.timed_out());
        assert_eq!(score, 0);

        handle.select("right").unwrap();
        assert!(matches!(handle.next_event().await, Some(RunnerEvent::Rejected(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_records_nothing() {
        let (service, source, repo) = fixture(3);
        let mut handle = spawn_session(service, source, Topic::NatureLab);
        expect_presented(&mut handle).await;
        handle.select("right").unwrap();
        handle.cancel().unwrap();

        while handle.next_event().await.is_some() {}
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn split_halves_drive_the_session() {
        let (service, source, _repo) = fixture(1);
        let (control, mut events) = spawn_session(service, source, Topic::NatureLab).split();
        assert!(matches!(events.next_event().await, Some(RunnerEvent::Presented(_))));

        let clicker = control.clone();
        clicker.select("wrong").unwrap();
        let mut answered = None;
        while let Some(event) = events.next_event().await {
            if let RunnerEvent::Answered { outcome, .. } = event {
                answered = Some(outcome);
                break;
            }
        }
        assert_eq!(answered.unwrap().selected(), Some("wrong"));
        control.cancel().unwrap();
        while events.next_event().await.is_some() {}
        assert!(matches!(control.select("right"), Err(SessionError::RunnerClosed)));
    }

    #[tokio::test]
    async fn empty_source_finishes_without_result() {
        let (service, _, repo) = fixture(0);
        let source: Arc<dyn QuestionSource> = Arc::new(StaticQuestionSource::default());
        let mut handle = spawn_session(service, source, Topic::NatureLab);
        assert_eq!(
            handle.next_event().await,
            Some(RunnerEvent::Finished {
                result: None,
                recorded: false
            })
        );
        assert!(repo.list().await.unwrap().is_empty());
    }
}
