use services::sessions::LOAD_FAILED_MESSAGE;
use services::{PresentedQuestion, RunnerEvent, Topic};
use wonder_core::model::{QuizResult, Specimen};
use wonder_core::{AnswerOutcome, Resolution};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Question,
    Feedback,
    Finished,
    /// Finished without a single question (source failure or empty pool).
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    None,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub mark: OptionMark,
    pub disabled: bool,
}

impl OptionVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.mark {
            OptionMark::None => "quiz-option-btn",
            OptionMark::Correct => "quiz-option-btn correct",
            OptionMark::Incorrect => "quiz-option-btn incorrect",
        }
    }
}

/// Reduces runner events into what the quiz screen shows.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    title: String,
    nature_lab: bool,
    phase: QuizPhase,
    question: Option<PresentedQuestion>,
    remaining: u32,
    score: u32,
    outcome: Option<AnswerOutcome>,
    result: Option<QuizResult>,
    recorded: bool,
    notice: Option<String>,
}

impl QuizVm {
    #[must_use]
    pub fn new(topic: &Topic) -> Self {
        Self {
            title: topic.label().to_string(),
            nature_lab: matches!(topic, Topic::NatureLab),
            phase: QuizPhase::Loading,
            question: None,
            remaining: 0,
            score: 0,
            outcome: None,
            result: None,
            recorded: false,
            notice: None,
        }
    }

    pub fn apply(&mut self, event: RunnerEvent) {
        match event {
            RunnerEvent::Presented(question) => {
                self.remaining = question.seconds;
                self.question = Some(question);
                self.outcome = None;
                self.notice = None;
                self.phase = QuizPhase::Question;
            }
            RunnerEvent::Tick { remaining } => self.remaining = remaining,
            RunnerEvent::Answered { outcome, score } => {
                self.score = score;
                self.outcome = Some(outcome);
                self.phase = QuizPhase::Feedback;
            }
            RunnerEvent::Finished { result, recorded } => {
                self.phase = if result.is_some() {
                    QuizPhase::Finished
                } else {
                    QuizPhase::Empty
                };
                self.result = result;
                self.recorded = recorded;
            }
            RunnerEvent::Rejected(reason) => self.notice = Some(reason),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_nature_lab(&self) -> bool {
        self.nature_lab
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.question.as_ref().map(|q| q.prompt.as_str())
    }

    #[must_use]
    pub fn specimen(&self) -> Option<&Specimen> {
        self.question.as_ref().and_then(|q| q.specimen.as_ref())
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn can_answer(&self) -> bool {
        self.phase == QuizPhase::Question
    }

    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        let q = self.question.as_ref()?;
        Some(format!("Question {} of {}", q.index + 1, q.total))
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.question
            .as_ref()
            .is_some_and(|q| q.index + 1 >= q.total)
    }

    /// Label for the button that leaves the feedback state.
    #[must_use]
    pub fn next_label(&self) -> &'static str {
        if self.is_last_question() {
            "See Results"
        } else if self.nature_lab {
            "Next Animal"
        } else {
            "Next"
        }
    }

    #[must_use]
    pub fn options(&self) -> Vec<OptionVm> {
        let Some(question) = self.question.as_ref() else {
            return Vec::new();
        };
        question
            .options
            .iter()
            .map(|label| {
                let mark = match &self.outcome {
                    None => OptionMark::None,
                    Some(outcome) if *label == outcome.correct_answer => OptionMark::Correct,
                    Some(outcome) if outcome.selected() == Some(label.as_str()) => {
                        OptionMark::Incorrect
                    }
                    Some(_) => OptionMark::None,
                };
                OptionVm {
                    label: label.clone(),
                    mark,
                    disabled: !self.can_answer(),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<String> {
        let outcome = self.outcome.as_ref()?;
        let answer = &outcome.correct_answer;
        Some(match (&outcome.resolution, outcome.correct) {
            (Resolution::TimedOut, _) => format!("⏰ Time's up! Correct answer: {answer}"),
            (Resolution::Selected(_), true) if self.nature_lab => format!("✅ Correct! {answer}"),
            (Resolution::Selected(_), true) => "✅ Correct!".to_string(),
            (Resolution::Selected(_), false) if self.nature_lab => {
                format!("❌ Oops! The correct answer was: {answer}.")
            }
            (Resolution::Selected(_), false) => {
                format!("❌ Not quite. The correct answer is: {answer}")
            }
        })
    }

    /// Name to look facts up for once the current round is resolved.
    #[must_use]
    pub fn facts_subject(&self) -> Option<&str> {
        if self.phase != QuizPhase::Feedback {
            return None;
        }
        self.specimen().map(|s| s.api_name.as_str())
    }

    #[must_use]
    pub fn summary_line(&self) -> Option<String> {
        let result = self.result.as_ref()?;
        Some(format!(
            "Correct: {}/{} ({}%)",
            result.score(),
            result.total(),
            result.percent()
        ))
    }

    #[must_use]
    pub fn saved_line(&self) -> Option<&'static str> {
        match self.phase {
            QuizPhase::Finished if self.recorded => Some("Saved to your history."),
            QuizPhase::Finished => Some("This result could not be saved."),
            _ => None,
        }
    }

    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        (self.phase == QuizPhase::Empty).then_some(LOAD_FAILED_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wonder_core::model::{ActivityType, Category};
    use wonder_core::time::fixed_now;

    fn presented(index: usize, total: usize) -> RunnerEvent {
        RunnerEvent::Presented(PresentedQuestion {
            index,
            total,
            prompt: format!("Q{index}"),
            options: vec!["Fox".into(), "Owl".into()],
            seconds: 30,
            specimen: None,
        })
    }

    fn answered(selected: Option<&str>, correct: bool, score: u32) -> RunnerEvent {
        RunnerEvent::Answered {
            outcome: AnswerOutcome {
                index: 0,
                resolution: selected.map_or(Resolution::TimedOut, |s| Resolution::Selected(s.into())),
                correct,
                correct_answer: "Fox".into(),
            },
            score,
        }
    }

    fn quiz() -> QuizVm {
        QuizVm::new(&Topic::category(&Category::catalog()[0]))
    }

    #[test]
    fn presents_and_counts_down() {
        let mut vm = quiz();
        assert_eq!(vm.phase(), QuizPhase::Loading);
        vm.apply(presented(0, 10));
        assert_eq!(vm.title(), "Science");
        assert_eq!(vm.progress_label().as_deref(), Some("Question 1 of 10"));
        assert_eq!(vm.remaining(), 30);
        assert!(vm.can_answer());
        vm.apply(RunnerEvent::Tick { remaining: 29 });
        assert_eq!(vm.remaining(), 29);
        assert!(vm.options().iter().all(|o| o.mark == OptionMark::None && !o.disabled));
    }

    #[test]
    fn wrong_answer_marks_both_options() {
        let mut vm = quiz();
        vm.apply(presented(0, 10));
        vm.apply(answered(Some("Owl"), false, 0));
        let options = vm.options();
        assert_eq!(options[0].class(), "quiz-option-btn correct");
        assert_eq!(options[1].class(), "quiz-option-btn incorrect");
        assert!(options.iter().all(|o| o.disabled));
        assert_eq!(
            vm.feedback().as_deref(),
            Some("❌ Not quite. The correct answer is: Fox")
        );
        assert_eq!(vm.next_label(), "Next");
    }

    #[test]
    fn timeout_reveals_answer_on_last_question() {
        let mut vm = QuizVm::new(&Topic::NatureLab);
        vm.apply(presented(4, 5));
        vm.apply(answered(None, false, 2));
        assert_eq!(vm.feedback().as_deref(), Some("⏰ Time's up! Correct answer: Fox"));
        assert_eq!(vm.next_label(), "See Results");
        assert_eq!(vm.score(), 2);
        assert_eq!(vm.options()[1].mark, OptionMark::None);
    }

    #[test]
    fn nature_lab_feedback_names_the_animal() {
        let mut vm = QuizVm::new(&Topic::NatureLab);
        vm.apply(presented(0, 5));
        vm.apply(answered(Some("Fox"), true, 1));
        assert_eq!(vm.feedback().as_deref(), Some("✅ Correct! Fox"));
        assert_eq!(vm.next_label(), "Next Animal");
    }

    #[test]
    fn finished_and_empty_states() {
        let mut vm = quiz();
        vm.apply(presented(0, 1));
        vm.apply(answered(Some("Fox"), true, 1));
        let result = QuizResult::new(ActivityType::CategoryQuiz, "Science", 1, 1, fixed_now()).unwrap();
        vm.apply(RunnerEvent::Finished {
            result: Some(result),
            recorded: true,
        });
        assert_eq!(vm.phase(), QuizPhase::Finished);
        assert_eq!(vm.summary_line().as_deref(), Some("Correct: 1/1 (100%)"));
        assert_eq!(vm.saved_line(), Some("Saved to your history."));

        let mut empty = quiz();
        empty.apply(RunnerEvent::Finished {
            result: None,
            recorded: false,
        });
        assert_eq!(empty.phase(), QuizPhase::Empty);
        assert_eq!(empty.empty_message(), Some(LOAD_FAILED_MESSAGE));
        assert!(empty.summary_line().is_none());
    }

    #[test]
    fn rejection_is_a_notice_only() {
        let mut vm = quiz();
        vm.apply(presented(0, 2));
        vm.apply(RunnerEvent::Rejected("no question is open".into()));
        assert_eq!(vm.phase(), QuizPhase::Question);
        assert_eq!(vm.notice(), Some("no question is open"));
        vm.apply(presented(1, 2));
        assert!(vm.notice().is_none());
    }
}
