use std::collections::HashSet;

use thiserror::Error;

use super::Specimen;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("correct answer is empty")]
    EmptyAnswer,

    #[error("expected 2..=4 answer options, got {len}")]
    OptionCount { len: usize },

    #[error("answer options do not include the correct answer")]
    MissingCorrectAnswer,

    #[error("duplicate answer option: {0}")]
    DuplicateOption(String),
}

/// One multiple-choice question, immutable once built.
///
/// `options` always contains `correct_answer`; the order is whatever the source
/// produced (sources shuffle before construction). Nature Lab questions also
/// carry the specimen being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
    specimen: Option<Specimen>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or answer is blank, the option
    /// count is outside `2..=4`, options repeat, or the correct answer is absent.
    pub fn new(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
            return Err(QuestionError::OptionCount { len: options.len() });
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !seen.contains(correct_answer.as_str()) {
            return Err(QuestionError::MissingCorrectAnswer);
        }

        Ok(Self {
            prompt,
            correct_answer,
            options,
            specimen: None,
        })
    }

    #[must_use]
    pub fn with_specimen(mut self, specimen: Specimen) -> Self {
        self.specimen = Some(specimen);
        self
    }

    #[must_use]
    pub fn specimen(&self) -> Option<&Specimen> {
        self.specimen.as_ref()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|option| option == answer)
    }

    /// Exact text comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}
