//! Multiple-choice quiz questions
//!
//! Picking up a mystery box pauses the road and asks one of these.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Built-in informatics question bank (Indonesian)
const BUILTIN_QUESTIONS: &str = include_str!("../../assets/questions.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Whether the option at `index` is the right one.
    /// Returns `None` if there is no option at `index`.
    pub fn is_correct(&self, index: usize) -> Option<bool> {
        self.options
            .get(index)
            .map(|option| *option == self.correct_answer)
    }

    /// Index of the correct option
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }

    fn validate(&self, index: usize) -> Result<(), ContentError> {
        if self.question.trim().is_empty() {
            return Err(ContentError::EmptyPrompt { index });
        }
        if self.options.len() < 2 {
            return Err(ContentError::TooFewOptions {
                index,
                found: self.options.len(),
            });
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(ContentError::DuplicateOption {
                    index,
                    option: option.clone(),
                });
            }
        }
        if self.correct_index().is_none() {
            return Err(ContentError::AnswerNotInOptions {
                index,
                answer: self.correct_answer.clone(),
            });
        }
        Ok(())
    }
}

/// A validated, non-empty set of questions
#[derive(Debug, Clone, Serialize)]
pub struct QuizBank {
    questions: Vec<QuizQuestion>,
}

impl QuizBank {
    /// Build a bank, rejecting malformed questions
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, ContentError> {
        if questions.is_empty() {
            return Err(ContentError::EmptyBank);
        }
        for (index, q) in questions.iter().enumerate() {
            q.validate(index)?;
        }
        Ok(Self { questions })
    }

    /// Parse a bank from a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let questions: Vec<QuizQuestion> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// The question bank shipped with the game
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_QUESTIONS)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Pick a question uniformly at random
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &QuizQuestion {
        let idx = rng.random_range(0..self.questions.len());
        &self.questions[idx]
    }
}
