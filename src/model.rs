use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MalformedQuizError;

/// Every question must offer exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Percentage at or above which a result counts as a pass.
pub const PASS_PERCENTAGE: u32 = 70;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.option(self.correct_answer_index)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
    pub created_at: u64,
}

impl Quiz {
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Checks the shape of a question list before it is turned into a [`Quiz`].
pub fn validate_questions(questions: &[Question]) -> Result<(), MalformedQuizError> {
    if questions.is_empty() {
        return Err(MalformedQuizError::NoQuestions);
    }

    let mut seen = HashSet::with_capacity(questions.len());
    for q in questions {
        if !seen.insert(q.id) {
            return Err(MalformedQuizError::DuplicateId(q.id));
        }
        if q.options.len() != OPTIONS_PER_QUESTION {
            return Err(MalformedQuizError::OptionCount {
                question_id: q.id,
                found: q.options.len(),
            });
        }
        if q.correct_answer_index >= q.options.len() {
            return Err(MalformedQuizError::AnswerOutOfRange {
                question_id: q.id,
                index: q.correct_answer_index,
                options: q.options.len(),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: u32,
    pub selected_option_index: usize,
    pub is_correct: bool,
}

impl AnswerRecord {
    pub fn grade(question: &Question, selected_option_index: usize) -> Self {
        AnswerRecord {
            question_id: question.id,
            selected_option_index,
            is_correct: selected_option_index == question.correct_answer_index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub quiz_topic: String,
    pub score: usize,
    pub total_questions: usize,
    pub date: u64,
    pub answers: Vec<AnswerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_feedback: Option<String>,
}

impl QuizResult {
    pub fn from_answers(quiz: &Quiz, answers: Vec<AnswerRecord>, date: u64) -> Self {
        let score = answers.iter().filter(|a| a.is_correct).count();
        QuizResult {
            quiz_id: quiz.id.clone(),
            quiz_topic: quiz.topic.clone(),
            score,
            total_questions: quiz.questions.len(),
            date,
            answers,
            ai_feedback: None,
        }
    }

    pub fn answer_for(&self, question_id: u32) -> Option<&AnswerRecord> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.score as f64 / self.total_questions as f64 * 100.0).round() as u32
    }

    pub fn passed(&self) -> bool {
        self.percentage() >= PASS_PERCENTAGE
    }

    pub fn verdict(&self) -> &'static str {
        if self.passed() {
            "Great Job!"
        } else {
            "Keep Practicing"
        }
    }

    pub fn incorrect(&self) -> usize {
        self.total_questions.saturating_sub(self.score)
    }
}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
