use crate::model::{AnswerRecord, Question, Quiz};

/// Outcome of pressing "Next" / "Finish".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Nothing selected yet (or already finished); state unchanged.
    Blocked,
    /// Moved on to the next question.
    Next,
    /// The last question was answered. Carries one record per question.
    Completed(Vec<AnswerRecord>),
}

/// Walks a quiz one question at a time. Answers are graded when the user
/// moves on, never revisited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSession {
    index: usize,
    pending: Option<usize>,
    answers: Vec<AnswerRecord>,
    finished: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_question<'q>(&self, quiz: &'q Quiz) -> Option<&'q Question> {
        quiz.questions.get(self.index)
    }

    pub fn is_last(&self, quiz: &Quiz) -> bool {
        self.index + 1 >= quiz.questions.len()
    }

    /// Completion fraction in `0.0..=1.0`, counting the question on screen.
    pub fn progress(&self, quiz: &Quiz) -> f64 {
        let total = quiz.questions.len();
        if total == 0 {
            return 0.0;
        }
        ((self.index + 1) as f64 / total as f64).min(1.0)
    }

    /// Marks option `option` as the pending choice, replacing any earlier one.
    pub fn select(&mut self, quiz: &Quiz, option: usize) {
        if self.finished {
            return;
        }
        let in_range = self
            .current_question(quiz)
            .is_some_and(|q| option < q.options.len());
        if in_range {
            self.pending = Some(option);
        }
    }

    pub fn advance(&mut self, quiz: &Quiz) -> Advance {
        if self.finished {
            return Advance::Blocked;
        }
        let (Some(selected), Some(question)) = (self.pending, self.current_question(quiz)) else {
            return Advance::Blocked;
        };

        self.answers.push(AnswerRecord::grade(question, selected));
        self.pending = None;

        if self.is_last(quiz) {
            self.finished = true;
            Advance::Completed(self.answers.clone())
        } else {
            self.index += 1;
            Advance::Next
        }
    }
}
