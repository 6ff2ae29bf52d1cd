use std::rc::Rc;

use log::{debug, warn};
use yew::Reducible;

use crate::model::{Quiz, QuizResult};

pub const GENERATION_FAILED: &str =
    "Failed to generate quiz. Please check your API key and try again.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Home,
    Quiz,
    Results,
    History,
}

/// Everything the shell needs to decide what to draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub screen: Screen,
    pub quiz: Option<Rc<Quiz>>,
    pub result: Option<Rc<QuizResult>>,
    pub is_generating: bool,
    pub error: Option<String>,
    /// Bumped per generation request; replies carrying an older value are stale.
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    GenerateRequested,
    GenerateSucceeded { token: u64, quiz: Quiz },
    GenerateFailed { token: u64 },
    QuizCompleted(QuizResult),
    Retry,
    GoHome,
    ViewHistory,
    Back,
    DismissError,
}

impl AppState {
    pub fn can_generate(&self) -> bool {
        self.screen == Screen::Home && !self.is_generating
    }

    /// Token that the next accepted `GenerateRequested` will hand out.
    pub fn next_generation(&self) -> u64 {
        self.generation + 1
    }

    /// Whether `QuizCompleted(result)` would be taken in this state.
    pub fn accepts_result(&self, result: &QuizResult) -> bool {
        self.screen == Screen::Quiz
            && self
                .quiz
                .as_ref()
                .is_some_and(|quiz| quiz.id == result.quiz_id)
    }

    /// Pure transition function. Events that make no sense in the current
    /// state leave it untouched.
    pub fn next(&self, event: AppEvent) -> AppState {
        let mut next = self.clone();
        match event {
            AppEvent::GenerateRequested => {
                if !self.can_generate() {
                    return next;
                }
                next.is_generating = true;
                next.error = None;
                next.generation = self.next_generation();
            }
            AppEvent::GenerateSucceeded { token, quiz } => {
                if !self.is_current(token) {
                    debug!("Dropping stale quiz {}", quiz.id);
                    return next;
                }
                next.is_generating = false;
                if self.screen == Screen::Home {
                    next.quiz = Some(Rc::new(quiz));
                    next.result = None;
                    next.screen = Screen::Quiz;
                }
            }
            AppEvent::GenerateFailed { token } => {
                if !self.is_current(token) {
                    return next;
                }
                next.is_generating = false;
                next.error = Some(GENERATION_FAILED.to_string());
            }
            AppEvent::QuizCompleted(result) => {
                if !self.accepts_result(&result) {
                    warn!("Ignoring result for quiz {} outside the quiz screen", result.quiz_id);
                    return next;
                }
                next.result = Some(Rc::new(result));
                next.screen = Screen::Results;
            }
            AppEvent::Retry => {
                if self.screen == Screen::Results {
                    next.quiz = None;
                    next.result = None;
                    next.screen = Screen::Home;
                }
            }
            AppEvent::GoHome => {
                if self.screen != Screen::Home {
                    next.quiz = None;
                    next.result = None;
                    next.screen = Screen::Home;
                }
            }
            AppEvent::ViewHistory => {
                if self.screen == Screen::Home && !self.is_generating {
                    next.screen = Screen::History;
                }
            }
            AppEvent::Back => {
                if self.screen == Screen::History {
                    next.screen = Screen::Home;
                }
            }
            AppEvent::DismissError => next.error = None,
        }
        next
    }

    fn is_current(&self, token: u64) -> bool {
        self.is_generating && token == self.generation
    }
}

impl Reducible for AppState {
    type Action = AppEvent;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.next(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::quiz;
    use crate::model::AnswerRecord;

    fn generating() -> AppState {
        AppState::default().next(AppEvent::GenerateRequested)
    }

    fn on_quiz() -> AppState {
        let state = generating();
        let token = state.generation;
        state.next(AppEvent::GenerateSucceeded {
            token,
            quiz: quiz(&[0, 1]),
        })
    }

    fn finished(state: &AppState) -> QuizResult {
        let quiz = state.quiz.as_ref().unwrap();
        let answers = quiz
            .questions
            .iter()
            .map(|q| AnswerRecord::grade(q, 0))
            .collect();
        QuizResult::from_answers(quiz, answers, 5)
    }

    #[test]
    fn starts_on_home() {
        let state = AppState::default();
        assert_eq!(state.screen, Screen::Home);
        assert!(state.quiz.is_none() && state.result.is_none());
        assert!(state.can_generate());
    }

    #[test]
    fn generation_is_single_flight() {
        let state = generating();
        assert!(state.is_generating);
        assert_eq!(state.generation, 1);

        let again = state.next(AppEvent::GenerateRequested);
        assert_eq!(again, state);
    }

    #[test]
    fn success_moves_to_quiz() {
        let state = on_quiz();
        assert_eq!(state.screen, Screen::Quiz);
        assert!(!state.is_generating);
        assert_eq!(state.quiz.as_ref().unwrap().questions.len(), 2);
    }

    #[test]
    fn failure_stays_home_with_message() {
        let mut state = AppState::default();
        state.error = Some("old".into());
        let state = state.next(AppEvent::GenerateRequested);
        assert_eq!(state.error, None);

        let state = state.next(AppEvent::GenerateFailed {
            token: state.generation,
        });
        assert_eq!(state.screen, Screen::Home);
        assert!(!state.is_generating);
        assert_eq!(state.error.as_deref(), Some(GENERATION_FAILED));

        let state = state.next(AppEvent::DismissError);
        assert_eq!(state.error, None);
    }

    #[test]
    fn stale_replies_are_ignored() {
        let state = generating();
        let stale = state.next(AppEvent::GenerateSucceeded {
            token: 0,
            quiz: quiz(&[0]),
        });
        assert_eq!(stale, state);

        let stale = state.next(AppEvent::GenerateFailed { token: 7 });
        assert_eq!(stale, state);
    }

    #[test]
    fn completion_moves_to_results() {
        let state = on_quiz();
        let result = finished(&state);
        let state = state.next(AppEvent::QuizCompleted(result.clone()));

        assert_eq!(state.screen, Screen::Results);
        assert_eq!(state.result.as_deref(), Some(&result));
        assert_eq!(state.result.as_ref().unwrap().score, 1);
    }

    #[test]
    fn completion_requires_matching_quiz() {
        let state = on_quiz();
        let mut result = finished(&state);
        assert!(state.accepts_result(&result));

        result.quiz_id = "another".into();
        assert!(!state.accepts_result(&result));
        assert_eq!(state.next(AppEvent::QuizCompleted(result.clone())), state);

        let home = AppState::default();
        assert!(!home.accepts_result(&result));
        assert_eq!(home.next(AppEvent::QuizCompleted(result)), home);
    }

    #[test]
    fn result_is_refused_once_quiz_is_left() {
        let state = on_quiz();
        let result = finished(&state);
        let home = state.next(AppEvent::GoHome);

        assert!(!home.accepts_result(&result));
        assert_eq!(home.next(AppEvent::QuizCompleted(result)), home);
    }

    #[test]
    fn announced_token_matches_reducer() {
        let idle = AppState::default();
        let token = idle.next_generation();
        let state = idle.next(AppEvent::GenerateRequested);
        assert_eq!(state.generation, token);

        let state = state.next(AppEvent::GenerateFailed { token });
        let token = state.next_generation();
        let state = state.next(AppEvent::GenerateRequested);
        assert_eq!(state.generation, token);
        assert_eq!(token, 2);
    }

    #[test]
    fn retry_discards_session() {
        let state = on_quiz();
        let result = finished(&state);
        let state = state
            .next(AppEvent::QuizCompleted(result))
            .next(AppEvent::Retry);

        assert_eq!(state.screen, Screen::Home);
        assert!(state.quiz.is_none());
        assert!(state.result.is_none());
    }

    #[test]
    fn history_toggles_with_home() {
        let state = AppState::default().next(AppEvent::ViewHistory);
        assert_eq!(state.screen, Screen::History);
        assert!(!state.can_generate());

        let state = state.next(AppEvent::Back);
        assert_eq!(state.screen, Screen::Home);

        // Back only means something on the history screen.
        assert_eq!(on_quiz().next(AppEvent::Back).screen, Screen::Quiz);
    }

    #[test]
    fn go_home_abandons_quiz() {
        let state = on_quiz().next(AppEvent::GoHome);
        assert_eq!(state.screen, Screen::Home);
        assert!(state.quiz.is_none());
    }

    #[test]
    fn reply_after_leaving_home_is_not_shown() {
        let state = generating();
        assert_eq!(state.next(AppEvent::ViewHistory), state);

        let token = state.generation;
        let mut away = state.clone();
        away.screen = Screen::History;

        let state = away.next(AppEvent::GenerateSucceeded {
            token,
            quiz: quiz(&[0]),
        });
        assert_eq!(state.screen, Screen::History);
        assert!(state.quiz.is_none());
        assert!(!state.is_generating);
    }
}
