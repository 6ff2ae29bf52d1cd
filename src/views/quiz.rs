use std::rc::Rc;

use yew::prelude::*;

use crate::model::{AnswerRecord, Quiz};
use crate::session::{Advance, QuizSession};

#[derive(Properties, PartialEq)]
pub struct QuizViewProps {
    pub quiz: Rc<Quiz>,
    pub on_complete: Callback<Vec<AnswerRecord>>,
}

#[function_component(QuizView)]
pub fn quiz_view(props: &QuizViewProps) -> Html {
    let session = use_state(QuizSession::new);
    let quiz = props.quiz.clone();

    let Some(question) = session.current_question(&quiz) else {
        return Html::default();
    };

    let total = quiz.questions.len();
    let is_last = session.is_last(&quiz);
    let progress = session.progress(&quiz) * 100.0;
    let pending = session.pending();

    let on_next = {
        let session = session.clone();
        let quiz = quiz.clone();
        let on_complete = props.on_complete.clone();
        Callback::from(move |_| {
            let mut next = (*session).clone();
            let outcome = next.advance(&quiz);
            if outcome == Advance::Blocked {
                return;
            }
            session.set(next);
            if let Advance::Completed(answers) = outcome {
                on_complete.emit(answers);
            }
        })
    };

    html! {
        <div class="card quiz">
            <div class="progress-header">
                <span>{format!("Question {} of {}", session.index() + 1, total)}</span>
                <span>{format!("{} • {}", quiz.topic, quiz.difficulty)}</span>
            </div>
            <div class="progress-track">
                <div class="progress-fill" style={format!("width: {progress:.0}%")} />
            </div>

            <h2 class="question-text">{question.text.clone()}</h2>

            <div class="options">
                { for question.options.iter().enumerate().map(|(idx, option)| {
                    let session = session.clone();
                    let quiz = quiz.clone();
                    let onclick = Callback::from(move |_| {
                        let mut next = (*session).clone();
                        next.select(&quiz, idx);
                        session.set(next);
                    });
                    html! {
                        <button
                            class={classes!("option", (pending == Some(idx)).then_some("selected"))}
                            {onclick}
                        >
                            {option.clone()}
                        </button>
                    }
                }) }
            </div>

            <div class="btn-row">
                <button class="btn-primary" onclick={on_next} disabled={pending.is_none() || session.is_finished()}>
                    { if is_last { "Finish Quiz" } else { "Next Question" } }
                </button>
            </div>
        </div>
    }
}
