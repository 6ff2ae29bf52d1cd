use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::gemini::{analyze_performance, GeminiBackend};
use crate::model::{Quiz, QuizResult};

/// One line of the per-question breakdown.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakdownRow {
    pub number: usize,
    pub question: String,
    pub is_correct: bool,
    pub your_answer: Option<String>,
    /// Only filled in when the answer was wrong.
    pub correct_answer: Option<String>,
    pub explanation: String,
}

pub fn breakdown(quiz: &Quiz, result: &QuizResult) -> Vec<BreakdownRow> {
    quiz.questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let answer = result.answer_for(question.id);
            let is_correct = answer.is_some_and(|a| a.is_correct);
            BreakdownRow {
                number: idx + 1,
                question: question.text.clone(),
                is_correct,
                your_answer: answer
                    .and_then(|a| question.option(a.selected_option_index))
                    .map(str::to_string),
                correct_answer: if is_correct {
                    None
                } else {
                    question.correct_option().map(str::to_string)
                },
                explanation: question.explanation.clone(),
            }
        })
        .collect()
}

/// Hands `text` to `apply` only while the view is still mounted.
fn apply_if_mounted(mounted: &Cell<bool>, text: String, apply: impl FnOnce(String)) -> bool {
    if !mounted.get() {
        debug!("Results view closed before feedback arrived; dropping it");
        return false;
    }
    apply(text);
    true
}

#[derive(Properties, PartialEq)]
pub struct ResultsProps {
    pub quiz: Rc<Quiz>,
    pub result: Rc<QuizResult>,
    pub backend: Rc<GeminiBackend>,
    pub on_retry: Callback<()>,
    pub on_home: Callback<()>,
}

#[function_component(QuizResults)]
pub fn quiz_results(props: &ResultsProps) -> Html {
    let feedback = use_state(|| Option::<String>::None);

    {
        let feedback = feedback.clone();
        let quiz = props.quiz.clone();
        let result = props.result.clone();
        let backend = props.backend.clone();
        use_effect_with((), move |_| {
            let mounted = Rc::new(Cell::new(true));
            {
                let mounted = mounted.clone();
                spawn_local(async move {
                    let text = analyze_performance(&*backend, &result, &quiz).await;
                    apply_if_mounted(&mounted, text, |text| feedback.set(Some(text)));
                });
            }
            move || mounted.set(false)
        });
    }

    let quiz = &props.quiz;
    let result = &props.result;
    let rows = breakdown(quiz, result);

    let on_home = {
        let on_home = props.on_home.clone();
        Callback::from(move |_| on_home.emit(()))
    };
    let on_retry = {
        let on_retry = props.on_retry.clone();
        Callback::from(move |_| on_retry.emit(()))
    };

    html! {
        <div class="results">
            <div class="card">
                <h2>{"Quiz Complete!"}</h2>
                <div class="subtitle">{format!("Topic: {}", quiz.topic)}</div>

                <div class="score-banner">
                    <span class="score-main">{format!("{}%", result.percentage())}</span>
                    <div>
                        <div>{format!("Score: {} / {}", result.score, result.total_questions)}</div>
                        <div class={classes!("verdict", result.passed().then_some("pass"))}>
                            {result.verdict()}
                        </div>
                    </div>
                </div>

                <div class="accuracy">
                    <span class="correct">{format!("{} correct", result.score)}</span>
                    <span class="incorrect">{format!("{} incorrect", result.incorrect())}</span>
                </div>

                <div class="ai-feedback">
                    <div class="field-label">{"AI Performance Analysis"}</div>
                    { match &*feedback {
                        Some(text) => html! { <p>{text.clone()}</p> },
                        None => html! { <div class="placeholder">{"Analyzing your answers..."}</div> },
                    } }
                </div>
            </div>

            <div class="card">
                <h2>{"Detailed Breakdown"}</h2>
                { for rows.into_iter().map(|row| html! {
                    <div class={classes!("question-card", if row.is_correct { "correct" } else { "incorrect" })}>
                        <div class="question-text">{format!("{}. {}", row.number, row.question)}</div>
                        <div class="feedback">
                            {format!("Your answer: {}", row.your_answer.as_deref().unwrap_or("No answer"))}
                        </div>
                        if let Some(correct) = row.correct_answer {
                            <div class="feedback correct">{format!("Correct answer: {correct}")}</div>
                        }
                        <div class="tiny-note">{format!("Explanation: {}", row.explanation)}</div>
                    </div>
                }) }
            </div>

            <div class="btn-row">
                <button class="btn-secondary" onclick={on_home}>{"Back to Dashboard"}</button>
                <button class="btn-primary" onclick={on_retry}>
                    {format!("New Quiz on {}", quiz.topic)}
                </button>
            </div>
        </div>
    }
}
