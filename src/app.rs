use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::config::AppConfig;
use crate::controller::{AppEvent, AppState, Screen};
use crate::gemini::{generate_quiz, GeminiBackend};
use crate::model::{now_millis, AnswerRecord, Difficulty, QuizResult};
use crate::storage::HistoryStore;
use crate::views::{HistoryView, QuizGenerator, QuizResults, QuizView};

fn dispatch_on<IN: 'static>(state: &UseReducerHandle<AppState>, event: AppEvent) -> Callback<IN> {
    let state = state.clone();
    Callback::from(move |_: IN| state.dispatch(event.clone()))
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let state = use_reducer(AppState::default);
    let backend = use_memo(props.config.clone(), |config| {
        GeminiBackend::new((**config).clone())
    });
    let history = use_memo(props.config.clone(), |config| HistoryStore::browser(config));
    // Set between dispatching a request and its reply, ahead of the re-render.
    let in_flight = use_memo((), |_| Cell::new(false));

    // === Generate quiz ===

    let on_generate = {
        let state = state.clone();
        let backend = backend.clone();
        let in_flight = in_flight.clone();
        Callback::from(move |(topic, difficulty): (String, Difficulty)| {
            if in_flight.get() || !state.can_generate() {
                return;
            }
            in_flight.set(true);
            let token = state.next_generation();
            state.dispatch(AppEvent::GenerateRequested);

            let state = state.clone();
            let backend = backend.clone();
            let in_flight = in_flight.clone();
            spawn_local(async move {
                let event = match generate_quiz(&*backend, &topic, difficulty).await {
                    Ok(quiz) => AppEvent::GenerateSucceeded { token, quiz },
                    Err(_) => AppEvent::GenerateFailed { token },
                };
                in_flight.set(false);
                state.dispatch(event);
            });
        })
    };

    // === Finish quiz ===

    let on_complete = {
        let state = state.clone();
        let history = history.clone();
        Callback::from(move |answers: Vec<AnswerRecord>| {
            let Some(quiz) = state.quiz.as_ref() else {
                return;
            };
            let result = QuizResult::from_answers(quiz, answers, now_millis());
            if !state.accepts_result(&result) {
                return;
            }
            history.save_result(&result);
            state.dispatch(AppEvent::QuizCompleted(result));
        })
    };

    let body = match state.screen {
        Screen::Home => html! {
            <QuizGenerator is_generating={state.is_generating} on_generate={on_generate} />
        },
        Screen::Quiz => match &state.quiz {
            Some(quiz) => html! {
                <QuizView key={quiz.id.clone()} quiz={quiz.clone()} on_complete={on_complete} />
            },
            None => Html::default(),
        },
        Screen::Results => match (&state.quiz, &state.result) {
            (Some(quiz), Some(result)) => html! {
                <QuizResults
                    quiz={quiz.clone()}
                    result={result.clone()}
                    backend={backend.clone()}
                    on_retry={dispatch_on::<()>(&state, AppEvent::Retry)}
                    on_home={dispatch_on::<()>(&state, AppEvent::GoHome)}
                />
            },
            _ => Html::default(),
        },
        Screen::History => html! {
            <HistoryView history={history.clone()} on_back={dispatch_on::<()>(&state, AppEvent::Back)} />
        },
    };

    html! {
        <div class="app-shell">
            <header class="app-header">
                <button class="brand" onclick={dispatch_on::<MouseEvent>(&state, AppEvent::GoHome)}>
                    {"DevOps QuizMaster"}
                </button>
                if state.screen == Screen::Home {
                    <button class="btn-secondary" onclick={dispatch_on::<MouseEvent>(&state, AppEvent::ViewHistory)}>
                        {"History"}
                    </button>
                }
            </header>

            if let Some(error) = &state.error {
                <div class="error-banner">
                    <span>{error.clone()}</span>
                    <button class="btn-dismiss" onclick={dispatch_on::<MouseEvent>(&state, AppEvent::DismissError)}>
                        {"×"}
                    </button>
                </div>
            }

            <main>{body}</main>

            <footer class="tiny-note">{"Powered by Google Gemini 2.5 Flash"}</footer>
        </div>
    }
}
