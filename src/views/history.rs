use std::rc::Rc;

use log::info;
use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::model::QuizResult;
use crate::storage::{HistoryStore, LocalStorage};

const CONFIRM_CLEAR: &str = "Are you sure you want to delete all quiz history?";

fn format_timestamp(millis: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(millis as f64));
    let day: String = date.to_locale_date_string("default", &JsValue::UNDEFINED).into();
    let time: String = date.to_locale_time_string("default").into();
    format!("{day} {time}")
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|win| win.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[derive(Properties, PartialEq)]
pub struct HistoryProps {
    pub history: Rc<HistoryStore<LocalStorage>>,
    pub on_back: Callback<()>,
}

#[function_component(HistoryView)]
pub fn history_view(props: &HistoryProps) -> Html {
    let entries = use_state(Vec::<QuizResult>::new);

    {
        let entries = entries.clone();
        let history = props.history.clone();
        use_effect_with((), move |_| {
            entries.set(history.get_history());
            || ()
        });
    }

    let on_clear = {
        let entries = entries.clone();
        let history = props.history.clone();
        Callback::from(move |_| {
            if confirm(CONFIRM_CLEAR) {
                history.clear_history();
                entries.set(Vec::new());
                info!("Quiz history cleared");
            }
        })
    };

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_| on_back.emit(()))
    };

    html! {
        <div class="card history">
            <div class="history-header">
                <button class="btn-secondary" onclick={on_back}>{"Back"}</button>
                <h2>{"Quiz History"}</h2>
                <button class="btn-danger" onclick={on_clear} disabled={entries.is_empty()}>
                    {"Clear"}
                </button>
            </div>

            if entries.is_empty() {
                <p class="empty">{"No history found. Take a quiz to see results here!"}</p>
            } else {
                { for entries.iter().map(|item| html! {
                    <div class="question-card">
                        <div class="question-header">
                            <span class="question-index">{item.quiz_topic.clone()}</span>
                            <span class={classes!("badge", if item.passed() { "pass" } else { "fail" })}>
                                {format!("{}% Score", item.percentage())}
                            </span>
                        </div>
                        <div class="tiny-note">
                            {format_timestamp(item.date)}
                            {"  ·  "}
                            {format!("{}/{} Correct", item.score, item.total_questions)}
                        </div>
                    </div>
                }) }
            }
        </div>
    }
}
