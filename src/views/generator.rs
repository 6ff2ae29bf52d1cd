use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew::TargetCast;

use crate::model::Difficulty;

pub const TOPIC_SUGGESTIONS: [&str; 5] = [
    "Kubernetes Pod Lifecycle",
    "Docker Multi-stage Builds",
    "Jenkins Groovy Pipelines",
    "Terraform State Management",
    "Git Branching Strategies",
];

/// The topic to submit, or `None` while the form must stay disabled.
pub fn submittable_topic(topic: &str, is_generating: bool) -> Option<String> {
    let trimmed = topic.trim();
    if is_generating || trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Properties, PartialEq)]
pub struct GeneratorProps {
    pub is_generating: bool,
    pub on_generate: Callback<(String, Difficulty)>,
}

#[function_component(QuizGenerator)]
pub fn quiz_generator(props: &GeneratorProps) -> Html {
    let topic = use_state(String::new);
    let difficulty = use_state(Difficulty::default);
    let is_generating = props.is_generating;
    let can_submit = submittable_topic(&topic, is_generating).is_some();

    let on_topic_input = {
        let topic = topic.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            topic.set(input.value());
        })
    };

    let on_submit = {
        let topic = topic.clone();
        let difficulty = difficulty.clone();
        let on_generate = props.on_generate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(topic) = submittable_topic(&topic, is_generating) {
                on_generate.emit((topic, *difficulty));
            }
        })
    };

    html! {
        <div class="card generator">
            <h1>{"DevOps QuizMaster"}</h1>
            <div class="subtitle">
                {"Generate AI-powered quizzes to validate your pipeline knowledge."}
            </div>

            <form onsubmit={on_submit}>
                <div class="field-label">
                    <span>{"Quiz Topic"}</span>
                </div>
                <input
                    class="field-input"
                    type="text"
                    placeholder="e.g. Kubernetes Networking"
                    value={(*topic).clone()}
                    oninput={on_topic_input}
                />

                <div class="field-label">
                    <span>{"Difficulty Level"}</span>
                </div>
                <div class="difficulty-row">
                    { for Difficulty::ALL.iter().map(|&level| {
                        let difficulty = difficulty.clone();
                        let selected = *difficulty == level;
                        let onclick = Callback::from(move |_| difficulty.set(level));
                        html! {
                            <button
                                type="button"
                                class={classes!("btn-choice", selected.then_some("selected"))}
                                {onclick}
                            >
                                {level.label()}
                            </button>
                        }
                    }) }
                </div>

                <div class="btn-row">
                    <button class="btn-primary" type="submit" disabled={!can_submit}>
                        { if is_generating { "Generating Quiz..." } else { "Generate Quiz" } }
                    </button>
                </div>
            </form>

            <div class="suggestions">
                <div class="tiny-note">{"Popular Topics"}</div>
                { for TOPIC_SUGGESTIONS.iter().map(|&suggestion| {
                    let topic = topic.clone();
                    let onclick = Callback::from(move |_| topic.set(suggestion.to_string()));
                    html! {
                        <button type="button" class="chip" {onclick}>{suggestion}</button>
                    }
                }) }
            </div>
        </div>
    }
}
