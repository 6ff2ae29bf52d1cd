//! Gemini client: builds `generateContent` requests for quiz generation and
//! performance feedback, and turns the replies into domain values.

use gloo_net::http::Request;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::GenerationError;
use crate::model::{now_millis, validate_questions, Difficulty, Question, Quiz, QuizResult};

const SYSTEM_INSTRUCTION: &str =
    "You are a senior technical interviewer creating rigorous test questions.";
const QUIZ_TEMPERATURE: f64 = 0.7;
const QUESTIONS_PER_QUIZ: usize = 5;

pub const FEEDBACK_UNAVAILABLE: &str = "Analysis unavailable.";
pub const FEEDBACK_FAILED: &str = "Could not generate AI analysis at this time.";

/// Body of a `models/{model}:generateContent` call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub temperature: f64,
}

impl GenerateContentRequest {
    pub fn prompt(text: String) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text }],
            }],
            system_instruction: None,
            generation_config: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all parts joined. `None` when there is none.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Something that can answer a `generateContent` request with text.
#[allow(async_fn_in_trait)]
pub trait ModelBackend {
    /// `Ok(None)` means the call worked but the model produced no text.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Option<String>, GenerationError>;
}

/// The hosted Gemini REST API.
#[derive(Clone, Debug, PartialEq)]
pub struct GeminiBackend {
    config: AppConfig,
}

impl GeminiBackend {
    pub fn new(config: AppConfig) -> Self {
        GeminiBackend { config }
    }
}

impl ModelBackend for GeminiBackend {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Option<String>, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        debug!("generate_content: calling {}", self.config.model);
        let resp = Request::post(&self.config.generate_url(api_key))
            .header("Content-Type", "application/json")
            .json(request)?
            .send()
            .await?;

        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let data: GenerateContentResponse = resp.json().await?;
        Ok(data.text())
    }
}

/// Response schema handed to the model so it replies with a quiz object.
pub fn quiz_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "INTEGER" },
                        "text": { "type": "STRING", "description": "The question text" },
                        "options": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "An array of 4 possible answers"
                        },
                        "correctAnswerIndex": {
                            "type": "INTEGER",
                            "description": "0-based index of the correct option"
                        },
                        "explanation": {
                            "type": "STRING",
                            "description": "Brief explanation of why the answer is correct"
                        }
                    },
                    "required": ["id", "text", "options", "correctAnswerIndex", "explanation"]
                }
            }
        },
        "required": ["questions"]
    })
}

pub fn quiz_request(topic: &str, difficulty: Difficulty) -> GenerateContentRequest {
    let prompt = format!(
        "Create a challenging technical quiz about \"{topic}\".\n\
         Difficulty Level: {difficulty}.\n\
         Generate exactly {QUESTIONS_PER_QUIZ} multiple-choice questions.\n\
         Ensure the questions are suitable for a {difficulty} level software engineer or DevOps professional.\n\
         The output must be valid JSON matching the schema."
    );

    GenerateContentRequest {
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        }),
        generation_config: Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: quiz_schema(),
            temperature: QUIZ_TEMPERATURE,
        }),
        ..GenerateContentRequest::prompt(prompt)
    }
}

#[derive(Deserialize)]
struct QuizPayload {
    questions: Vec<Question>,
}

/// Parses the model's JSON text and checks every question is well formed.
pub fn parse_questions(text: &str) -> Result<Vec<Question>, GenerationError> {
    let payload: QuizPayload = serde_json::from_str(text)?;
    validate_questions(&payload.questions)?;
    Ok(payload.questions)
}

async fn request_questions<B: ModelBackend>(
    backend: &B,
    request: &GenerateContentRequest,
) -> Result<Vec<Question>, GenerationError> {
    let text = backend
        .generate_content(request)
        .await?
        .ok_or(GenerationError::EmptyResponse)?;
    parse_questions(&text)
}

pub async fn generate_quiz<B: ModelBackend>(
    backend: &B,
    topic: &str,
    difficulty: Difficulty,
) -> Result<Quiz, GenerationError> {
    info!("Generating {difficulty} quiz on {topic:?}");
    let request = quiz_request(topic, difficulty);

    let questions = request_questions(backend, &request)
        .await
        .inspect_err(|err| error!("Quiz generation failed: {err}"))?;

    Ok(Quiz {
        id: Uuid::new_v4().to_string(),
        topic: topic.to_string(),
        difficulty,
        questions,
        created_at: now_millis(),
    })
}

pub fn feedback_prompt(result: &QuizResult, quiz: &Quiz) -> String {
    let summary = result
        .answers
        .iter()
        .map(|answer| {
            let question = quiz.question(answer.question_id);
            let text = question.map_or("unknown", |q| q.text.as_str());
            let chosen = question
                .and_then(|q| q.option(answer.selected_option_index))
                .unwrap_or("unknown");
            let correct = if answer.is_correct { "Yes" } else { "No" };
            format!("Question: {text}\nUser Answer: {chosen}\nCorrect: {correct}\n")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze this quiz performance for the topic \"{topic}\".\n\
         Score: {score}/{total}.\n\n\
         Details:\n{summary}\n\
         Provide a brief, encouraging, but technical 3-sentence summary of their knowledge gaps or strengths.\n\
         Address the user directly as \"You\".",
        topic = quiz.topic,
        score = result.score,
        total = result.total_questions,
    )
}

/// Free-text commentary on a finished quiz. Never fails: errors become a
/// fixed apology string.
pub async fn analyze_performance<B: ModelBackend>(
    backend: &B,
    result: &QuizResult,
    quiz: &Quiz,
) -> String {
    let request = GenerateContentRequest::prompt(feedback_prompt(result, quiz));
    match backend.generate_content(&request).await {
        Ok(Some(text)) if !text.trim().is_empty() => text,
        Ok(_) => FEEDBACK_UNAVAILABLE.to_string(),
        Err(err) => {
            warn!("Performance analysis failed: {err}");
            FEEDBACK_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::error::MalformedQuizError;
    use crate::model::tests::quiz;
    use crate::model::AnswerRecord;

    /// Replies with queued outcomes and remembers what it was asked.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: RefCell<VecDeque<Result<Option<String>, GenerationError>>>,
        requests: RefCell<Vec<GenerateContentRequest>>,
    }

    impl ScriptedBackend {
        fn replying(reply: Result<Option<String>, GenerationError>) -> Self {
            let backend = ScriptedBackend::default();
            backend.replies.borrow_mut().push_back(reply);
            backend
        }
    }

    impl ModelBackend for ScriptedBackend {
        async fn generate_content(
            &self,
            request: &GenerateContentRequest,
        ) -> Result<Option<String>, GenerationError> {
            self.requests.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    const TWO_QUESTIONS: &str = r#"{"questions":[
        {"id":1,"text":"What does a Pod share?","options":["Network","Nothing","Disk","CPU"],
         "correctAnswerIndex":0,"explanation":"Containers in a Pod share a network namespace."},
        {"id":2,"text":"Default restart policy?","options":["Never","OnFailure","Always","Sometimes"],
         "correctAnswerIndex":2,"explanation":"Pods default to Always."}
    ]}"#;

    #[tokio::test]
    async fn generates_quiz_from_model_json() {
        let backend = ScriptedBackend::replying(Ok(Some(TWO_QUESTIONS.to_string())));
        let quiz = generate_quiz(&backend, "Kubernetes Pod Lifecycle", Difficulty::Advanced)
            .await
            .unwrap();

        assert!(Uuid::parse_str(&quiz.id).is_ok());
        assert_eq!(quiz.topic, "Kubernetes Pod Lifecycle");
        assert_eq!(quiz.difficulty, Difficulty::Advanced);
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[1].correct_option(), Some("Always"));
        assert!(quiz.created_at > 0);
    }

    #[tokio::test]
    async fn quiz_request_carries_schema_and_settings() {
        let backend = ScriptedBackend::replying(Ok(Some(TWO_QUESTIONS.to_string())));
        generate_quiz(&backend, "Git Branching Strategies", Difficulty::Expert)
            .await
            .unwrap();

        let sent = serde_json::to_value(&backend.requests.borrow()[0]).unwrap();
        let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("\"Git Branching Strategies\""));
        assert!(prompt.contains("Difficulty Level: Expert."));
        assert_eq!(sent["systemInstruction"]["parts"][0]["text"], SYSTEM_INSTRUCTION);
        assert_eq!(sent["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(sent["generationConfig"]["temperature"].as_f64(), Some(0.7));
        assert_eq!(
            sent["generationConfig"]["responseSchema"]["required"],
            json!(["questions"])
        );
    }

    #[tokio::test]
    async fn missing_questions_key_is_an_error() {
        let backend = ScriptedBackend::replying(Ok(Some(r#"{"items":[]}"#.to_string())));
        let err = generate_quiz(&backend, "Docker", Difficulty::Beginner)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_and_failed_calls_are_errors() {
        let backend = ScriptedBackend::replying(Ok(None));
        let err = generate_quiz(&backend, "Docker", Difficulty::Beginner)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));

        let backend = ScriptedBackend::replying(Err(GenerationError::Status {
            status: 403,
            body: "API key not valid".into(),
        }));
        let err = generate_quiz(&backend, "Docker", Difficulty::Beginner)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn out_of_range_answer_is_malformed() {
        let text = r#"{"questions":[{"id":1,"text":"?","options":["a","b","c","d"],
            "correctAnswerIndex":4,"explanation":"-"}]}"#;
        let backend = ScriptedBackend::replying(Ok(Some(text.to_string())));
        let err = generate_quiz(&backend, "Jenkins", Difficulty::Beginner)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Malformed(MalformedQuizError::AnswerOutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn feedback_prompt_lists_each_answer() {
        let quiz = quiz(&[0, 2]);
        let answers = vec![
            AnswerRecord::grade(&quiz.questions[0], 0),
            AnswerRecord::grade(&quiz.questions[1], 1),
        ];
        let result = QuizResult::from_answers(&quiz, answers, 0);
        let prompt = feedback_prompt(&result, &quiz);

        assert!(prompt.contains("Score: 1/2."));
        assert!(prompt.contains("Question: Question 1?\nUser Answer: A\nCorrect: Yes"));
        assert!(prompt.contains("Question: Question 2?\nUser Answer: B\nCorrect: No"));
        assert!(prompt.contains("Address the user directly as \"You\"."));
    }

    #[tokio::test]
    async fn feedback_falls_back_instead_of_failing() {
        let quiz = quiz(&[0]);
        let result =
            QuizResult::from_answers(&quiz, vec![AnswerRecord::grade(&quiz.questions[0], 0)], 0);

        let backend = ScriptedBackend::replying(Err(GenerationError::Request("offline".into())));
        assert_eq!(analyze_performance(&backend, &result, &quiz).await, FEEDBACK_FAILED);

        let backend = ScriptedBackend::replying(Ok(Some("   ".into())));
        assert_eq!(analyze_performance(&backend, &result, &quiz).await, FEEDBACK_UNAVAILABLE);

        let backend = ScriptedBackend::replying(Ok(Some("You know your stuff.".into())));
        assert_eq!(
            analyze_performance(&backend, &result, &quiz).await,
            "You know your stuff."
        );
        assert!(backend.requests.borrow()[0].generation_config.is_none());
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let resp: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"questions\""},{"text":":[]}"}]}},
                              {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("{\"questions\":[]}"));

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(blocked.text(), None);
    }

    #[test]
    fn backend_debug_hides_api_key() {
        let config = AppConfig {
            api_key: Some("AIza-leaky".into()),
            ..AppConfig::default()
        };
        let printed = format!("{:?}", GeminiBackend::new(config));
        assert!(!printed.contains("AIza-leaky"));
    }
}
