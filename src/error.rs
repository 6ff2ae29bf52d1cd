use thiserror::Error;

/// Why a quiz could not be produced from a generation request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no GEMINI_API_KEY was configured at build time")]
    MissingCredential,
    #[error("request to the model failed: {0}")]
    Request(String),
    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("could not parse model output: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model returned a malformed quiz: {0}")]
    Malformed(#[from] MalformedQuizError),
}

impl From<gloo_net::Error> for GenerationError {
    fn from(err: gloo_net::Error) -> Self {
        GenerationError::Request(err.to_string())
    }
}

/// Structural problems in a quiz returned by the model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedQuizError {
    #[error("quiz has no questions")]
    NoQuestions,
    #[error("question {question_id} has {found} options, expected 4")]
    OptionCount { question_id: u32, found: usize },
    #[error("question {question_id} marks option {index} correct but has {options} options")]
    AnswerOutOfRange {
        question_id: u32,
        index: usize,
        options: usize,
    },
    #[error("question id {0} appears more than once")]
    DuplicateId(u32),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("could not serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}
