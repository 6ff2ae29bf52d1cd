pub mod generator;
pub mod history;
pub mod quiz;
pub mod results;

pub use generator::QuizGenerator;
pub use history::HistoryView;
pub use quiz::QuizView;
pub use results::QuizResults;
