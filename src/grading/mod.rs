//! 自动判分与成绩披露

pub mod engine;
pub mod result;

pub use engine::{GradeOutcome, QuestionScore, auto_grade};
pub use result::calculate_result;
