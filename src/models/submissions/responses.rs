use crate::models::common::pagination::PaginationInfo;
use crate::models::submissions::entities::{AnswerValue, Submission};
use serde::Serialize;
use std::collections::HashMap;
use ts_rs::TS;

// 答题会话阶段
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Completed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::NotStarted => write!(f, "not_started"),
            SessionPhase::InProgress => write!(f, "in_progress"),
            SessionPhase::Completed => write!(f, "completed"),
        }
    }
}

// 答题会话快照，前端据此渲染
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SessionView {
    pub assignment_id: String,
    pub student_id: i64,
    pub phase: SessionPhase,
    // 是否有尚未落盘的改动
    pub dirty: bool,
    pub can_edit: bool,
    pub can_submit: bool,
    pub deadline_passed: bool,
    pub time_remaining: String,
    // 限时作业的剩余秒数，不限时为 None
    pub countdown_seconds: Option<i64>,
    pub answers: HashMap<String, AnswerValue>,
    pub time_spent_seconds: i64,
    pub last_saved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    // 本次会话中是否发生过自动提交
    pub auto_submitted: bool,
}

// 每题反馈，正确性三态：未公布(None) / 正确 / 错误
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct QuestionFeedback {
    pub question_id: String,
    pub prompt: String,
    pub points: f64,
    pub your_answer: Option<AnswerValue>,
    pub is_correct: Option<bool>,
    pub earned_points: f64,
    // 仅在答案公布后下发
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// 成绩视图：提交 + 作业 + 每题反馈的只读投影，查看时现算
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct AssignmentResultView {
    pub assignment_id: String,
    pub assignment_title: String,
    pub submission_id: String,
    pub is_submitted: bool,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_late: bool,
    pub deadline_passed: bool,
    // 答案与解析是否可见
    pub answers_visible: bool,
    // 截止前始终为 None
    pub score: Option<f64>,
    pub auto_graded: bool,
    pub feedback: Option<String>,
    pub questions: Vec<QuestionFeedback>,
}

// 提交列表响应（教师视角）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<Submission>,
    pub pagination: PaginationInfo,
}
