use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

// 答案值，按题型收窄
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum AnswerValue {
    // 所选选项的展示文本，不是下标
    MultipleChoice(String),
    ShortAnswer(String),
    Essay(String),
    // 已上传文件的文件名
    FileUpload(String),
}

// 一次作答记录，草稿与正式提交共用同一结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    // 草稿为 "{student_id}_{assignment_id}_draft"，正式提交为生成的唯一 ID
    pub id: String,
    pub assignment_id: String,
    pub student_id: i64,
    // 题目 ID -> 答案
    pub answers: HashMap<String, AnswerValue>,
    // true 表示正式提交，不再是草稿
    pub is_submitted: bool,
    // 仅正式提交时写入
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    // 每次草稿保存时刷新
    pub last_saved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_late: bool,
    // 0-100，截止后判分写入
    pub score: Option<f64>,
    // 教师评语
    pub feedback: Option<String>,
    pub auto_graded: bool,
    // 作答耗时（秒）
    pub time_spent_seconds: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    // 排序用的生效时间：提交时间优先，其次最近保存时间，最后创建时间
    pub fn effective_timestamp(&self) -> chrono::DateTime<chrono::Utc> {
        self.submitted_at
            .or(self.last_saved_at)
            .unwrap_or(self.created_at)
    }
}

// 草稿主键：同一 (student, assignment) 反复保存只覆盖同一条记录
pub fn draft_submission_id(student_id: i64, assignment_id: &str) -> String {
    format!("{student_id}_{assignment_id}_draft")
}

// 正式提交主键：毫秒时间戳保证每次提交都是新记录
pub fn final_submission_id(
    student_id: i64,
    assignment_id: &str,
    submitted_at: chrono::DateTime<chrono::Utc>,
) -> String {
    format!(
        "{student_id}_{assignment_id}_{}",
        submitted_at.timestamp_millis()
    )
}
