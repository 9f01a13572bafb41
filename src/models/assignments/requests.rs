use crate::models::assignments::entities::Question;
use crate::models::common::pagination::PaginationQuery;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub questions: Vec<Question>,
    pub due_date: DateTime<Utc>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub allow_late_submission: Option<bool>,
    pub late_penalty_per_day: Option<f64>,
    pub time_limit_minutes: Option<i64>,
    pub is_published: Option<bool>,
    pub show_answers_after_deadline: Option<bool>,
}

/// 更新作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub questions: Option<Vec<Question>>,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式
    pub allow_late_submission: Option<bool>,
    pub late_penalty_per_day: Option<f64>,
    pub time_limit_minutes: Option<i64>,
    pub is_published: Option<bool>,
    pub show_answers_after_deadline: Option<bool>,
}

/// 作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub course_id: Option<i64>,
    pub created_by: Option<i64>,
    pub search: Option<String>,
    /// 只看已发布的作业
    pub published_only: Option<bool>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    pub created_by: Option<i64>,
    pub search: Option<String>,
    pub published_only: Option<bool>,
}
