use crate::models::common::pagination::PaginationQuery;
use crate::models::submissions::entities::AnswerValue;
use serde::Deserialize;
use ts_rs::TS;

/// 录入单题答案请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SaveAnswerRequest {
    pub question_id: String,
    pub answer: AnswerValue,
}

/// 提交列表查询参数（教师视角，HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    /// 只看正式提交（过滤掉草稿）
    pub submitted_only: Option<bool>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub submitted_only: Option<bool>,
}
