use crate::models::assignments::entities::{Assignment, Question, QuestionKind};
use crate::models::common::pagination::PaginationInfo;
use crate::utils::deadline;
use serde::Serialize;
use ts_rs::TS;

// 学生视角的题型，剥离答案相关字段
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum StudentQuestionKind {
    MultipleChoice { options: Vec<String> },
    ShortAnswer,
    Essay,
    FileUpload,
}

// 学生视角的题目，答案与解析在公布前不可见
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentQuestion {
    pub id: String,
    pub prompt: String,
    pub points: f64,
    pub required: bool,
    #[serde(flatten)]
    #[ts(flatten)]
    pub kind: StudentQuestionKind,
}

impl From<&Question> for StudentQuestion {
    fn from(question: &Question) -> Self {
        let kind = match &question.kind {
            QuestionKind::MultipleChoice { options, .. } => StudentQuestionKind::MultipleChoice {
                options: options.clone(),
            },
            QuestionKind::ShortAnswer { .. } => StudentQuestionKind::ShortAnswer,
            QuestionKind::Essay { .. } => StudentQuestionKind::Essay,
            QuestionKind::FileUpload => StudentQuestionKind::FileUpload,
        };
        Self {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            points: question.points,
            required: question.required,
            kind,
        }
    }
}

// 学生视角的作业详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentAssignmentView {
    pub id: String,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub questions: Vec<StudentQuestion>,
    pub total_points: f64,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub allow_late_submission: bool,
    pub late_penalty_per_day: Option<f64>,
    pub time_limit_minutes: Option<i64>,
    pub show_answers_after_deadline: bool,
    // 以下字段按请求时刻计算
    pub deadline_passed: bool,
    pub time_remaining: String,
}

impl StudentAssignmentView {
    pub fn from_assignment(assignment: &Assignment, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            id: assignment.id.clone(),
            course_id: assignment.course_id,
            title: assignment.title.clone(),
            description: assignment.description.clone(),
            instructions: assignment.instructions.clone(),
            questions: assignment.questions.iter().map(StudentQuestion::from).collect(),
            total_points: assignment.total_points,
            due_date: assignment.due_date,
            allow_late_submission: assignment.allow_late_submission,
            late_penalty_per_day: assignment.late_penalty_per_day,
            time_limit_minutes: assignment.time_limit_minutes,
            show_answers_after_deadline: assignment.show_answers_after_deadline,
            deadline_passed: deadline::is_overdue(assignment.due_date, now),
            time_remaining: deadline::time_remaining(assignment.due_date, now),
        }
    }
}

// 作业列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
    pub pagination: PaginationInfo,
}
