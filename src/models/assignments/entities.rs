use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 题型与类型专属字段（闭集，新增题型需要显式扩展这里和判分逻辑）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum QuestionKind {
    // 选择题，correct_answer 是 options 的下标；判分按选项文本比较
    MultipleChoice {
        options: Vec<String>,
        correct_answer: usize,
    },
    // 简答题，没有参考答案时不参与自动判分
    ShortAnswer { correct_answer: Option<String> },
    // 论述题，参考答案仅供人工批改
    Essay { reference_answer: Option<String> },
    // 文件作答，只记录文件名
    FileUpload,
}

// 题目定义
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Question {
    // 题目 ID（作业内唯一）
    pub id: String,
    // 题干
    pub prompt: String,
    // 分值
    pub points: f64,
    // 是否必答（仅在开启必答校验时拦截提交）
    #[serde(default)]
    pub required: bool,
    // 题目解析，答案公布后随反馈下发
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(flatten)]
    #[ts(flatten)]
    pub kind: QuestionKind,
}

// 作业定义，对答题流程只读
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: String,
    // 所属课程 ID
    pub course_id: i64,
    // 创建者 ID
    pub created_by: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 作答说明
    pub instructions: Option<String>,
    // 题目列表（有序）
    pub questions: Vec<Question>,
    // 总分，等于题目分值之和，由创建方保证
    pub total_points: f64,
    // 截止时间
    pub due_date: chrono::DateTime<chrono::Utc>,
    // 是否允许迟交
    pub allow_late_submission: bool,
    // 迟交每日扣分百分比
    pub late_penalty_per_day: Option<f64>,
    // 限时（分钟），缺省不限时
    pub time_limit_minutes: Option<i64>,
    // 是否已发布（未发布对学生不可见）
    pub is_published: bool,
    // 截止后是否公布答案与解析
    pub show_answers_after_deadline: bool,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    // 按题目 ID 找题
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}
