//! 提交实体，草稿与正式提交共用一张表

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_submissions")]
pub struct Model {
    // 草稿为 "{student_id}_{assignment_id}_draft"，正式提交带毫秒时间戳
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub assignment_id: String,
    pub student_id: i64,
    // 答案映射的 JSON 序列化
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    pub is_submitted: bool,
    pub submitted_at: Option<i64>,
    pub last_saved_at: Option<i64>,
    pub is_late: bool,
    pub score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub auto_graded: bool,
    pub time_spent_seconds: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型，answers 字段从 JSON 反序列化
impl Model {
    pub fn into_submission(
        self,
    ) -> Result<crate::models::submissions::entities::Submission, serde_json::Error> {
        use crate::models::submissions::entities::Submission;
        use chrono::{DateTime, Utc};

        Ok(Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            answers: serde_json::from_str(&self.answers)?,
            is_submitted: self.is_submitted,
            submitted_at: self
                .submitted_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            last_saved_at: self
                .last_saved_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            is_late: self.is_late,
            score: self.score,
            feedback: self.feedback,
            auto_graded: self.auto_graded,
            time_spent_seconds: self.time_spent_seconds,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
