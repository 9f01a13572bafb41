//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    // 题目列表的 JSON 序列化
    #[sea_orm(column_type = "Text")]
    pub questions: String,
    pub total_points: f64,
    pub due_date: i64,
    pub allow_late_submission: bool,
    pub late_penalty_per_day: Option<f64>,
    pub time_limit_minutes: Option<i64>,
    pub is_published: bool,
    pub show_answers_after_deadline: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignment_submissions::Entity")]
    Submissions,
}

impl Related<super::assignment_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型，questions 字段从 JSON 反序列化
impl Model {
    pub fn into_assignment(
        self,
    ) -> Result<crate::models::assignments::entities::Assignment, serde_json::Error> {
        use crate::models::assignments::entities::Assignment;
        use chrono::{DateTime, Utc};

        Ok(Assignment {
            id: self.id,
            course_id: self.course_id,
            created_by: self.created_by,
            title: self.title,
            description: self.description,
            instructions: self.instructions,
            questions: serde_json::from_str(&self.questions)?,
            total_points: self.total_points,
            due_date: DateTime::<Utc>::from_timestamp(self.due_date, 0).unwrap_or_default(),
            allow_late_submission: self.allow_late_submission,
            late_penalty_per_day: self.late_penalty_per_day,
            time_limit_minutes: self.time_limit_minutes,
            is_published: self.is_published,
            show_answers_after_deadline: self.show_answers_after_deadline,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
