//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column};
use crate::entity::prelude::Assignments;
use crate::errors::{AssessmentError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, Question},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

// 题目列表序列化为 JSON 文本落库
fn serialize_questions(questions: &[Question]) -> Result<String> {
    serde_json::to_string(questions)
        .map_err(|e| AssessmentError::serialization(format!("题目序列化失败: {e}")))
}

impl SeaOrmStorage {
    /// 创建作业，总分按题目分值求和
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();
        let total_points: f64 = req.questions.iter().map(|q| q.points).sum();

        let model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            course_id: Set(req.course_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            instructions: Set(req.instructions),
            questions: Set(serialize_questions(&req.questions)?),
            total_points: Set(total_points),
            due_date: Set(req.due_date.timestamp()),
            allow_late_submission: Set(req.allow_late_submission.unwrap_or(false)),
            late_penalty_per_day: Set(req.late_penalty_per_day),
            time_limit_minutes: Set(req.time_limit_minutes),
            is_published: Set(req.is_published.unwrap_or(false)),
            show_answers_after_deadline: Set(req.show_answers_after_deadline.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("创建作业失败: {e}")))?;

        result
            .into_assignment()
            .map_err(|e| AssessmentError::serialization(format!("题目反序列化失败: {e}")))
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: &str) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("查询作业失败: {e}")))?;

        match result {
            Some(model) => model
                .into_assignment()
                .map(Some)
                .map_err(|e| AssessmentError::serialization(format!("题目反序列化失败: {e}"))),
            None => Ok(None),
        }
    }

    /// 分页列出作业
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Assignments::find();

        // 课程筛选
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        // 创建者筛选
        if let Some(created_by) = query.created_by {
            select = select.filter(Column::CreatedBy.eq(created_by));
        }

        // 搜索条件（按标题搜索）
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        // 只看已发布
        if query.published_only.unwrap_or(false) {
            select = select.filter(Column::IsPublished.eq(true));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AssessmentError::database_operation(format!("查询作业总数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("查询作业列表失败: {e}")))?
            .into_iter()
            .map(|m| {
                m.into_assignment()
                    .map_err(|e| AssessmentError::serialization(format!("题目反序列化失败: {e}")))
            })
            .collect::<Result<Vec<Assignment>>>()?;

        Ok(AssignmentListResponse {
            items,
            pagination: PaginationInfo::of(page as i64, size as i64, total as i64),
        })
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        assignment_id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        // 先检查作业是否存在
        let existing = self.get_assignment_by_id_impl(assignment_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(assignment_id.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(instructions) = update.instructions {
            model.instructions = Set(Some(instructions));
        }

        if let Some(questions) = update.questions {
            // 题目变化时同步重算总分
            model.total_points = Set(questions.iter().map(|q| q.points).sum());
            model.questions = Set(serialize_questions(&questions)?);
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        if let Some(allow_late_submission) = update.allow_late_submission {
            model.allow_late_submission = Set(allow_late_submission);
        }

        if let Some(late_penalty_per_day) = update.late_penalty_per_day {
            model.late_penalty_per_day = Set(Some(late_penalty_per_day));
        }

        if let Some(time_limit_minutes) = update.time_limit_minutes {
            model.time_limit_minutes = Set(Some(time_limit_minutes));
        }

        if let Some(is_published) = update.is_published {
            model.is_published = Set(is_published);
        }

        if let Some(show_answers_after_deadline) = update.show_answers_after_deadline {
            model.show_answers_after_deadline = Set(show_answers_after_deadline);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(assignment_id).await
    }

    /// 删除作业（提交记录随外键级联删除）
    pub async fn delete_assignment_impl(&self, assignment_id: &str) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
