use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    submissions::{
        entities::Submission, requests::SubmissionListQuery, responses::SubmissionListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建作业（总分由题目分值求和得出）
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: &str) -> Result<Option<Assignment>>;
    // 分页列出作业
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // 更新作业
    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 删除作业
    async fn delete_assignment(&self, assignment_id: &str) -> Result<bool>;

    /// 提交管理方法
    // 保存草稿：按 (student, assignment) 幂等覆盖，保留首次创建时间
    async fn save_draft(&self, submission: Submission) -> Result<Submission>;
    // 写入正式提交（新主键），随后清理同对的草稿
    async fn save_final(&self, submission: Submission) -> Result<Submission>;
    // 最近一次提交，草稿与正式都算；读取失败按无提交处理
    async fn get_latest_submission(
        &self,
        student_id: i64,
        assignment_id: &str,
    ) -> Result<Option<Submission>>;
    // 草稿；读取失败按无草稿处理
    async fn get_draft_submission(
        &self,
        student_id: i64,
        assignment_id: &str,
    ) -> Result<Option<Submission>>;
    // 通过ID获取提交；读取失败按不存在处理
    async fn get_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>>;
    // 分页列出某作业的提交（教师视角）
    async fn list_assignment_submissions_with_pagination(
        &self,
        assignment_id: &str,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    // 写入判分结果
    async fn update_submission_grade(
        &self,
        submission_id: &str,
        score: f64,
        auto_graded: bool,
    ) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
