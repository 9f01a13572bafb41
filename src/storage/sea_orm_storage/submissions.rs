//! 提交存储操作，草稿覆盖写、正式提交追加写

use super::SeaOrmStorage;
use crate::entity::assignment_submissions::{ActiveModel, Column};
use crate::entity::prelude::AssignmentSubmissions;
use crate::errors::{AssessmentError, Result};
use crate::models::{
    PaginationInfo,
    submissions::{
        entities::{AnswerValue, Submission, draft_submission_id, final_submission_id},
        requests::SubmissionListQuery,
        responses::SubmissionListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use tracing::{debug, error, warn};

fn serialize_answers(answers: &HashMap<String, AnswerValue>) -> Result<String> {
    serde_json::to_string(answers)
        .map_err(|e| AssessmentError::serialization(format!("答案序列化失败: {e}")))
}

impl SeaOrmStorage {
    /// 保存草稿。同一 (student, assignment) 固定主键，重复保存覆盖答案并刷新保存时间，
    /// 首次创建时间保持不变。
    pub async fn save_draft_impl(&self, submission: Submission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();
        let draft_id = draft_submission_id(submission.student_id, &submission.assignment_id);
        let answers_json = serialize_answers(&submission.answers)?;

        let existing = AssignmentSubmissions::find_by_id(&draft_id)
            .one(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("查询草稿失败: {e}")))?;

        let stored = match existing {
            Some(_) => {
                let model = ActiveModel {
                    id: Set(draft_id),
                    answers: Set(answers_json),
                    last_saved_at: Set(Some(now)),
                    time_spent_seconds: Set(submission.time_spent_seconds),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| AssessmentError::database_operation(format!("更新草稿失败: {e}")))?
            }
            None => {
                let model = ActiveModel {
                    id: Set(draft_id),
                    assignment_id: Set(submission.assignment_id),
                    student_id: Set(submission.student_id),
                    answers: Set(answers_json),
                    is_submitted: Set(false),
                    submitted_at: Set(None),
                    last_saved_at: Set(Some(now)),
                    is_late: Set(false),
                    score: Set(None),
                    feedback: Set(None),
                    auto_graded: Set(false),
                    time_spent_seconds: Set(submission.time_spent_seconds),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model
                    .insert(&self.db)
                    .await
                    .map_err(|e| AssessmentError::database_operation(format!("写入草稿失败: {e}")))?
            }
        };

        stored
            .into_submission()
            .map_err(|e| AssessmentError::serialization(format!("答案反序列化失败: {e}")))
    }

    /// 写入正式提交。主键带毫秒时间戳，每次提交都是独立记录；
    /// 落库成功后清理同对草稿，清理失败只记日志不影响提交结果。
    pub async fn save_final_impl(&self, submission: Submission) -> Result<Submission> {
        let now = chrono::Utc::now();
        let final_id = final_submission_id(submission.student_id, &submission.assignment_id, now);
        let answers_json = serialize_answers(&submission.answers)?;

        let model = ActiveModel {
            id: Set(final_id),
            assignment_id: Set(submission.assignment_id.clone()),
            student_id: Set(submission.student_id),
            answers: Set(answers_json),
            is_submitted: Set(true),
            submitted_at: Set(Some(now.timestamp())),
            last_saved_at: Set(submission.last_saved_at.map(|t| t.timestamp())),
            is_late: Set(submission.is_late),
            score: Set(submission.score),
            feedback: Set(submission.feedback),
            auto_graded: Set(submission.auto_graded),
            time_spent_seconds: Set(submission.time_spent_seconds),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
        };

        let stored = model
            .insert(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("写入正式提交失败: {e}")))?;

        self.cleanup_draft(submission.student_id, &submission.assignment_id)
            .await;

        stored
            .into_submission()
            .map_err(|e| AssessmentError::serialization(format!("答案反序列化失败: {e}")))
    }

    // 提交已落库，草稿清理失败不能再让提交报错，重试一次后放弃
    async fn cleanup_draft(&self, student_id: i64, assignment_id: &str) {
        let draft_id = draft_submission_id(student_id, assignment_id);
        match AssignmentSubmissions::delete_by_id(&draft_id)
            .exec(&self.db)
            .await
        {
            Ok(result) if result.rows_affected == 0 => {
                debug!("无草稿可清理: {draft_id}");
            }
            Ok(_) => {}
            Err(e) => {
                error!("清理草稿失败，重试一次: {draft_id}: {e}");
                if let Err(e) = AssignmentSubmissions::delete_by_id(&draft_id)
                    .exec(&self.db)
                    .await
                {
                    error!("重试清理草稿仍失败，保留草稿记录: {draft_id}: {e}");
                }
            }
        }
    }

    /// 最近一次提交：草稿与正式都参与，按生效时间取最新，同刻优先正式提交。
    /// 查询或解析失败一律按无提交处理。
    pub async fn get_latest_submission_impl(
        &self,
        student_id: i64,
        assignment_id: &str,
    ) -> Result<Option<Submission>> {
        let rows = match AssignmentSubmissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!("查询提交记录失败，按无提交处理: {student_id}/{assignment_id}: {e}");
                return Ok(None);
            }
        };

        let latest = rows
            .into_iter()
            .filter_map(|model| {
                let id = model.id.clone();
                match model.into_submission() {
                    Ok(submission) => Some(submission),
                    Err(e) => {
                        warn!("提交记录答案损坏，跳过: {id}: {e}");
                        None
                    }
                }
            })
            .max_by(|a, b| {
                a.effective_timestamp()
                    .cmp(&b.effective_timestamp())
                    .then(a.is_submitted.cmp(&b.is_submitted))
            });

        Ok(latest)
    }

    /// 获取草稿，读取失败按无草稿处理
    pub async fn get_draft_submission_impl(
        &self,
        student_id: i64,
        assignment_id: &str,
    ) -> Result<Option<Submission>> {
        let draft_id = draft_submission_id(student_id, assignment_id);
        self.get_submission_by_id_impl(&draft_id).await
    }

    /// 通过 ID 获取提交，读取失败按不存在处理
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: &str,
    ) -> Result<Option<Submission>> {
        let row = match AssignmentSubmissions::find_by_id(submission_id)
            .one(&self.db)
            .await
        {
            Ok(row) => row,
            Err(e) => {
                warn!("查询提交失败，按不存在处理: {submission_id}: {e}");
                return Ok(None);
            }
        };

        match row {
            Some(model) => match model.into_submission() {
                Ok(submission) => Ok(Some(submission)),
                Err(e) => {
                    warn!("提交记录答案损坏，按不存在处理: {submission_id}: {e}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// 分页列出某作业的提交
    pub async fn list_assignment_submissions_with_pagination_impl(
        &self,
        assignment_id: &str,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select =
            AssignmentSubmissions::find().filter(Column::AssignmentId.eq(assignment_id));

        // 按学生筛选
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 只看正式提交
        if query.submitted_only.unwrap_or(false) {
            select = select.filter(Column::IsSubmitted.eq(true));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AssessmentError::database_operation(format!("查询提交总数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("查询提交列表失败: {e}")))?
            .into_iter()
            .map(|m| {
                m.into_submission()
                    .map_err(|e| AssessmentError::serialization(format!("答案反序列化失败: {e}")))
            })
            .collect::<Result<Vec<Submission>>>()?;

        Ok(SubmissionListResponse {
            items,
            pagination: PaginationInfo::of(page as i64, size as i64, total as i64),
        })
    }

    /// 写入判分结果
    pub async fn update_submission_grade_impl(
        &self,
        submission_id: &str,
        score: f64,
        auto_graded: bool,
    ) -> Result<bool> {
        let existing = AssignmentSubmissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("查询提交失败: {e}")))?;

        if existing.is_none() {
            return Ok(false);
        }

        let model = ActiveModel {
            id: Set(submission_id.to_string()),
            score: Set(Some(score)),
            auto_graded: Set(auto_graded),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| AssessmentError::database_operation(format!("写入判分结果失败: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::{Question, QuestionKind};
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use chrono::{Duration, Utc};

    async fn seed_assignment(storage: &SeaOrmStorage) -> String {
        let req = CreateAssignmentRequest {
            course_id: 1,
            title: "测试作业".to_string(),
            description: None,
            instructions: None,
            questions: vec![Question {
                id: "q1".to_string(),
                prompt: "题目".to_string(),
                points: 100.0,
                required: false,
                explanation: None,
                kind: QuestionKind::ShortAnswer {
                    correct_answer: Some("答案".to_string()),
                },
            }],
            due_date: Utc::now() + Duration::days(1),
            allow_late_submission: None,
            late_penalty_per_day: None,
            time_limit_minutes: None,
            is_published: Some(true),
            show_answers_after_deadline: None,
        };
        storage.create_assignment_impl(1, req).await.unwrap().id
    }

    fn submission(student_id: i64, assignment_id: &str, answer: &str) -> Submission {
        let mut answers = HashMap::new();
        answers.insert(
            "q1".to_string(),
            AnswerValue::ShortAnswer(answer.to_string()),
        );
        Submission {
            id: String::new(),
            assignment_id: assignment_id.to_string(),
            student_id,
            answers,
            is_submitted: false,
            submitted_at: None,
            last_saved_at: None,
            is_late: false,
            score: None,
            feedback: None,
            auto_graded: false,
            time_spent_seconds: 30,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // 直接写一行提交记录，时间戳可控
    async fn insert_row(
        storage: &SeaOrmStorage,
        id: &str,
        assignment_id: &str,
        student_id: i64,
        is_submitted: bool,
        submitted_at: Option<i64>,
        last_saved_at: Option<i64>,
        created_at: i64,
    ) {
        let model = ActiveModel {
            id: Set(id.to_string()),
            assignment_id: Set(assignment_id.to_string()),
            student_id: Set(student_id),
            answers: Set("{}".to_string()),
            is_submitted: Set(is_submitted),
            submitted_at: Set(submitted_at),
            last_saved_at: Set(last_saved_at),
            is_late: Set(false),
            score: Set(None),
            feedback: Set(None),
            auto_graded: Set(false),
            time_spent_seconds: Set(0),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };
        model.insert(&storage.db).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_draft_overwrites_same_row() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        let first = storage
            .save_draft_impl(submission(5, &assignment_id, "初稿"))
            .await
            .unwrap();
        assert_eq!(first.id, draft_submission_id(5, &assignment_id));
        assert!(!first.is_submitted);
        assert!(first.last_saved_at.is_some());

        // 把创建时间改到过去，验证第二次保存不动它
        let past = Utc::now().timestamp() - 3600;
        let patch = ActiveModel {
            id: Set(first.id.clone()),
            created_at: Set(past),
            ..Default::default()
        };
        patch.update(&storage.db).await.unwrap();

        let second = storage
            .save_draft_impl(submission(5, &assignment_id, "二稿"))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at.timestamp(), past);
        assert_eq!(
            second.answers.get("q1"),
            Some(&AnswerValue::ShortAnswer("二稿".to_string()))
        );

        let count = AssignmentSubmissions::find()
            .filter(Column::StudentId.eq(5))
            .filter(Column::AssignmentId.eq(assignment_id.as_str()))
            .all(&storage.db)
            .await
            .unwrap()
            .len();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_save_final_removes_draft() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        storage
            .save_draft_impl(submission(5, &assignment_id, "草稿"))
            .await
            .unwrap();

        let stored = storage
            .save_final_impl(submission(5, &assignment_id, "定稿"))
            .await
            .unwrap();
        assert!(stored.is_submitted);
        assert!(stored.submitted_at.is_some());

        // 草稿已被清理
        let draft = storage
            .get_draft_submission_impl(5, &assignment_id)
            .await
            .unwrap();
        assert!(draft.is_none());

        let latest = storage
            .get_latest_submission_impl(5, &assignment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, stored.id);
    }

    #[tokio::test]
    async fn test_save_final_without_draft_is_fine() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        let stored = storage
            .save_final_impl(submission(7, &assignment_id, "直接提交"))
            .await
            .unwrap();
        assert!(stored.is_submitted);
    }

    #[tokio::test]
    async fn test_latest_picks_highest_effective_timestamp() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        // 两次旧的正式提交，外加一份更晚保存的草稿
        insert_row(&storage, "5_a_50000", &assignment_id, 5, true, Some(50), None, 50).await;
        insert_row(&storage, "5_a_90000", &assignment_id, 5, true, Some(90), None, 90).await;
        insert_row(
            &storage,
            &draft_submission_id(5, &assignment_id),
            &assignment_id,
            5,
            false,
            None,
            Some(100),
            10,
        )
        .await;

        let latest = storage
            .get_latest_submission_impl(5, &assignment_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!latest.is_submitted);
        assert_eq!(latest.last_saved_at.unwrap().timestamp(), 100);
    }

    #[tokio::test]
    async fn test_latest_tie_prefers_final_submission() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        insert_row(&storage, "8_a_100000", &assignment_id, 8, true, Some(100), None, 100).await;
        insert_row(
            &storage,
            &draft_submission_id(8, &assignment_id),
            &assignment_id,
            8,
            false,
            None,
            Some(100),
            100,
        )
        .await;

        let latest = storage
            .get_latest_submission_impl(8, &assignment_id)
            .await
            .unwrap()
            .unwrap();
        assert!(latest.is_submitted);
    }

    #[tokio::test]
    async fn test_latest_none_when_no_rows() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        let latest = storage
            .get_latest_submission_impl(99, &assignment_id)
            .await
            .unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_answers_read_as_missing() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        let draft_id = draft_submission_id(6, &assignment_id);
        let model = ActiveModel {
            id: Set(draft_id.clone()),
            assignment_id: Set(assignment_id.clone()),
            student_id: Set(6),
            answers: Set("不是 JSON".to_string()),
            is_submitted: Set(false),
            submitted_at: Set(None),
            last_saved_at: Set(Some(100)),
            is_late: Set(false),
            score: Set(None),
            feedback: Set(None),
            auto_graded: Set(false),
            time_spent_seconds: Set(0),
            created_at: Set(100),
            updated_at: Set(100),
        };
        model.insert(&storage.db).await.unwrap();

        assert!(
            storage
                .get_draft_submission_impl(6, &assignment_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_submission_by_id_impl(&draft_id)
                .await
                .unwrap()
                .is_none()
        );
        // 损坏行被跳过，不影响取最新
        assert!(
            storage
                .get_latest_submission_impl(6, &assignment_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_grade() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        let stored = storage
            .save_final_impl(submission(5, &assignment_id, "定稿"))
            .await
            .unwrap();

        assert!(
            storage
                .update_submission_grade_impl(&stored.id, 88.0, true)
                .await
                .unwrap()
        );
        let graded = storage
            .get_submission_by_id_impl(&stored.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.score, Some(88.0));
        assert!(graded.auto_graded);

        assert!(
            !storage
                .update_submission_grade_impl("不存在", 50.0, false)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_submissions_filters() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let assignment_id = seed_assignment(&storage).await;

        insert_row(&storage, "1_a_1000", &assignment_id, 1, true, Some(1), None, 1).await;
        insert_row(&storage, "2_a_2000", &assignment_id, 2, true, Some(2), None, 2).await;
        insert_row(
            &storage,
            &draft_submission_id(3, &assignment_id),
            &assignment_id,
            3,
            false,
            None,
            Some(3),
            3,
        )
        .await;

        let all = storage
            .list_assignment_submissions_with_pagination_impl(
                &assignment_id,
                SubmissionListQuery {
                    page: Some(1),
                    size: Some(10),
                    student_id: None,
                    submitted_only: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);

        let finals_only = storage
            .list_assignment_submissions_with_pagination_impl(
                &assignment_id,
                SubmissionListQuery {
                    page: Some(1),
                    size: Some(10),
                    student_id: None,
                    submitted_only: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(finals_only.pagination.total, 2);

        let one_student = storage
            .list_assignment_submissions_with_pagination_impl(
                &assignment_id,
                SubmissionListQuery {
                    page: Some(1),
                    size: Some(10),
                    student_id: Some(2),
                    submitted_only: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(one_student.pagination.total, 1);
        assert_eq!(one_student.items[0].student_id, 2);
    }
}
