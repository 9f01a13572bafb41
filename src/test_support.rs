//! 测试用内存实现：内存存储与可拨动的时钟

use crate::errors::{AssessmentError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    submissions::{
        entities::{Submission, draft_submission_id, final_submission_id},
        requests::SubmissionListQuery,
        responses::SubmissionListResponse,
    },
};
use crate::storage::Storage;
use crate::utils::Clock;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 测试时钟，时间手动拨动
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += duration;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 内存存储，语义与 SeaOrmStorage 对齐，另带失败开关与写入计数
#[derive(Default)]
pub struct MemoryStorage {
    assignments: Mutex<HashMap<String, Assignment>>,
    submissions: Mutex<HashMap<String, Submission>>,
    pub fail_save_draft: AtomicBool,
    pub fail_save_final: AtomicBool,
    pub draft_saves: AtomicUsize,
    pub final_saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn put_assignment(&self, assignment: Assignment) {
        self.assignments
            .lock()
            .unwrap()
            .insert(assignment.id.clone(), assignment);
    }

    pub fn draft_save_count(&self) -> usize {
        self.draft_saves.load(Ordering::SeqCst)
    }

    pub fn final_save_count(&self) -> usize {
        self.final_saves.load(Ordering::SeqCst)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = Utc::now();
        let assignment = Assignment {
            id: uuid::Uuid::new_v4().to_string(),
            course_id: req.course_id,
            created_by,
            title: req.title,
            description: req.description,
            instructions: req.instructions,
            total_points: req.questions.iter().map(|q| q.points).sum(),
            questions: req.questions,
            due_date: req.due_date,
            allow_late_submission: req.allow_late_submission.unwrap_or(false),
            late_penalty_per_day: req.late_penalty_per_day,
            time_limit_minutes: req.time_limit_minutes,
            is_published: req.is_published.unwrap_or(false),
            show_answers_after_deadline: req.show_answers_after_deadline.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        self.put_assignment(assignment.clone());
        Ok(assignment)
    }

    async fn get_assignment_by_id(&self, assignment_id: &str) -> Result<Option<Assignment>> {
        Ok(self.assignments.lock().unwrap().get(assignment_id).cloned())
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let size = query.size.unwrap_or(10).clamp(1, 100);
        let mut items: Vec<Assignment> = self
            .assignments
            .lock()
            .unwrap()
            .values()
            .filter(|a| query.course_id.is_none_or(|c| a.course_id == c))
            .filter(|a| query.created_by.is_none_or(|c| a.created_by == c))
            .filter(|a| !query.published_only.unwrap_or(false) || a.is_published)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(((page - 1) * size) as usize)
            .take(size as usize)
            .collect();
        Ok(AssignmentListResponse {
            items,
            pagination: PaginationInfo::of(page, size, total),
        })
    }

    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let mut assignments = self.assignments.lock().unwrap();
        let Some(assignment) = assignments.get_mut(assignment_id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            assignment.title = title;
        }
        if update.description.is_some() {
            assignment.description = update.description;
        }
        if update.instructions.is_some() {
            assignment.instructions = update.instructions;
        }
        if let Some(questions) = update.questions {
            assignment.total_points = questions.iter().map(|q| q.points).sum();
            assignment.questions = questions;
        }
        if let Some(due_date) = update.due_date {
            assignment.due_date = due_date;
        }
        if let Some(allow) = update.allow_late_submission {
            assignment.allow_late_submission = allow;
        }
        if update.late_penalty_per_day.is_some() {
            assignment.late_penalty_per_day = update.late_penalty_per_day;
        }
        if update.time_limit_minutes.is_some() {
            assignment.time_limit_minutes = update.time_limit_minutes;
        }
        if let Some(published) = update.is_published {
            assignment.is_published = published;
        }
        if let Some(show) = update.show_answers_after_deadline {
            assignment.show_answers_after_deadline = show;
        }
        assignment.updated_at = Utc::now();
        Ok(Some(assignment.clone()))
    }

    async fn delete_assignment(&self, assignment_id: &str) -> Result<bool> {
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .remove(assignment_id)
            .is_some())
    }

    async fn save_draft(&self, submission: Submission) -> Result<Submission> {
        if self.fail_save_draft.load(Ordering::SeqCst) {
            return Err(AssessmentError::database_operation("注入的草稿写入失败"));
        }
        self.draft_saves.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let draft_id = draft_submission_id(submission.student_id, &submission.assignment_id);
        let mut submissions = self.submissions.lock().unwrap();
        let created_at = submissions
            .get(&draft_id)
            .map(|existing| existing.created_at)
            .unwrap_or(now);
        let stored = Submission {
            id: draft_id.clone(),
            is_submitted: false,
            submitted_at: None,
            last_saved_at: Some(now),
            created_at,
            updated_at: now,
            ..submission
        };
        submissions.insert(draft_id, stored.clone());
        Ok(stored)
    }

    async fn save_final(&self, submission: Submission) -> Result<Submission> {
        if self.fail_save_final.load(Ordering::SeqCst) {
            return Err(AssessmentError::database_operation("注入的提交写入失败"));
        }
        self.final_saves.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let final_id = final_submission_id(submission.student_id, &submission.assignment_id, now);
        let draft_id = draft_submission_id(submission.student_id, &submission.assignment_id);
        let stored = Submission {
            id: final_id.clone(),
            is_submitted: true,
            submitted_at: Some(now),
            created_at: now,
            updated_at: now,
            ..submission
        };
        let mut submissions = self.submissions.lock().unwrap();
        submissions.insert(final_id, stored.clone());
        submissions.remove(&draft_id);
        Ok(stored)
    }

    async fn get_latest_submission(
        &self,
        student_id: i64,
        assignment_id: &str,
    ) -> Result<Option<Submission>> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.student_id == student_id && s.assignment_id == assignment_id)
            .cloned()
            .max_by(|a, b| {
                a.effective_timestamp()
                    .cmp(&b.effective_timestamp())
                    .then(a.is_submitted.cmp(&b.is_submitted))
            }))
    }

    async fn get_draft_submission(
        &self,
        student_id: i64,
        assignment_id: &str,
    ) -> Result<Option<Submission>> {
        let draft_id = draft_submission_id(student_id, assignment_id);
        Ok(self.submissions.lock().unwrap().get(&draft_id).cloned())
    }

    async fn get_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>> {
        Ok(self.submissions.lock().unwrap().get(submission_id).cloned())
    }

    async fn list_assignment_submissions_with_pagination(
        &self,
        assignment_id: &str,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let size = query.size.unwrap_or(10).clamp(1, 100);
        let mut items: Vec<Submission> = self
            .submissions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.assignment_id == assignment_id)
            .filter(|s| query.student_id.is_none_or(|id| s.student_id == id))
            .filter(|s| !query.submitted_only.unwrap_or(false) || s.is_submitted)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(((page - 1) * size) as usize)
            .take(size as usize)
            .collect();
        Ok(SubmissionListResponse {
            items,
            pagination: PaginationInfo::of(page, size, total),
        })
    }

    async fn update_submission_grade(
        &self,
        submission_id: &str,
        score: f64,
        auto_graded: bool,
    ) -> Result<bool> {
        let mut submissions = self.submissions.lock().unwrap();
        match submissions.get_mut(submission_id) {
            Some(submission) => {
                submission.score = Some(score);
                submission.auto_graded = auto_graded;
                submission.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
