//! 活动会话登记表，同一 (student, assignment) 至多一个活动会话

use crate::errors::Result;
use crate::lifecycle::session::{AssignmentSession, SessionOptions};
use crate::models::assignments::entities::Assignment;
use crate::storage::Storage;
use crate::utils::Clock;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<(i64, String), Arc<AssignmentSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// 取出已有会话，没有则新建。重复开始拿到的是同一个会话
    pub async fn start(
        &self,
        assignment: Assignment,
        student_id: i64,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Result<Arc<AssignmentSession>> {
        let key = (student_id, assignment.id.clone());
        if let Some(existing) = self.sessions.get(&key) {
            return Ok(existing.clone());
        }

        let session =
            AssignmentSession::start(assignment, student_id, storage, clock, options).await?;

        // 并发开始时先落表的胜出，后建的立即收掉
        let (winner, loser) = match self.sessions.entry(key) {
            Entry::Occupied(entry) => (entry.get().clone(), Some(session)),
            Entry::Vacant(entry) => {
                entry.insert(session.clone());
                (session, None)
            }
        };
        if let Some(loser) = loser {
            loser.teardown().await;
        }
        Ok(winner)
    }

    pub fn get(&self, student_id: i64, assignment_id: &str) -> Option<Arc<AssignmentSession>> {
        self.sessions
            .get(&(student_id, assignment_id.to_string()))
            .map(|entry| entry.clone())
    }

    /// 移除并结束会话，返回会话是否存在
    pub async fn remove(&self, student_id: i64, assignment_id: &str) -> bool {
        match self
            .sessions
            .remove(&(student_id, assignment_id.to_string()))
        {
            Some((_, session)) => {
                session.teardown().await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::{Question, QuestionKind};
    use crate::test_support::{MemoryStorage, MockClock};
    use chrono::{Duration, TimeZone, Utc};

    fn quiz(id: &str) -> Assignment {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        Assignment {
            id: id.to_string(),
            course_id: 1,
            created_by: 2,
            title: "测验".to_string(),
            description: None,
            instructions: None,
            questions: vec![Question {
                id: "q1".to_string(),
                prompt: "题目".to_string(),
                points: 100.0,
                required: false,
                explanation: None,
                kind: QuestionKind::ShortAnswer {
                    correct_answer: None,
                },
            }],
            total_points: 100.0,
            due_date: now + Duration::days(1),
            allow_late_submission: false,
            late_penalty_per_day: None,
            time_limit_minutes: None,
            is_published: true,
            show_answers_after_deadline: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn options() -> SessionOptions {
        SessionOptions {
            autosave_debounce: std::time::Duration::from_secs(3),
            countdown_tick: std::time::Duration::from_secs(1),
            enforce_required_questions: false,
        }
    }

    #[tokio::test]
    async fn test_start_is_idempotent_per_pair() {
        let registry = SessionRegistry::new();
        let storage = Arc::new(MemoryStorage::default()) as Arc<dyn crate::storage::Storage>;
        let clock = Arc::new(MockClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )) as Arc<dyn Clock>;

        let first = registry
            .start(quiz("a1"), 5, storage.clone(), clock.clone(), options())
            .await
            .unwrap();
        let second = registry
            .start(quiz("a1"), 5, storage.clone(), clock.clone(), options())
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // 不同学生各有各的会话
        let other = registry
            .start(quiz("a1"), 6, storage, clock, options())
            .await
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn test_remove_tears_down_session() {
        let registry = SessionRegistry::new();
        let storage = Arc::new(MemoryStorage::default()) as Arc<dyn crate::storage::Storage>;
        let clock = Arc::new(MockClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        )) as Arc<dyn Clock>;

        registry
            .start(quiz("a1"), 5, storage, clock, options())
            .await
            .unwrap();
        assert!(registry.get(5, "a1").is_some());

        assert!(registry.remove(5, "a1").await);
        assert!(registry.get(5, "a1").is_none());
        // 再删一次返回 false
        assert!(!registry.remove(5, "a1").await);
    }
}
