//! 单个学生在单份作业上的答题会话状态机。
//!
//! 阶段流转：进行中（带脏标记）与已完成两个主阶段，NotStarted 表示尚无活动会话。
//! 作答后经静默期防抖落草稿；限时作业由倒计时巡检在截止瞬间自动提交一次。

use crate::config::AppConfig;
use crate::errors::{AssessmentError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::{AnswerValue, Submission, draft_submission_id};
use crate::models::submissions::responses::{SessionPhase, SessionView};
use crate::storage::Storage;
use crate::utils::{Clock, deadline};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// 会话参数，生产路径从配置文件读取
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub autosave_debounce: Duration,
    pub countdown_tick: Duration,
    pub enforce_required_questions: bool,
}

impl SessionOptions {
    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self {
            autosave_debounce: Duration::from_secs(config.taking.autosave_debounce_secs),
            countdown_tick: Duration::from_secs(config.taking.countdown_tick_secs),
            enforce_required_questions: config.taking.enforce_required_questions,
        }
    }
}

struct SessionState {
    phase: SessionPhase,
    answers: HashMap<String, AnswerValue>,
    // 有尚未落盘的改动
    dirty: bool,
    // 提交请求在途，挡住并发的重复提交
    in_flight: bool,
    auto_submitted: bool,
    // 恢复会话时继承的累计作答秒数，叠加本段 started_at 起的间隔
    base_time_spent: i64,
    started_at: DateTime<Utc>,
    last_saved_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    submission_id: Option<String>,
    // 每次作答递增，防抖任务据此发现自己已过期
    save_seq: u64,
    debounce_handle: Option<JoinHandle<()>>,
    countdown_handle: Option<JoinHandle<()>>,
}

pub struct AssignmentSession {
    assignment: Assignment,
    student_id: i64,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    options: SessionOptions,
    state: Mutex<SessionState>,
}

impl AssignmentSession {
    /// 开始（或恢复）答题会话。
    /// 已有正式提交直接进入已完成态；有草稿则带着已存答案回到作答态；
    /// 全新开始要求提交窗口仍然开放。
    pub async fn start(
        assignment: Assignment,
        student_id: i64,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Result<Arc<Self>> {
        let now = clock.now();
        let prior = storage
            .get_latest_submission(student_id, &assignment.id)
            .await?;

        let state = match prior {
            Some(submission) if submission.is_submitted => SessionState {
                phase: SessionPhase::Completed,
                answers: submission.answers,
                dirty: false,
                in_flight: false,
                auto_submitted: false,
                base_time_spent: submission.time_spent_seconds,
                started_at: now,
                last_saved_at: submission.last_saved_at,
                submitted_at: submission.submitted_at,
                submission_id: Some(submission.id),
                save_seq: 0,
                debounce_handle: None,
                countdown_handle: None,
            },
            Some(draft) => SessionState {
                phase: SessionPhase::InProgress,
                answers: draft.answers,
                dirty: false,
                in_flight: false,
                auto_submitted: false,
                base_time_spent: draft.time_spent_seconds,
                started_at: now,
                last_saved_at: draft.last_saved_at,
                submitted_at: None,
                submission_id: Some(draft.id),
                save_seq: 0,
                debounce_handle: None,
                countdown_handle: None,
            },
            None => {
                if !deadline::can_submit(
                    assignment.due_date,
                    now,
                    assignment.allow_late_submission,
                ) {
                    return Err(AssessmentError::submission_closed(
                        "作业已截止，无法开始作答",
                    ));
                }
                SessionState {
                    phase: SessionPhase::InProgress,
                    answers: HashMap::new(),
                    dirty: false,
                    in_flight: false,
                    auto_submitted: false,
                    base_time_spent: 0,
                    started_at: now,
                    last_saved_at: None,
                    submitted_at: None,
                    submission_id: None,
                    save_seq: 0,
                    debounce_handle: None,
                    countdown_handle: None,
                }
            }
        };

        let session = Arc::new(Self {
            assignment,
            student_id,
            storage,
            clock,
            options,
            state: Mutex::new(state),
        });

        // 限时作业才挂倒计时巡检
        if session.assignment.time_limit_minutes.is_some() {
            let tick = session.options.countdown_tick;
            let handle = tokio::spawn(Self::countdown_loop(Arc::downgrade(&session), tick));
            session.state.lock().await.countdown_handle = Some(handle);
        }

        Ok(session)
    }

    // 倒计时巡检：每个周期读一次剩余时间，读到截止哨兵且会话仍在作答时
    // 自动提交，且整个会话只发生一次。只持弱引用，会话没了巡检自行退出
    async fn countdown_loop(session: Weak<Self>, tick: Duration) {
        loop {
            tokio::time::sleep(tick).await;
            let Some(session) = session.upgrade() else {
                break;
            };
            let now = session.clock.now();
            let mut state = session.state.lock().await;
            if state.auto_submitted {
                break;
            }
            if state.phase != SessionPhase::InProgress {
                continue;
            }
            if deadline::time_remaining(session.assignment.due_date, now)
                != deadline::DEADLINE_PASSED
            {
                continue;
            }
            // 写入前先置位，后续巡检不会再触发第二次
            state.auto_submitted = true;
            state.in_flight = true;
            if let Err(e) = session.finalize_locked(&mut state, now).await {
                error!(
                    "自动提交失败: {}/{}: {e}",
                    session.student_id, session.assignment.id
                );
            }
            break;
        }
    }

    /// 录入一题答案并标记待保存。静默期满后自动落草稿，新的作答重置静默期
    pub async fn record_answer(
        self: &Arc<Self>,
        question_id: &str,
        answer: AnswerValue,
    ) -> Result<SessionView> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if state.phase != SessionPhase::InProgress {
            return Err(AssessmentError::session_state("会话不在作答中"));
        }
        if !deadline::can_edit(self.assignment.due_date, now) {
            return Err(AssessmentError::submission_closed(
                "已过截止时间，无法继续作答",
            ));
        }
        if self.assignment.question(question_id).is_none() {
            return Err(AssessmentError::validation(format!(
                "题目不存在: {question_id}"
            )));
        }

        state.answers.insert(question_id.to_string(), answer);
        state.dirty = true;
        state.save_seq += 1;
        let seq = state.save_seq;

        if let Some(handle) = state.debounce_handle.take() {
            handle.abort();
        }
        let session = Arc::downgrade(self);
        let debounce = self.options.autosave_debounce;
        state.debounce_handle = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Some(session) = session.upgrade() {
                session.autosave(seq).await;
            }
        }));

        Ok(self.view_locked(&state, now))
    }

    // 防抖到期后的草稿保存。作答序号对不上说明之后又有改动，这次保存作废
    async fn autosave(&self, seq: u64) {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if state.save_seq != seq || state.phase != SessionPhase::InProgress || !state.dirty {
            return;
        }
        if !deadline::can_edit(self.assignment.due_date, now) {
            debug!(
                "已过截止时间，跳过自动保存: {}/{}",
                self.student_id, self.assignment.id
            );
            return;
        }
        let draft = self.build_submission_locked(&state, now);
        match self.storage.save_draft(draft).await {
            Ok(stored) => {
                state.dirty = false;
                state.last_saved_at = stored.last_saved_at;
                state.submission_id = Some(stored.id);
            }
            Err(e) => {
                // 脏标记保留，下个静默期或提交时重试
                warn!(
                    "自动保存失败: {}/{}: {e}",
                    self.student_id, self.assignment.id
                );
            }
        }
    }

    /// 立即保存草稿，不等静默期
    pub async fn save_now(&self) -> Result<SessionView> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if state.phase != SessionPhase::InProgress {
            return Err(AssessmentError::session_state("会话不在作答中"));
        }
        if !deadline::can_edit(self.assignment.due_date, now) {
            return Err(AssessmentError::submission_closed("已过截止时间，无法保存"));
        }
        if let Some(handle) = state.debounce_handle.take() {
            handle.abort();
        }
        state.save_seq += 1;
        let draft = self.build_submission_locked(&state, now);
        let stored = self.storage.save_draft(draft).await?;
        state.dirty = false;
        state.last_saved_at = stored.last_saved_at;
        state.submission_id = Some(stored.id);
        Ok(self.view_locked(&state, now))
    }

    /// 正式提交。窗口校验、必答题校验（可配置）、在途防重，全部通过后写盘。
    /// 写入失败回滚到作答态，脏标记保留
    pub async fn submit(&self) -> Result<SessionView> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if state.phase == SessionPhase::Completed {
            return Err(AssessmentError::already_submitted("作业已提交"));
        }
        if state.in_flight {
            return Err(AssessmentError::submit_in_flight(
                "提交正在进行中，请勿重复操作",
            ));
        }
        if !deadline::can_submit(
            self.assignment.due_date,
            now,
            self.assignment.allow_late_submission,
        ) {
            return Err(AssessmentError::submission_closed(
                "已过截止时间，且本作业不允许迟交",
            ));
        }
        if self.options.enforce_required_questions
            && let Some(question_id) = self.first_unanswered_required(&state.answers)
        {
            return Err(AssessmentError::required_unanswered(format!(
                "必答题未作答: {question_id}"
            )));
        }

        state.in_flight = true;
        self.finalize_locked(&mut state, now).await?;
        Ok(self.view_locked(&state, now))
    }

    // 提交写盘。调用前 in_flight 已置位。先掐掉待触发的自动保存并作废其序号，
    // 避免一次过期的草稿写入跟在正式提交后面
    async fn finalize_locked(&self, state: &mut SessionState, now: DateTime<Utc>) -> Result<()> {
        if let Some(handle) = state.debounce_handle.take() {
            handle.abort();
        }
        state.save_seq += 1;

        let mut submission = self.build_submission_locked(state, now);
        submission.is_late = deadline::is_overdue(self.assignment.due_date, now);

        match self.storage.save_final(submission).await {
            Ok(stored) => {
                state.phase = SessionPhase::Completed;
                state.dirty = false;
                state.in_flight = false;
                state.base_time_spent = stored.time_spent_seconds;
                state.submitted_at = stored.submitted_at;
                state.last_saved_at = stored.last_saved_at;
                state.submission_id = Some(stored.id);
                Ok(())
            }
            Err(e) => {
                state.in_flight = false;
                error!(
                    "正式提交写入失败: {}/{}: {e}",
                    self.student_id, self.assignment.id
                );
                Err(e)
            }
        }
    }

    /// 截止前重新进入作答。已存的正式提交保留原记录，
    /// 再次提交会生成新记录并取代其最新位置
    pub async fn reopen(&self) -> Result<SessionView> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if state.phase != SessionPhase::Completed {
            return Err(AssessmentError::session_state(
                "当前会话尚未提交，无需重新作答",
            ));
        }
        if !deadline::can_edit(self.assignment.due_date, now) {
            return Err(AssessmentError::submission_closed(
                "已过截止时间，无法重新作答",
            ));
        }
        state.phase = SessionPhase::InProgress;
        state.dirty = false;
        state.in_flight = false;
        state.started_at = now;
        Ok(self.view_locked(&state, now))
    }

    /// 当前会话快照
    pub async fn status(&self) -> SessionView {
        let now = self.clock.now();
        let state = self.state.lock().await;
        self.view_locked(&state, now)
    }

    /// 结束会话，掐掉两只定时器。未落盘的改动随会话丢弃
    pub async fn teardown(&self) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.debounce_handle.take() {
            handle.abort();
        }
        if let Some(handle) = state.countdown_handle.take() {
            handle.abort();
        }
    }

    fn first_unanswered_required(&self, answers: &HashMap<String, AnswerValue>) -> Option<String> {
        self.assignment
            .questions
            .iter()
            .find(|q| q.required && !answers.get(&q.id).map(is_answered).unwrap_or(false))
            .map(|q| q.id.clone())
    }

    // 主键由存储层按草稿/正式场景改写，这里填草稿键占位
    fn build_submission_locked(&self, state: &SessionState, now: DateTime<Utc>) -> Submission {
        Submission {
            id: draft_submission_id(self.student_id, &self.assignment.id),
            assignment_id: self.assignment.id.clone(),
            student_id: self.student_id,
            answers: state.answers.clone(),
            is_submitted: false,
            submitted_at: None,
            last_saved_at: state.last_saved_at,
            is_late: false,
            score: None,
            feedback: None,
            auto_graded: false,
            time_spent_seconds: self.time_spent_locked(state, now),
            created_at: now,
            updated_at: now,
        }
    }

    fn view_locked(&self, state: &SessionState, now: DateTime<Utc>) -> SessionView {
        let due = self.assignment.due_date;
        SessionView {
            assignment_id: self.assignment.id.clone(),
            student_id: self.student_id,
            phase: state.phase,
            dirty: state.dirty,
            can_edit: deadline::can_edit(due, now),
            can_submit: deadline::can_submit(due, now, self.assignment.allow_late_submission),
            deadline_passed: deadline::is_overdue(due, now),
            time_remaining: deadline::time_remaining(due, now),
            countdown_seconds: self
                .assignment
                .time_limit_minutes
                .map(|_| (due - now).num_seconds().max(0)),
            answers: state.answers.clone(),
            time_spent_seconds: self.time_spent_locked(state, now),
            last_saved_at: state.last_saved_at,
            submitted_at: state.submitted_at,
            auto_submitted: state.auto_submitted,
        }
    }

    fn time_spent_locked(&self, state: &SessionState, now: DateTime<Utc>) -> i64 {
        match state.phase {
            SessionPhase::InProgress => {
                state.base_time_spent + (now - state.started_at).num_seconds().max(0)
            }
            _ => state.base_time_spent,
        }
    }
}

fn is_answered(answer: &AnswerValue) -> bool {
    match answer {
        AnswerValue::MultipleChoice(text)
        | AnswerValue::ShortAnswer(text)
        | AnswerValue::Essay(text)
        | AnswerValue::FileUpload(text) => !text.trim().is_empty(),
    }
}

/// 没有活动会话时的状态快照，由最近一次持久化记录推导。
/// 有正式提交显示已完成，只有草稿或一无所有都算未开始
pub fn detached_view(
    assignment: &Assignment,
    student_id: i64,
    latest: Option<&Submission>,
    now: DateTime<Utc>,
) -> SessionView {
    let due = assignment.due_date;
    let (phase, answers, time_spent, last_saved_at, submitted_at) = match latest {
        Some(submission) if submission.is_submitted => (
            SessionPhase::Completed,
            submission.answers.clone(),
            submission.time_spent_seconds,
            submission.last_saved_at,
            submission.submitted_at,
        ),
        Some(draft) => (
            SessionPhase::NotStarted,
            draft.answers.clone(),
            draft.time_spent_seconds,
            draft.last_saved_at,
            None,
        ),
        None => (SessionPhase::NotStarted, HashMap::new(), 0, None, None),
    };
    SessionView {
        assignment_id: assignment.id.clone(),
        student_id,
        phase,
        dirty: false,
        can_edit: deadline::can_edit(due, now),
        can_submit: deadline::can_submit(due, now, assignment.allow_late_submission),
        deadline_passed: deadline::is_overdue(due, now),
        time_remaining: deadline::time_remaining(due, now),
        countdown_seconds: assignment
            .time_limit_minutes
            .map(|_| (due - now).num_seconds().max(0)),
        answers,
        time_spent_seconds: time_spent,
        last_saved_at,
        submitted_at,
        auto_submitted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::{Question, QuestionKind};
    use crate::test_support::{MemoryStorage, MockClock};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::atomic::Ordering;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn test_assignment(
        due: DateTime<Utc>,
        time_limit: Option<i64>,
        allow_late: bool,
    ) -> Assignment {
        Assignment {
            id: "a1".to_string(),
            course_id: 1,
            created_by: 2,
            title: "单元测验".to_string(),
            description: None,
            instructions: None,
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    prompt: "选择题".to_string(),
                    points: 60.0,
                    required: true,
                    explanation: None,
                    kind: QuestionKind::MultipleChoice {
                        options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                        correct_answer: 1,
                    },
                },
                Question {
                    id: "q2".to_string(),
                    prompt: "简答题".to_string(),
                    points: 40.0,
                    required: false,
                    explanation: None,
                    kind: QuestionKind::ShortAnswer {
                        correct_answer: Some("42".to_string()),
                    },
                },
            ],
            total_points: 100.0,
            due_date: due,
            allow_late_submission: allow_late,
            late_penalty_per_day: None,
            time_limit_minutes: time_limit,
            is_published: true,
            show_answers_after_deadline: true,
            created_at: due - ChronoDuration::days(7),
            updated_at: due - ChronoDuration::days(7),
        }
    }

    fn test_options(enforce_required: bool) -> SessionOptions {
        SessionOptions {
            autosave_debounce: Duration::from_secs(3),
            countdown_tick: Duration::from_secs(1),
            enforce_required_questions: enforce_required,
        }
    }

    async fn start_session(
        storage: &Arc<MemoryStorage>,
        clock: &Arc<MockClock>,
        assignment: Assignment,
        enforce_required: bool,
    ) -> Arc<AssignmentSession> {
        AssignmentSession::start(
            assignment,
            5,
            storage.clone() as Arc<dyn Storage>,
            clock.clone() as Arc<dyn Clock>,
            test_options(enforce_required),
        )
        .await
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_fires_after_quiet_period() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        session
            .record_answer("q2", AnswerValue::ShortAnswer("42".to_string()))
            .await
            .unwrap();
        assert!(session.status().await.dirty);

        // 静默期未满，不落盘
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(storage.draft_save_count(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(storage.draft_save_count(), 1);
        let view = session.status().await;
        assert!(!view.dirty);
        assert!(view.last_saved_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_edit_restarts_debounce() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        session
            .record_answer("q2", AnswerValue::ShortAnswer("4".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        // 第二次作答重置静默期，原定时点不再触发
        session
            .record_answer("q2", AnswerValue::ShortAnswer("42".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(storage.draft_save_count(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(storage.draft_save_count(), 1);

        let draft = storage.get_draft_submission(5, "a1").await.unwrap().unwrap();
        assert_eq!(
            draft.answers.get("q2"),
            Some(&AnswerValue::ShortAnswer("42".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_cancels_pending_autosave() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        session
            .record_answer("q1", AnswerValue::MultipleChoice("B".to_string()))
            .await
            .unwrap();
        let view = session.submit().await.unwrap();
        assert_eq!(view.phase, SessionPhase::Completed);
        assert!(!view.dirty);
        assert!(view.submitted_at.is_some());

        // 防抖被掐掉，不会再有迟到的草稿写入
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(storage.draft_save_count(), 0);
        assert_eq!(storage.final_save_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_submit_fires_exactly_once() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::hours(1), Some(60), false);
        let session = start_session(&storage, &clock, assignment, false).await;

        session
            .record_answer("q1", AnswerValue::MultipleChoice("B".to_string()))
            .await
            .unwrap();

        // 拨过截止时间，下一个巡检周期触发自动提交
        clock.set(base_time() + ChronoDuration::hours(1) + ChronoDuration::seconds(1));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(storage.final_save_count(), 1);

        // 巡检继续跑也不会第二次提交
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(storage.final_save_count(), 1);
        assert_eq!(storage.draft_save_count(), 0);

        let view = session.status().await;
        assert_eq!(view.phase, SessionPhase::Completed);
        assert!(view.auto_submitted);

        let stored = storage.get_latest_submission(5, "a1").await.unwrap().unwrap();
        assert!(stored.is_submitted);
        assert!(stored.is_late);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_countdown_without_time_limit() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::hours(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        clock.set(base_time() + ChronoDuration::hours(2));
        tokio::time::sleep(Duration::from_secs(5)).await;

        // 不限时作业不自动提交
        assert_eq!(storage.final_save_count(), 0);
        let view = session.status().await;
        assert_eq!(view.phase, SessionPhase::InProgress);
        assert!(view.countdown_seconds.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_failure_rolls_back() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        session
            .record_answer("q1", AnswerValue::MultipleChoice("B".to_string()))
            .await
            .unwrap();

        storage.fail_save_final.store(true, Ordering::SeqCst);
        assert!(session.submit().await.is_err());

        // 回滚到作答态，脏标记保留，可以重试
        let view = session.status().await;
        assert_eq!(view.phase, SessionPhase::InProgress);
        assert!(view.dirty);

        storage.fail_save_final.store(false, Ordering::SeqCst);
        let view = session.submit().await.unwrap();
        assert_eq!(view.phase, SessionPhase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_failure_keeps_dirty() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        storage.fail_save_draft.store(true, Ordering::SeqCst);
        session
            .record_answer("q2", AnswerValue::ShortAnswer("42".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(session.status().await.dirty);

        // 恢复后下一次作答重新落盘
        storage.fail_save_draft.store(false, Ordering::SeqCst);
        session
            .record_answer("q2", AnswerValue::ShortAnswer("43".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!session.status().await.dirty);
        assert_eq!(storage.draft_save_count(), 1);
    }

    #[tokio::test]
    async fn test_start_resumes_from_draft() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);

        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), AnswerValue::MultipleChoice("A".to_string()));
        storage
            .save_draft(Submission {
                id: String::new(),
                assignment_id: "a1".to_string(),
                student_id: 5,
                answers,
                is_submitted: false,
                submitted_at: None,
                last_saved_at: None,
                is_late: false,
                score: None,
                feedback: None,
                auto_graded: false,
                time_spent_seconds: 120,
                created_at: base_time(),
                updated_at: base_time(),
            })
            .await
            .unwrap();

        let session = start_session(&storage, &clock, assignment, false).await;
        let view = session.status().await;
        assert_eq!(view.phase, SessionPhase::InProgress);
        assert_eq!(
            view.answers.get("q1"),
            Some(&AnswerValue::MultipleChoice("A".to_string()))
        );
        assert_eq!(view.time_spent_seconds, 120);
    }

    #[tokio::test]
    async fn test_start_routes_final_to_completed() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);

        storage
            .save_final(Submission {
                id: String::new(),
                assignment_id: "a1".to_string(),
                student_id: 5,
                answers: HashMap::new(),
                is_submitted: true,
                submitted_at: None,
                last_saved_at: None,
                is_late: false,
                score: None,
                feedback: None,
                auto_graded: false,
                time_spent_seconds: 300,
                created_at: base_time(),
                updated_at: base_time(),
            })
            .await
            .unwrap();

        let session = start_session(&storage, &clock, assignment, false).await;
        let view = session.status().await;
        assert_eq!(view.phase, SessionPhase::Completed);
        assert!(view.submitted_at.is_some());
    }

    #[tokio::test]
    async fn test_fresh_start_rejected_after_deadline() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() - ChronoDuration::hours(1), None, false);

        let result = AssignmentSession::start(
            assignment,
            5,
            storage.clone() as Arc<dyn Storage>,
            clock.clone() as Arc<dyn Clock>,
            test_options(false),
        )
        .await;
        assert!(matches!(
            result,
            Err(AssessmentError::SubmissionClosed(_))
        ));

        // 允许迟交则照常开始
        let late_ok = test_assignment(base_time() - ChronoDuration::hours(1), None, true);
        let session = start_session(&storage, &clock, late_ok, false).await;
        assert_eq!(session.status().await.phase, SessionPhase::InProgress);
    }

    #[tokio::test]
    async fn test_record_answer_rejected_after_deadline() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::hours(1), None, true);
        let session = start_session(&storage, &clock, assignment, false).await;

        clock.set(base_time() + ChronoDuration::hours(2));
        let result = session
            .record_answer("q1", AnswerValue::MultipleChoice("B".to_string()))
            .await;
        assert!(matches!(
            result,
            Err(AssessmentError::SubmissionClosed(_))
        ));
    }

    #[tokio::test]
    async fn test_record_answer_unknown_question() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        let result = session
            .record_answer("q99", AnswerValue::ShortAnswer("x".to_string()))
            .await;
        assert!(matches!(result, Err(AssessmentError::Validation(_))));
    }

    #[tokio::test]
    async fn test_required_question_enforced_on_submit() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, true).await;

        // q1 为必答，空白答案也算未作答
        session
            .record_answer("q1", AnswerValue::MultipleChoice("  ".to_string()))
            .await
            .unwrap();
        let result = session.submit().await;
        assert!(matches!(
            result,
            Err(AssessmentError::RequiredUnanswered(_))
        ));

        session
            .record_answer("q1", AnswerValue::MultipleChoice("B".to_string()))
            .await
            .unwrap();
        assert!(session.submit().await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_twice_rejected() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment, false).await;

        session.submit().await.unwrap();
        let result = session.submit().await;
        assert!(matches!(
            result,
            Err(AssessmentError::AlreadySubmitted(_))
        ));
    }

    #[tokio::test]
    async fn test_reopen_before_deadline() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::days(1), None, false);
        let session = start_session(&storage, &clock, assignment.clone(), false).await;

        session
            .record_answer("q1", AnswerValue::MultipleChoice("A".to_string()))
            .await
            .unwrap();
        session.submit().await.unwrap();

        let view = session.reopen().await.unwrap();
        assert_eq!(view.phase, SessionPhase::InProgress);
        assert_eq!(
            view.answers.get("q1"),
            Some(&AnswerValue::MultipleChoice("A".to_string()))
        );

        // 原正式提交仍在，二次提交生成新记录
        session
            .record_answer("q1", AnswerValue::MultipleChoice("B".to_string()))
            .await
            .unwrap();
        session.submit().await.unwrap();
        assert_eq!(storage.final_save_count(), 2);
        let latest = storage.get_latest_submission(5, "a1").await.unwrap().unwrap();
        assert_eq!(
            latest.answers.get("q1"),
            Some(&AnswerValue::MultipleChoice("B".to_string()))
        );
    }

    #[tokio::test]
    async fn test_reopen_rejected_after_deadline() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::hours(1), None, true);
        let session = start_session(&storage, &clock, assignment, false).await;

        session.submit().await.unwrap();
        clock.set(base_time() + ChronoDuration::hours(2));
        let result = session.reopen().await;
        assert!(matches!(
            result,
            Err(AssessmentError::SubmissionClosed(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_aborts_timers() {
        let storage = Arc::new(MemoryStorage::default());
        let clock = Arc::new(MockClock::new(base_time()));
        let assignment = test_assignment(base_time() + ChronoDuration::hours(1), Some(60), false);
        let session = start_session(&storage, &clock, assignment, false).await;

        session
            .record_answer("q2", AnswerValue::ShortAnswer("42".to_string()))
            .await
            .unwrap();
        session.teardown().await;

        clock.set(base_time() + ChronoDuration::hours(2));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(storage.draft_save_count(), 0);
        assert_eq!(storage.final_save_count(), 0);
    }

    #[tokio::test]
    async fn test_detached_view_phases() {
        let now = base_time();
        let assignment = test_assignment(now + ChronoDuration::days(1), Some(30), false);

        let view = detached_view(&assignment, 5, None, now);
        assert_eq!(view.phase, SessionPhase::NotStarted);
        assert!(view.can_submit);
        assert!(view.countdown_seconds.is_some());

        let final_submission = Submission {
            id: "5_a1_123".to_string(),
            assignment_id: "a1".to_string(),
            student_id: 5,
            answers: HashMap::new(),
            is_submitted: true,
            submitted_at: Some(now),
            last_saved_at: None,
            is_late: false,
            score: None,
            feedback: None,
            auto_graded: false,
            time_spent_seconds: 60,
            created_at: now,
            updated_at: now,
        };
        let view = detached_view(&assignment, 5, Some(&final_submission), now);
        assert_eq!(view.phase, SessionPhase::Completed);
        assert_eq!(view.submitted_at, Some(now));
    }
}
