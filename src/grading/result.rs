use chrono::{DateTime, Utc};

use crate::grading::engine;
use crate::models::assignments::entities::{Assignment, Question, QuestionKind};
use crate::models::submissions::entities::Submission;
use crate::models::submissions::responses::{AssignmentResultView, QuestionFeedback};
use crate::utils::deadline;

// 计算成绩视图
//
// 披露规则：
// - 正确性与得分仅在截止之后且为正式提交时计算，提前交卷的学生在截止前看不到分数；
// - 正确答案与解析还要求作业开启了截止后公布答案。
pub fn calculate_result(
    assignment: &Assignment,
    submission: &Submission,
    now: DateTime<Utc>,
) -> AssignmentResultView {
    let deadline_passed = deadline::is_overdue(assignment.due_date, now);
    let correctness_visible = deadline_passed && submission.is_submitted;
    let answers_visible = correctness_visible && assignment.show_answers_after_deadline;

    let outcome = correctness_visible.then(|| engine::auto_grade(assignment, submission));

    let questions = assignment
        .questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let (is_correct, earned_points) = match &outcome {
                Some(outcome) => {
                    let scored = &outcome.per_question[idx];
                    (scored.is_correct, scored.earned_points)
                }
                None => (None, 0.0),
            };
            QuestionFeedback {
                question_id: question.id.clone(),
                prompt: question.prompt.clone(),
                points: question.points,
                your_answer: submission.answers.get(&question.id).cloned(),
                is_correct,
                earned_points,
                correct_answer: if answers_visible {
                    correct_answer_text(question)
                } else {
                    None
                },
                explanation: if answers_visible {
                    question.explanation.clone()
                } else {
                    None
                },
            }
        })
        .collect();

    // 已落库的分数（人工改分或先前判分）优先于现算分数
    let score = if correctness_visible {
        submission
            .score
            .or_else(|| outcome.as_ref().map(|o| o.final_score))
    } else {
        None
    };

    AssignmentResultView {
        assignment_id: assignment.id.clone(),
        assignment_title: assignment.title.clone(),
        submission_id: submission.id.clone(),
        is_submitted: submission.is_submitted,
        submitted_at: submission.submitted_at,
        is_late: submission.is_late,
        deadline_passed,
        answers_visible,
        score,
        auto_graded: submission.auto_graded,
        feedback: submission.feedback.clone(),
        questions,
    }
}

// 可公布的正确答案文本
fn correct_answer_text(question: &Question) -> Option<String> {
    match &question.kind {
        QuestionKind::MultipleChoice {
            options,
            correct_answer,
        } => options.get(*correct_answer).cloned(),
        QuestionKind::ShortAnswer { correct_answer } => correct_answer.clone(),
        QuestionKind::Essay { reference_answer } => reference_answer.clone(),
        QuestionKind::FileUpload => None,
    }
}
