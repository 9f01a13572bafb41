use crate::models::assignments::entities::{Assignment, Question, QuestionKind};
use crate::models::submissions::entities::{AnswerValue, Submission};

// 单题判分结果
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionScore {
    pub question_id: String,
    // None 表示无法自动判定：没作答、题型不参与判分、缺参考答案或答案形状不符
    pub is_correct: Option<bool>,
    pub earned_points: f64,
}

// 一次自动判分的完整结果
#[derive(Debug, Clone)]
pub struct GradeOutcome {
    // 扣分前的百分制得分
    pub raw_score: f64,
    // 迟交扣掉的百分点
    pub penalty: f64,
    // 最终得分，0-100
    pub final_score: f64,
    pub per_question: Vec<QuestionScore>,
}

// 对一次提交自动判分
//
// 逐题累计总分与得分，百分制四舍五入后再扣迟交分。
// 论述题与文件作答不参与自动判分，等人工批改，得分按 0 计。
pub fn auto_grade(assignment: &Assignment, submission: &Submission) -> GradeOutcome {
    let mut total_points = 0.0;
    let mut earned_points = 0.0;
    let mut per_question = Vec::with_capacity(assignment.questions.len());

    for question in &assignment.questions {
        total_points += question.points;
        let is_correct = check_answer(question, submission.answers.get(&question.id));
        let earned = if is_correct == Some(true) {
            question.points
        } else {
            0.0
        };
        earned_points += earned;
        per_question.push(QuestionScore {
            question_id: question.id.clone(),
            is_correct,
            earned_points: earned,
        });
    }

    let raw_score = if total_points > 0.0 {
        (100.0 * earned_points / total_points).round()
    } else {
        0.0
    };

    let penalty = late_penalty(assignment, submission);
    let final_score = (raw_score - penalty).max(0.0);

    GradeOutcome {
        raw_score,
        penalty,
        final_score,
        per_question,
    }
}

// 判定单题答案
fn check_answer(question: &Question, answer: Option<&AnswerValue>) -> Option<bool> {
    match (&question.kind, answer) {
        (
            QuestionKind::MultipleChoice {
                options,
                correct_answer,
            },
            Some(AnswerValue::MultipleChoice(chosen)),
        ) => {
            // 按选项展示文本比较，不按下标；下标越界视为无法判定
            options.get(*correct_answer).map(|expected| chosen == expected)
        }
        (QuestionKind::ShortAnswer { correct_answer }, Some(AnswerValue::ShortAnswer(text))) => {
            // 忽略大小写与首尾空白
            correct_answer
                .as_ref()
                .map(|expected| text.trim().to_lowercase() == expected.trim().to_lowercase())
        }
        // 论述与文件作答一律留给人工批改
        (QuestionKind::Essay { .. }, _) | (QuestionKind::FileUpload, _) => None,
        // 没作答，或答案类型与题型不符
        _ => None,
    }
}

// 迟交扣分：不满一天按一天计，封顶 100
fn late_penalty(assignment: &Assignment, submission: &Submission) -> f64 {
    if !submission.is_late {
        return 0.0;
    }
    let rate = match assignment.late_penalty_per_day {
        Some(rate) if rate > 0.0 => rate,
        _ => return 0.0,
    };
    let submitted_at = match submission.submitted_at {
        Some(at) => at,
        None => return 0.0,
    };
    let late_ms = submitted_at
        .signed_duration_since(assignment.due_date)
        .num_milliseconds();
    if late_ms <= 0 {
        return 0.0;
    }
    let days_late = (late_ms as f64 / 86_400_000.0).ceil();
    (rate * days_late).min(100.0)
}
