use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::SubmissionService;
use crate::grading;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 成绩视图：按请求时刻现算判分与披露范围。
/// 截止后首次算出的分数顺手落库，落库失败不影响本次返回
pub async fn get_assignment_result(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user_id = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    let submission = match storage.get_latest_submission(user_id, assignment_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "暂无提交记录",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交记录失败: {e}"),
                )),
            );
        }
    };

    let mut result = grading::calculate_result(&assignment, &submission, chrono::Utc::now());

    // 判分结果首次可见时写回存储，之后的请求直接取已落库的分数。
    // 人工改过的分不会被覆盖：有落库分数时这里不再执行
    if submission.is_submitted
        && submission.score.is_none()
        && let Some(score) = result.score
    {
        match storage
            .update_submission_grade(&submission.id, score, true)
            .await
        {
            Ok(_) => result.auto_graded = true,
            Err(e) => warn!("判分结果落库失败: {}: {e}", submission.id),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(result, "查询成功")))
}
