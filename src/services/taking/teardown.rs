use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TakingService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 结束会话并掐掉定时器。未落盘的改动随会话丢弃，已存草稿不受影响
pub async fn teardown_session(
    service: &TakingService,
    request: &HttpRequest,
    assignment_id: &str,
) -> ActixResult<HttpResponse> {
    let current_user = match RequireJWT::extract_current_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    if service
        .registry
        .remove(current_user.id, assignment_id)
        .await
    {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("会话已结束")))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SessionNotFound,
            "会话不存在",
        )))
    }
}
