use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TakingService, policy_error_response};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn submit(
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

    let session = match service.registry.get(current_user.id, assignment_id) {
        Some(session) => session,
        None => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SessionNotFound,
                "会话不存在，请先开始作答",
            )));
        }
    };

    match session.submit().await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view, "提交成功"))),
        Err(e) => Ok(policy_error_response(&e)),
    }
}
