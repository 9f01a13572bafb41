use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TakingService, policy_error_response};
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::SaveAnswerRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn record_answer(
    service: &TakingService,
    request: &HttpRequest,
    assignment_id: &str,
    req: SaveAnswerRequest,
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

    match session.record_answer(&req.question_id, req.answer).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view, "已记录"))),
        Err(e) => Ok(policy_error_response(&e)),
    }
}
