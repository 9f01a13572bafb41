use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TakingService, policy_error_response};
use crate::lifecycle::SessionOptions;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::detail::load_assignment_cached;

pub async fn start_session(
    service: &TakingService,
    request: &HttpRequest,
    assignment_id: &str,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_current_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let cache = service.get_cache(request);
    let assignment = match load_assignment_cached(&cache, &storage, assignment_id).await {
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

    // 未发布的作业对学生等同于不存在
    if current_user.role == UserRole::Student && !assignment.is_published {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        )));
    }

    match service
        .registry
        .start(
            assignment,
            current_user.id,
            storage,
            service.clock.clone(),
            SessionOptions::from_config(),
        )
        .await
    {
        Ok(session) => {
            let view = session.status().await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(view, "会话已开始")))
        }
        Err(e) => Ok(policy_error_response(&e)),
    }
}
