use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TakingService;
use crate::lifecycle::session::detached_view;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::detail::load_assignment_cached;

pub async fn session_status(
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

    // 有活动会话直接给实时快照
    if let Some(session) = service.registry.get(current_user.id, assignment_id) {
        let view = session.status().await;
        return Ok(HttpResponse::Ok().json(ApiResponse::success(view, "查询成功")));
    }

    // 没有活动会话时由持久化记录推导状态，GET 不产生副作用
    let storage = service.get_storage(request);
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

    if current_user.role == UserRole::Student && !assignment.is_published {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        )));
    }

    let latest = match storage
        .get_latest_submission(current_user.id, assignment_id)
        .await
    {
        Ok(latest) => latest,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交记录失败: {e}"),
                )),
            );
        }
    };

    let view = detached_view(
        &assignment,
        current_user.id,
        latest.as_ref(),
        service.clock.now(),
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(view, "查询成功")))
}
