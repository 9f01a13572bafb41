use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{AssignmentService, assignment_cache_key};
use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::responses::StudentAssignmentView;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: &str,
) -> ActixResult<HttpResponse> {
    // 获取当前用户信息
    let current_user = match RequireJWT::extract_current_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let cache = service.get_cache(request);
    let storage = service.get_storage(request);
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

    // 学生只能看到已发布的作业，且永远拿不到含答案的原始题目
    if current_user.role == UserRole::Student {
        if !assignment.is_published {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        let view = StudentAssignmentView::from_assignment(&assignment, chrono::Utc::now());
        return Ok(HttpResponse::Ok().json(ApiResponse::success(view, "查询成功")));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "查询成功")))
}

// 读穿透：先查缓存，未命中回源数据库并回填。缓存里的坏数据当未命中并顺手清掉。
// 作业详情和答题开局都走这条路
pub(crate) async fn load_assignment_cached(
    cache: &Arc<dyn ObjectCache>,
    storage: &Arc<dyn Storage>,
    assignment_id: &str,
) -> crate::errors::Result<Option<Assignment>> {
    let cache_key = assignment_cache_key(assignment_id);

    if let CacheResult::Found(json) = cache.get_raw(&cache_key).await {
        match serde_json::from_str::<Assignment>(&json) {
            Ok(assignment) => return Ok(Some(assignment)),
            Err(_) => {
                cache.remove(&cache_key).await;
                tracing::info!("缓存中的作业数据损坏，已清除: {cache_key}");
            }
        }
    }

    let assignment = storage.get_assignment_by_id(assignment_id).await?;

    if let Some(ref assignment) = assignment
        && let Ok(json) = serde_json::to_string(assignment)
    {
        cache
            .insert_raw(cache_key, json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(assignment)
}
