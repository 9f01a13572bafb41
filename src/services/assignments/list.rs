use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::models::assignments::responses::StudentAssignmentView;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode, PaginatedResponse};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    params: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_current_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let is_student = current_user.role == UserRole::Student;
    let query = AssignmentListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        course_id: params.course_id,
        created_by: params.created_by,
        search: params.search,
        // 学生强制只看已发布
        published_only: if is_student {
            Some(true)
        } else {
            params.published_only
        },
    };

    match storage.list_assignments_with_pagination(query).await {
        Ok(resp) => {
            if is_student {
                let now = chrono::Utc::now();
                let items = resp
                    .items
                    .iter()
                    .map(|a| StudentAssignmentView::from_assignment(a, now))
                    .collect::<Vec<_>>();
                let view = PaginatedResponse {
                    items,
                    pagination: resp.pagination,
                };
                return Ok(
                    HttpResponse::Ok().json(ApiResponse::success(view, "获取作业列表成功"))
                );
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取作业列表成功")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取作业列表失败: {e}"),
            )),
        ),
    }
}
