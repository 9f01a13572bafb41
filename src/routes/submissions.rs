use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::SubmissionListParams;
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;
use crate::utils::SafeAssignmentId;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出某作业的全部提交（教师视角）
pub async fn list_submissions(
    req: HttpRequest,
    path: SafeAssignmentId,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, &path.0, query.into_inner())
        .await
}

// 获取我的最新提交（草稿或正式）
pub async fn get_my_latest_submission(
    req: HttpRequest,
    path: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_my_latest_submission(&req, &path.0)
        .await
}

// 获取我的草稿
pub async fn get_my_draft_submission(
    req: HttpRequest,
    path: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_my_draft_submission(&req, &path.0)
        .await
}

// 获取成绩视图（截止前不披露判定）
pub async fn get_assignment_result(
    req: HttpRequest,
    path: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_assignment_result(&req, &path.0).await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    // 作业下的提交路由
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 全量提交列表 - 仅教师和管理员
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(web::resource("/my/latest").route(web::get().to(get_my_latest_submission)))
            .service(web::resource("/my/draft").route(web::get().to(get_my_draft_submission))),
    );

    // 成绩视图单独挂一个资源，不在这里占用作业前缀
    cfg.service(
        web::resource("/api/v1/assignments/{assignment_id}/result")
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(get_assignment_result)),
    );
}
