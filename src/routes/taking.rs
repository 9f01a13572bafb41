use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::SaveAnswerRequest;
use crate::services::TakingService;
use crate::utils::SafeAssignmentId;

// 懒加载的全局 TakingService 实例，会话注册表随之常驻
static TAKING_SERVICE: Lazy<TakingService> = Lazy::new(TakingService::new_lazy);

// 开始（或恢复）答题会话
pub async fn start_session(req: HttpRequest, path: SafeAssignmentId) -> ActixResult<HttpResponse> {
    TAKING_SERVICE.start_session(&req, &path.0).await
}

// 会话状态快照
pub async fn session_status(
    req: HttpRequest,
    path: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    TAKING_SERVICE.session_status(&req, &path.0).await
}

// 录入单题答案
pub async fn record_answer(
    req: HttpRequest,
    path: SafeAssignmentId,
    body: web::Json<SaveAnswerRequest>,
) -> ActixResult<HttpResponse> {
    TAKING_SERVICE
        .record_answer(&req, &path.0, body.into_inner())
        .await
}

// 立即保存草稿
pub async fn save_draft(req: HttpRequest, path: SafeAssignmentId) -> ActixResult<HttpResponse> {
    TAKING_SERVICE.save_draft(&req, &path.0).await
}

// 正式提交
pub async fn submit(req: HttpRequest, path: SafeAssignmentId) -> ActixResult<HttpResponse> {
    TAKING_SERVICE.submit(&req, &path.0).await
}

// 截止前重新作答
pub async fn reopen(req: HttpRequest, path: SafeAssignmentId) -> ActixResult<HttpResponse> {
    TAKING_SERVICE.reopen(&req, &path.0).await
}

// 结束会话
pub async fn teardown_session(
    req: HttpRequest,
    path: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    TAKING_SERVICE.teardown_session(&req, &path.0).await
}

// 配置路由
pub fn configure_taking_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/session")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::post().to(start_session))
                    .route(web::get().to(session_status))
                    .route(web::delete().to(teardown_session)),
            )
            .service(web::resource("/answer").route(web::put().to(record_answer)))
            .service(web::resource("/save").route(web::post().to(save_draft)))
            .service(web::resource("/submit").route(web::post().to(submit)))
            .service(web::resource("/reopen").route(web::post().to(reopen))),
    );
}
