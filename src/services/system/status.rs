use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::system::responses::SystemStatusResponse;
use crate::models::{ApiResponse, AppStartTime, ErrorCode};

/// 系统状态：版本、环境与运行时长
pub async fn get_system_status(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let start_time = match request.app_data::<web::Data<AppStartTime>>() {
        Some(start_time) => start_time.get_ref().clone(),
        None => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "启动时间未注册",
                )),
            );
        }
    };

    let now = chrono::Utc::now();
    let response = SystemStatusResponse {
        system_name: config.app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.app.environment.clone(),
        started_at: start_time.start_datetime,
        uptime_seconds: (now - start_time.start_datetime).num_seconds(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
