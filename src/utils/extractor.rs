use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

// 作业 ID 路径参数，提取时统一校验，handler 里拿到的一定是非空串
pub struct SafeAssignmentId(pub String);

impl SafeAssignmentId {
    // 生成的作业 ID 是 UUID，正常不会超过这个长度
    const MAX_LEN: usize = 64;
}

impl FromRequest for SafeAssignmentId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("assignment_id").unwrap_or("").trim();
        if raw.is_empty() || raw.len() > Self::MAX_LEN {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "无效的作业 ID",
            ));
            return ready(Err(actix_web::error::InternalError::from_response(
                "invalid assignment id",
                response,
            )
            .into()));
        }
        ready(Ok(SafeAssignmentId(raw.to_string())))
    }
}
