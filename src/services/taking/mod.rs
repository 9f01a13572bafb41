pub mod answer;
pub mod reopen;
pub mod save;
pub mod start;
pub mod status;
pub mod submit;
pub mod teardown;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::AssessmentError;
use crate::lifecycle::SessionRegistry;
use crate::models::submissions::requests::SaveAnswerRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::{Clock, SystemClock};

pub struct TakingService {
    storage: Option<Arc<dyn Storage>>,
    registry: Arc<SessionRegistry>,
    clock: Arc<dyn Clock>,
}

impl TakingService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            registry: Arc::new(SessionRegistry::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    pub async fn start_session(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        start::start_session(self, request, assignment_id).await
    }

    pub async fn session_status(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        status::session_status(self, request, assignment_id).await
    }

    pub async fn record_answer(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
        req: SaveAnswerRequest,
    ) -> ActixResult<HttpResponse> {
        answer::record_answer(self, request, assignment_id, req).await
    }

    pub async fn save_draft(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        save::save_draft(self, request, assignment_id).await
    }

    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        submit::submit(self, request, assignment_id).await
    }

    pub async fn reopen(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        reopen::reopen(self, request, assignment_id).await
    }

    pub async fn teardown_session(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        teardown::teardown_session(self, request, assignment_id).await
    }
}

// 策略拒绝按领域错误码原样返回，给前端足够的信息提示用户；
// 其余一律归为服务器内部错误
pub(super) fn policy_error_response(err: &AssessmentError) -> HttpResponse {
    match err {
        AssessmentError::SubmissionClosed(_) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::SubmissionClosed, err.message()),
        ),
        AssessmentError::AlreadySubmitted(_) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::AlreadySubmitted, err.message()),
        ),
        AssessmentError::SubmitInFlight(_) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::SubmitInFlight, err.message()),
        ),
        AssessmentError::SessionState(_) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::SessionState, err.message()),
        ),
        AssessmentError::RequiredUnanswered(_) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::RequiredUnanswered, err.message()),
        ),
        AssessmentError::Validation(_) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::BadRequest, err.message()),
        ),
        _ => HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            format!("操作失败: {err}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(response: &HttpResponse) -> u16 {
        response.status().as_u16()
    }

    #[test]
    fn test_policy_errors_map_to_422() {
        let closed = AssessmentError::submission_closed("x");
        assert_eq!(code_of(&policy_error_response(&closed)), 422);
        let dup = AssessmentError::already_submitted("x");
        assert_eq!(code_of(&policy_error_response(&dup)), 422);
        let required = AssessmentError::required_unanswered("x");
        assert_eq!(code_of(&policy_error_response(&required)), 422);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = AssessmentError::validation("题目不存在");
        assert_eq!(code_of(&policy_error_response(&err)), 400);
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        let err = AssessmentError::database_operation("boom");
        assert_eq!(code_of(&policy_error_response(&err)), 500);
    }
}
