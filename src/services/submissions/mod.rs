pub mod latest;
pub mod list;
pub mod result;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::SubmissionListParams;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    /// 当前用户在该作业下的最近一次提交（草稿或正式）
    pub async fn get_my_latest_submission(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        latest::get_my_latest_submission(self, request, assignment_id).await
    }

    /// 当前用户在该作业下的草稿
    pub async fn get_my_draft_submission(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        latest::get_my_draft_submission(self, request, assignment_id).await
    }

    /// 成绩视图（判分 + 按时间决定披露范围）
    pub async fn get_assignment_result(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        result::get_assignment_result(self, request, assignment_id).await
    }

    /// 教师视角的提交列表
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
        params: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, assignment_id, params).await
    }
}
