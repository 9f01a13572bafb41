pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
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

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, created_by, req).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, query).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
        req: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, req).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: &str,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }
}

// 缓存键：答题热路径按作业 ID 做读穿透，教师改动后按键失效
pub(crate) fn assignment_cache_key(assignment_id: &str) -> String {
    format!("assignment:{assignment_id}")
}

// 题目列表校验。判分与作答都假设题目 ID 唯一、选择题答案下标在选项范围内，
// 坏数据必须挡在写入之前
pub(super) fn validate_questions(
    questions: &[crate::models::assignments::entities::Question],
) -> Result<(), String> {
    use crate::models::assignments::entities::QuestionKind;
    let mut seen = std::collections::HashSet::new();

    for question in questions {
        if question.id.trim().is_empty() {
            return Err("题目 ID 不能为空".to_string());
        }
        if !seen.insert(question.id.as_str()) {
            return Err(format!("题目 ID 重复: {}", question.id));
        }
        if question.points < 0.0 {
            return Err(format!("题目分值不能为负: {}", question.id));
        }
        if let QuestionKind::MultipleChoice {
            options,
            correct_answer,
        } = &question.kind
            && *correct_answer >= options.len()
        {
            return Err(format!("选择题正确答案下标越界: {}", question.id));
        }
    }
    Ok(())
}
