// 业务错误码，随 ApiResponse 的 code 字段返回
// 通用码对齐 HTTP 状态码乘以 100，领域码在对应区间内续编
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 40000,
    Unauthorized = 40100,
    Forbidden = 40300,
    NotFound = 40400,
    InternalServerError = 50000,

    // 资源不存在
    AssignmentNotFound = 40410,
    SubmissionNotFound = 40420,
    SessionNotFound = 40430,

    // 答题策略拒绝（请求本身合法，但当前状态不允许）
    SubmissionClosed = 42210,
    AlreadySubmitted = 42220,
    SubmitInFlight = 42230,
    SessionState = 42240,
    RequiredUnanswered = 42250,
}
