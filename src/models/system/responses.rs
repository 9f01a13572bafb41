use serde::Serialize;
use ts_rs::TS;

/// 系统状态响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemStatusResponse {
    pub system_name: String, // 系统名称
    pub version: String,     // 构建版本
    pub environment: String, // 运行环境
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub uptime_seconds: i64,
}
