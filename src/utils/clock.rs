use chrono::{DateTime, Utc};

// 时间源，注入以便测试中拨动时钟
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
