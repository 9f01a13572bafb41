use chrono::{DateTime, Utc};

// 截止后 time_remaining 返回的哨兵文案，答题会话据此触发自动提交
pub const DEADLINE_PASSED: &str = "已截止";

// 是否已过截止时间，严格晚于截止时刻才算过期
pub fn is_overdue(due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > due_date
}

// 是否仍可编辑：编辑窗口恰好在截止时刻关闭，与迟交策略无关
pub fn can_edit(due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now <= due_date
}

// 是否可发起提交：截止前总是可以，截止后仅当允许迟交
pub fn can_submit(
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
    allow_late_submission: bool,
) -> bool {
    !is_overdue(due_date, now) || allow_late_submission
}

// 剩余时间文案：取天/小时/分钟里最大的两个非零单位
pub fn time_remaining(due_date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = due_date.signed_duration_since(now);
    if remaining.num_milliseconds() <= 0 {
        return DEADLINE_PASSED.to_string();
    }

    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}天"));
    }
    if hours > 0 {
        parts.push(format!("{hours}小时"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}分钟"));
    }
    if parts.is_empty() {
        // 不足一分钟但尚未截止
        return "不到1分钟".to_string();
    }
    parts.truncate(2);
    parts.join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_predicates_before_deadline() {
        let now = due() - Duration::hours(1);
        assert!(!is_overdue(due(), now));
        assert!(can_edit(due(), now));
        assert!(can_submit(due(), now, false));
    }

    #[test]
    fn test_predicates_at_exact_deadline() {
        // 恰好在截止时刻：未过期、可编辑、可提交（与迟交策略无关）
        let now = due();
        assert!(!is_overdue(due(), now));
        assert!(can_edit(due(), now));
        assert!(can_submit(due(), now, false));
    }

    #[test]
    fn test_predicates_after_deadline() {
        let now = due() + Duration::seconds(1);
        assert!(is_overdue(due(), now));
        assert!(!can_edit(due(), now));
        assert!(!can_submit(due(), now, false));
        // 允许迟交时仍可提交
        assert!(can_submit(due(), now, true));
    }

    #[test]
    fn test_time_remaining_two_largest_units() {
        let now = due() - Duration::days(2) - Duration::hours(5) - Duration::minutes(30);
        assert_eq!(time_remaining(due(), now), "2天5小时");

        // 中间单位为零时跳过
        let now = due() - Duration::days(1) - Duration::minutes(30);
        assert_eq!(time_remaining(due(), now), "1天30分钟");

        let now = due() - Duration::minutes(45);
        assert_eq!(time_remaining(due(), now), "45分钟");
    }

    #[test]
    fn test_time_remaining_under_a_minute() {
        let now = due() - Duration::seconds(30);
        assert_eq!(time_remaining(due(), now), "不到1分钟");
    }

    #[test]
    fn test_time_remaining_sentinel() {
        assert_eq!(time_remaining(due(), due()), DEADLINE_PASSED);
        assert_eq!(
            time_remaining(due(), due() + Duration::seconds(5)),
            DEADLINE_PASSED
        );
    }
}
