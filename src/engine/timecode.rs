// ==========================================
// 织机班次效率跟踪系统 - 时长编解码
// ==========================================
// 职责: 时长字符串 <-> 秒数 双向转换
// 输入: "H:MM" / "HH:MM" / "HH:MM:SS"（缺秒按 0）
// 红线: 全函数，任何畸形输入都软失败为 0，绝不报错
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 时长精度 (DurationPrecision)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationPrecision {
    /// 输出 "HH:MM"
    Minutes,
    /// 输出 "HH:MM:SS"
    Seconds,
}

/// 解析时长字符串为秒数
///
/// 接受 "H:MM"、"HH:MM"、"HH:MM:SS"，缺省的秒分量按 0。
/// 空串、无冒号、任一分量非数字时返回 0（软失败，不报错）。
pub fn parse_duration(s: &str) -> i64 {
    if s.is_empty() {
        return 0;
    }
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 2 {
        return 0;
    }
    let mut components = [0i64; 3];
    for (i, part) in parts.iter().take(3).enumerate() {
        match part.trim().parse::<i64>() {
            Ok(v) => components[i] = v,
            Err(_) => return 0,
        }
    }
    components[0] * 3600 + components[1] * 60 + components[2]
}

/// 解析时长字符串为分钟数（向下取整到分）
pub fn parse_duration_minutes(s: &str) -> i64 {
    parse_duration(s) / 60
}

/// 将秒数格式化为时长字符串
///
/// 小时/分钟(/秒) 零填充到 2 位；小时不封顶 24（支持跨天累计时长）。
/// 负数输入返回零值（"00:00" 或 "00:00:00"）。
pub fn format_duration(seconds: i64, precision: DurationPrecision) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    match precision {
        DurationPrecision::Minutes => format!("{:02}:{:02}", hours, minutes),
        DurationPrecision::Seconds => {
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds % 60)
        }
    }
}

/// 将分钟数格式化为 "HH:MM"（差值列展示用）
pub fn format_minutes(minutes: i64) -> String {
    format_duration(minutes.max(0) * 60, DurationPrecision::Minutes)
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        assert_eq!(parse_duration("07:05"), 25500);
        assert_eq!(parse_duration("00:00"), 0);
        assert_eq!(parse_duration("12:00"), 43200);
        // 单位小时写法
        assert_eq!(parse_duration("7:05"), 25500);
        // 带秒的历史格式
        assert_eq!(parse_duration("01:02:03"), 3723);
    }

    #[test]
    fn test_parse_soft_failure() {
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("bad"), 0);
        assert_eq!(parse_duration("12"), 0);
        assert_eq!(parse_duration("ab:cd"), 0);
        assert_eq!(parse_duration("12:xx"), 0);
    }

    #[test]
    fn test_parse_over_24h() {
        // 累计时长允许超过 24 小时
        assert_eq!(parse_duration("30:00"), 108000);
    }

    #[test]
    fn test_format_zero_pad() {
        assert_eq!(format_duration(25500, DurationPrecision::Minutes), "07:05");
        assert_eq!(format_duration(3723, DurationPrecision::Seconds), "01:02:03");
        assert_eq!(format_duration(0, DurationPrecision::Minutes), "00:00");
    }

    #[test]
    fn test_format_negative_is_zero() {
        assert_eq!(format_duration(-60, DurationPrecision::Minutes), "00:00");
        assert_eq!(format_duration(-1, DurationPrecision::Seconds), "00:00:00");
    }

    #[test]
    fn test_format_hours_uncapped() {
        assert_eq!(format_duration(108000, DurationPrecision::Minutes), "30:00");
    }

    #[test]
    fn test_round_trip_canonical() {
        for s in ["00:00", "07:05", "12:30", "23:59", "30:15"] {
            assert_eq!(
                format_duration(parse_duration(s), DurationPrecision::Minutes),
                s
            );
        }
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(65), "01:05");
        assert_eq!(format_minutes(-5), "00:00");
    }

    #[test]
    fn test_parse_minutes_floors_seconds() {
        assert_eq!(parse_duration_minutes("07:05"), 425);
        assert_eq!(parse_duration_minutes("00:01:59"), 1);
        assert_eq!(parse_duration_minutes("bad"), 0);
    }
}
