// ==========================================
// 织机班次效率跟踪系统 - 系统设置领域模型
// ==========================================
// 对齐: settings 表（单例行 id=1）
// 缺行时返回默认值，核心逻辑不得因设置缺失而失败
// ==========================================

use serde::{Deserialize, Serialize};

/// 低效率告警阈值默认值（百分比）
pub const DEFAULT_LOW_EFFICIENCY_THRESHOLD: i64 = 80;

// ==========================================
// Settings - 系统设置（单例）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// 机台总数，决定"全机台"视图的花名册 1..=N
    pub total_machines: Option<i64>,
    /// 低效率告警阈值（百分比）
    pub low_efficiency_threshold: Option<i64>,
    /// 告警通知号码（仅通知协作方使用）
    pub notify_number: Option<String>,
    /// 告警消息模板（仅通知协作方使用）
    pub notify_template: Option<String>,
}

impl Settings {
    /// 生效的告警阈值（缺失时取默认 80）
    pub fn effective_threshold(&self) -> i64 {
        self.low_efficiency_threshold
            .unwrap_or(DEFAULT_LOW_EFFICIENCY_THRESHOLD)
    }

    /// 机台花名册 "1".."N"（total_machines 缺失或为 0 时为空）
    pub fn machine_roster(&self) -> Vec<String> {
        let n = self.total_machines.unwrap_or(0).max(0);
        (1..=n).map(|i| i.to_string()).collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_machines: None,
            low_efficiency_threshold: None,
            notify_number: None,
            notify_template: None,
        }
    }
}
