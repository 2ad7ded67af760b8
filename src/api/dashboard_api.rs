// ==========================================
// 织机班次效率跟踪系统 - 看板 API
// ==========================================
// 职责: 看板聚合查询（近 N 日汇总 / 机台今昨对比 / 低效率告警）
// 架构: API 层 -> 仓储取数 -> 聚合/告警引擎计算
// 说明: 收到变更事件后的正确响应是重新调用本层接口——
//       全量重算，无增量路径
// ==========================================

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::engine::aggregate::{AggregateEngine, DailySummary, MachineDayComparison};
use crate::engine::alert::{AlertEngine, LowPerformer};
use crate::repository::record_repo::EfficiencyRecordRepository;
use crate::repository::settings_repo::SettingsRepository;

/// 看板日卡窗口天数（含今天）
pub const SUMMARY_CARD_DAYS: u32 = 9;
/// 趋势图窗口天数
pub const TREND_CHART_DAYS: u32 = 30;
/// 低效率告警回溯天数
pub const ALERT_LOOKBACK_DAYS: i64 = 3;

// ==========================================
// LowEfficiencyAlert - 告警查询结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowEfficiencyAlert {
    /// 实际采用的阈值（设置缺失时为默认 80）
    pub threshold_pct: i64,
    /// 低效机台，效率升序（最差在前）
    pub machines: Vec<LowPerformer>,
    /// 通知号码（透传给外部通知协作方，消息拼装不在本层）
    pub notify_number: Option<String>,
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================

/// 看板API
///
/// 职责：
/// 1. 近 N 日汇总（日卡 9 天 / 趋势图 30 天，缺数据日期补零）
/// 2. 机台维度今昨对比（花名册取自设置，无记录机台全零）
/// 3. 低效率告警（近 3 日加权聚合，0% 视为无数据不告警）
pub struct DashboardApi {
    record_repo: Arc<EfficiencyRecordRepository>,
    settings_repo: Arc<SettingsRepository>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(
        record_repo: Arc<EfficiencyRecordRepository>,
        settings_repo: Arc<SettingsRepository>,
    ) -> Self {
        Self {
            record_repo,
            settings_repo,
        }
    }

    /// 近 N 日汇总（含 today 当天，新日期在前，恒为 days 条）
    pub fn daily_summaries(&self, today: NaiveDate, days: u32) -> ApiResult<Vec<DailySummary>> {
        if days == 0 {
            return Err(ApiError::InvalidInput("窗口天数必须大于 0".to_string()));
        }
        let from = today - Duration::days(days as i64 - 1);
        let records = self
            .record_repo
            .list_between(from, today)
            .map_err(ApiError::from_repository)?;
        debug!(count = records.len(), days, "看板日汇总取数完成");
        Ok(AggregateEngine::daily_summaries(&records, today, days))
    }

    /// 机台维度今昨对比
    ///
    /// 花名册取自 Settings.total_machines（1..=N）；设置缺失时
    /// 花名册为空，返回空列表（与原看板行为一致）
    pub fn machine_comparison(&self, today: NaiveDate) -> ApiResult<Vec<MachineDayComparison>> {
        let yesterday = today - Duration::days(1);
        let settings = self.settings_repo.get().map_err(ApiError::from_repository)?;
        let roster = settings.machine_roster();

        let records = self
            .record_repo
            .list_between(yesterday, today)
            .map_err(ApiError::from_repository)?;

        let (today_records, yesterday_records): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| r.date == today);

        Ok(AggregateEngine::machine_comparison(
            &today_records,
            &yesterday_records,
            &roster,
        ))
    }

    /// 低效率告警（近 3 日）
    ///
    /// 取 date >= today - 3 天的记录（与原实现同口径），按机台
    /// 加权聚合后筛出 0 < 效率 < 阈值的机台
    pub fn low_efficiency_alert(&self, today: NaiveDate) -> ApiResult<LowEfficiencyAlert> {
        let settings = self.settings_repo.get().map_err(ApiError::from_repository)?;
        let threshold = settings.effective_threshold();

        let from = today - Duration::days(ALERT_LOOKBACK_DAYS);
        let records = self
            .record_repo
            .list_between(from, today)
            .map_err(ApiError::from_repository)?;

        let machines = AlertEngine::find_low_performers(&records, threshold as f64);
        debug!(
            threshold,
            low_count = machines.len(),
            "低效率告警评估完成"
        );

        Ok(LowEfficiencyAlert {
            threshold_pct: threshold,
            machines,
            notify_number: settings.notify_number,
        })
    }
}
