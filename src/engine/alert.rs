// ==========================================
// 织机班次效率跟踪系统 - 低效率告警引擎
// ==========================================
// 职责: 对近 3 日记录按机台聚合，筛出低于阈值的机台
// 输入: 近 3 日记录集（由 API 层按日期窗口取出）+ 阈值
// 输出: 低效机台列表（效率升序，最差在前）
// 红线: 效率恰为 0 的机台视为"无数据"，不进告警——
//       区分"已知低效"与"没有运转记录"
// ==========================================

use crate::domain::record::EfficiencyRecord;
use crate::engine::aggregate::AggregateEngine;
use crate::engine::sort::numeric_string_cmp;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// LowPerformer - 低效机台条目
// ==========================================
// 输出喂给外部通知协作方（消息拼装不在核心范围内）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowPerformer {
    pub machine_number: String,
    pub efficiency_pct: f64,
    /// 参与聚合的记录条数
    pub record_count: usize,
}

// ==========================================
// AlertEngine - 告警引擎
// ==========================================
pub struct AlertEngine;

impl AlertEngine {
    /// 筛选低效机台
    ///
    /// 聚合按秒数加权（与聚合引擎同一口径），保留
    /// 0 < 效率 < threshold_pct 的机台，效率升序，
    /// 同效率按机台号数值升序。
    #[instrument(skip(records), fields(count = records.len(), threshold = threshold_pct))]
    pub fn find_low_performers(
        records: &[EfficiencyRecord],
        threshold_pct: f64,
    ) -> Vec<LowPerformer> {
        let by_machine = AggregateEngine::aggregate_by(records, |r| r.machine_number.clone());

        let mut low: Vec<LowPerformer> = by_machine
            .into_iter()
            .map(|(machine_number, totals)| LowPerformer {
                machine_number,
                efficiency_pct: totals.efficiency_pct(),
                record_count: totals.record_count,
            })
            .filter(|m| m.efficiency_pct > 0.0 && m.efficiency_pct < threshold_pct)
            .collect();

        low.sort_by(|a, b| {
            a.efficiency_pct
                .partial_cmp(&b.efficiency_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| numeric_string_cmp(&a.machine_number, &b.machine_number))
        });
        low
    }
}
