// ==========================================
// 织机班次效率跟踪系统 - 单条记录指标计算
// ==========================================
// 职责: 由原始时长/读数字段派生效率、差值、时速、估算损失
// 输入: EfficiencyRecord（只读）
// 输出: RecordMetrics（纯派生值，永不落库）
// 红线: 全函数，所有除法设防，输出必为有限数
// ==========================================

use crate::domain::record::{ComputedRecord, EfficiencyRecord};
use crate::engine::timecode::parse_duration;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// RecordMetrics - 派生指标
// ==========================================
// 说明: efficiency_pct 不做 [0,100] 截断——run > total 属于录入
// 期错误数据，保留原始值供排序/告警使用（可见但不致命）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordMetrics {
    pub total_seconds: i64,  // 班次总秒数
    pub run_seconds: i64,    // 运转秒数
    pub efficiency_pct: f64, // 效率百分比（total=0 时为 0，可超过 100）
    pub diff_seconds: i64,   // 停台时长 = total - run（历史脏数据可为负）
    pub hourly_rate: f64,    // 时速 米/小时（run=0 时为 0）
    pub loss_meters: f64,    // 估算产量损失 = 时速 * 停台小时（可为负）
}

// ==========================================
// MetricsEngine - 指标计算引擎
// ==========================================
pub struct MetricsEngine;

impl MetricsEngine {
    /// 计算单条记录的派生指标
    pub fn compute(record: &EfficiencyRecord) -> RecordMetrics {
        let total_seconds = parse_duration(&record.total_time);
        let run_seconds = parse_duration(&record.run_time);
        let diff_seconds = total_seconds - run_seconds;

        let efficiency_pct = if total_seconds > 0 {
            run_seconds as f64 / total_seconds as f64 * 100.0
        } else {
            0.0
        };

        let run_hours = run_seconds as f64 / 3600.0;
        let hourly_rate = if run_seconds > 0 {
            record.weft_meter / run_hours
        } else {
            0.0
        };

        let loss_meters = hourly_rate * (diff_seconds as f64 / 3600.0);

        RecordMetrics {
            total_seconds,
            run_seconds,
            efficiency_pct,
            diff_seconds,
            hourly_rate,
            loss_meters,
        }
    }

    /// 计算并组装 ComputedRecord
    pub fn compute_record(record: EfficiencyRecord) -> ComputedRecord {
        let metrics = Self::compute(&record);
        ComputedRecord { record, metrics }
    }

    /// 批量计算（列表/报表读取路径）
    #[instrument(skip(records), fields(count = records.len()))]
    pub fn compute_batch(records: Vec<EfficiencyRecord>) -> Vec<ComputedRecord> {
        records.into_iter().map(Self::compute_record).collect()
    }
}
