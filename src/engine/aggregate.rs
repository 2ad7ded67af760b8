// ==========================================
// 织机班次效率跟踪系统 - 聚合引擎
// ==========================================
// 职责: 按任意键分组汇总 + 滚动窗口/今昨对比派生视图
// 红线: 分组效率必须按秒数加权重算（sum(run)/sum(total)），
//       绝不能对单条效率取算术平均——时长不同时均值有偏
// 红线: 窗口视图输出基数恒等于窗口天数/机台花名册，缺数据补零
// ==========================================

use crate::domain::record::{ComputedRecord, EfficiencyRecord};
use crate::engine::metrics::MetricsEngine;
use crate::engine::sort::numeric_string_cmp;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::instrument;

// ==========================================
// GroupTotals - 分组汇总值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupTotals {
    pub total_weft: f64,    // 产量合计（米）
    pub total_seconds: i64, // 总时长合计（秒）
    pub run_seconds: i64,   // 运转时长合计（秒）
    pub loss_meters: f64,   // 单条损失之和（米）
    pub record_count: usize,
}

impl GroupTotals {
    /// 累加一条记录
    fn accumulate(&mut self, record: &EfficiencyRecord) {
        let metrics = MetricsEngine::compute(record);
        self.total_weft += record.weft_meter;
        self.total_seconds += metrics.total_seconds;
        self.run_seconds += metrics.run_seconds;
        self.loss_meters += metrics.loss_meters;
        self.record_count += 1;
    }

    /// 分组效率（按秒数加权，total=0 时为 0）
    pub fn efficiency_pct(&self) -> f64 {
        if self.total_seconds > 0 {
            self.run_seconds as f64 / self.total_seconds as f64 * 100.0
        } else {
            0.0
        }
    }
}

// ==========================================
// DailySummary - 单日汇总（看板日卡/趋势图）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_weft: f64,
    pub efficiency_pct: f64,
    pub record_count: usize,
}

// ==========================================
// MachineDayComparison - 机台今昨对比
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineDayComparison {
    pub machine_number: String,
    pub today_weft: f64,
    pub yesterday_weft: f64,
    pub today_efficiency: f64,
    pub yesterday_efficiency: f64,
}

// ==========================================
// DateGroup - 报表按日期分组
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub records: Vec<ComputedRecord>,
    pub total_weft: f64,
    pub total_loss: f64,
}

// ==========================================
// AggregateEngine - 聚合引擎
// ==========================================
pub struct AggregateEngine;

impl AggregateEngine {
    /// 按调用方提供的键分组汇总
    ///
    /// 键可以是日期、机台号或任意组合键
    pub fn aggregate_by<K, F>(records: &[EfficiencyRecord], key_fn: F) -> HashMap<K, GroupTotals>
    where
        K: Eq + Hash,
        F: Fn(&EfficiencyRecord) -> K,
    {
        let mut groups: HashMap<K, GroupTotals> = HashMap::new();
        for record in records {
            groups.entry(key_fn(record)).or_default().accumulate(record);
        }
        groups
    }

    /// 滚动 N 日汇总（含 end_date 当天，新日期在前）
    ///
    /// 输出恒为 days 条：窗口内没有记录的日期补零值条目
    #[instrument(skip(records), fields(count = records.len(), days))]
    pub fn daily_summaries(
        records: &[EfficiencyRecord],
        end_date: NaiveDate,
        days: u32,
    ) -> Vec<DailySummary> {
        let by_date = Self::aggregate_by(records, |r| r.date);

        (0..days as i64)
            .map(|offset| {
                let date = end_date - Duration::days(offset);
                match by_date.get(&date) {
                    Some(totals) => DailySummary {
                        date,
                        total_weft: totals.total_weft,
                        efficiency_pct: totals.efficiency_pct(),
                        record_count: totals.record_count,
                    },
                    None => DailySummary {
                        date,
                        total_weft: 0.0,
                        efficiency_pct: 0.0,
                        record_count: 0,
                    },
                }
            })
            .collect()
    }

    /// 机台维度今昨对比
    ///
    /// roster 来自 Settings 的机台花名册 1..=N：没有任何记录的机台
    /// 也要出现（全零指标）。今昨各自独立聚合后按机台合并，
    /// 输出按机台号数值升序。
    #[instrument(skip(today_records, yesterday_records, roster), fields(roster = roster.len()))]
    pub fn machine_comparison(
        today_records: &[EfficiencyRecord],
        yesterday_records: &[EfficiencyRecord],
        roster: &[String],
    ) -> Vec<MachineDayComparison> {
        let today = Self::aggregate_by(today_records, |r| r.machine_number.clone());
        let yesterday = Self::aggregate_by(yesterday_records, |r| r.machine_number.clone());

        let mut comparisons: Vec<MachineDayComparison> = roster
            .iter()
            .map(|machine| {
                let t = today.get(machine).copied().unwrap_or_default();
                let y = yesterday.get(machine).copied().unwrap_or_default();
                MachineDayComparison {
                    machine_number: machine.clone(),
                    today_weft: t.total_weft,
                    yesterday_weft: y.total_weft,
                    today_efficiency: t.efficiency_pct(),
                    yesterday_efficiency: y.efficiency_pct(),
                }
            })
            .collect();

        comparisons.sort_by(|a, b| numeric_string_cmp(&a.machine_number, &b.machine_number));
        comparisons
    }

    /// 报表视图分组: 按日期分组（日期降序），每组附产量/损失合计
    pub fn date_report(records: Vec<EfficiencyRecord>) -> Vec<DateGroup> {
        let mut by_date: HashMap<NaiveDate, Vec<ComputedRecord>> = HashMap::new();
        for record in records {
            let computed = MetricsEngine::compute_record(record);
            by_date.entry(computed.record.date).or_default().push(computed);
        }

        let mut groups: Vec<DateGroup> = by_date
            .into_iter()
            .map(|(date, records)| {
                let total_weft = records.iter().map(|r| r.record.weft_meter).sum();
                let total_loss = records.iter().map(|r| r.metrics.loss_meters).sum();
                DateGroup {
                    date,
                    records,
                    total_weft,
                    total_loss,
                }
            })
            .collect();

        groups.sort_by(|a, b| b.date.cmp(&a.date));
        groups
    }
}
