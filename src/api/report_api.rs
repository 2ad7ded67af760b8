// ==========================================
// 织机班次效率跟踪系统 - 报表 API
// ==========================================
// 职责: 日期区间/机台/班次过滤报表（按日期分组 + 组内合计）
// ==========================================

use std::sync::Arc;

use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::engine::aggregate::{AggregateEngine, DateGroup};
use crate::repository::record_repo::{EfficiencyRecordRepository, RecordFilter};

// ==========================================
// ReportApi - 报表 API
// ==========================================

/// 报表API
///
/// 职责：
/// 1. 过滤查询（可选日期区间 / 机台 / 班次）
/// 2. 按日期分组（日期降序），组内附产量/损失合计
/// 3. 机台下拉候选（出现过记录的机台号，数值升序）
pub struct ReportApi {
    record_repo: Arc<EfficiencyRecordRepository>,
}

impl ReportApi {
    /// 创建新的ReportApi实例
    pub fn new(record_repo: Arc<EfficiencyRecordRepository>) -> Self {
        Self { record_repo }
    }

    /// 过滤报表查询
    pub fn date_range_report(&self, filter: &RecordFilter) -> ApiResult<Vec<DateGroup>> {
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
            if from > to {
                return Err(ApiError::InvalidInput(format!(
                    "日期区间无效: {} > {}",
                    from, to
                )));
            }
        }

        let records = self
            .record_repo
            .list_filtered(filter)
            .map_err(ApiError::from_repository)?;
        debug!(count = records.len(), "报表取数完成");
        Ok(AggregateEngine::date_report(records))
    }

    /// 机台下拉候选
    pub fn machine_numbers(&self) -> ApiResult<Vec<String>> {
        self.record_repo
            .list_machine_numbers()
            .map_err(ApiError::from_repository)
    }
}
