// ==========================================
// 织机班次效率跟踪系统 - 效率记录 API
// ==========================================
// 职责: 记录录入/更新/删除 + 按日分班次列表（含派生指标与排序）
// 说明: 派生指标每次读取重算，绝不落库
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::record::{ComputedRecord, NewEfficiencyRecord};
use crate::domain::types::Shift;
use crate::engine::metrics::MetricsEngine;
use crate::engine::sort::{SortDescriptor, SortEngine};
use crate::repository::record_repo::EfficiencyRecordRepository;
use chrono::NaiveDate;

// ==========================================
// ShiftTotals - 单班次合计
// ==========================================
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ShiftTotals {
    pub total_weft: f64,
    pub total_loss: f64,
}

// ==========================================
// ShiftRecords - 按日分班次的记录视图
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRecords {
    pub date: NaiveDate,
    pub day: Vec<ComputedRecord>,
    pub night: Vec<ComputedRecord>,
    pub day_totals: ShiftTotals,
    pub night_totals: ShiftTotals,
}

// ==========================================
// RecordApi - 效率记录 API
// ==========================================

/// 效率记录API
///
/// 职责：
/// 1. 记录录入（查重 + run<=total 校验由仓储执行，错误转译为业务语义）
/// 2. 记录整体更新 / 删除
/// 3. 按日查询，分白班/夜班，附派生指标、排序与班次合计
pub struct RecordApi {
    record_repo: Arc<EfficiencyRecordRepository>,
}

impl RecordApi {
    /// 创建新的RecordApi实例
    pub fn new(record_repo: Arc<EfficiencyRecordRepository>) -> Self {
        Self { record_repo }
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 新建记录
    ///
    /// # 返回
    /// - Ok(ComputedRecord): 已落库记录 + 派生指标
    /// - Err(ApiError::DuplicateRecord): 同 (日期,班次,机台) 已有记录
    /// - Err(ApiError::InvalidInput): run_time > total_time
    pub fn create_record(&self, payload: NewEfficiencyRecord) -> ApiResult<ComputedRecord> {
        if payload.machine_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台号不能为空".to_string()));
        }
        if payload.weft_meter < 0.0 {
            return Err(ApiError::InvalidInput("产量不能为负".to_string()));
        }
        if payload.stops < 0 {
            return Err(ApiError::InvalidInput("停台次数不能为负".to_string()));
        }

        let record = self
            .record_repo
            .insert(payload)
            .map_err(ApiError::from_repository)?;
        debug!(id = %record.id, "记录新建成功");
        Ok(MetricsEngine::compute_record(record))
    }

    /// 整体更新记录（替换全部可变字段，不查重——与新建不同）
    pub fn update_record(&self, id: &str, payload: NewEfficiencyRecord) -> ApiResult<ComputedRecord> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        let record = self
            .record_repo
            .update(id, payload)
            .map_err(ApiError::from_repository)?;
        Ok(MetricsEngine::compute_record(record))
    }

    /// 删除记录
    pub fn delete_record(&self, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        self.record_repo
            .delete(id)
            .map_err(ApiError::from_repository)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按日查询记录，分白班/夜班两个列表
    ///
    /// # 参数
    /// - date: 归属日期
    /// - sort: 排序描述（None 时默认机台号升序）
    pub fn list_day(&self, date: NaiveDate, sort: Option<SortDescriptor>) -> ApiResult<ShiftRecords> {
        let records = self
            .record_repo
            .list_by_date(date)
            .map_err(ApiError::from_repository)?;

        let descriptor = sort.unwrap_or_else(SortDescriptor::default_machine_order);

        let (mut day, mut night): (Vec<ComputedRecord>, Vec<ComputedRecord>) =
            MetricsEngine::compute_batch(records)
                .into_iter()
                .partition(|c| c.record.shift == Shift::Day);

        SortEngine::sort_records(&mut day, descriptor);
        SortEngine::sort_records(&mut night, descriptor);

        let day_totals = Self::totals(&day);
        let night_totals = Self::totals(&night);

        Ok(ShiftRecords {
            date,
            day,
            night,
            day_totals,
            night_totals,
        })
    }

    /// 班次合计（产量与估算损失）
    fn totals(records: &[ComputedRecord]) -> ShiftTotals {
        records.iter().fold(ShiftTotals::default(), |mut acc, r| {
            acc.total_weft += r.record.weft_meter;
            acc.total_loss += r.metrics.loss_meters;
            acc
        })
    }
}
