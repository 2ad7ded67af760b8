// ==========================================
// 织机班次效率跟踪系统 - 效率记录领域模型
// ==========================================
// 对齐: efficiency_records 表
// 用途: 录入层写入，引擎层只读
// ==========================================

use crate::domain::types::Shift;
use crate::engine::metrics::RecordMetrics;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// EfficiencyRecord - 班次效率记录
// ==========================================
// 不变量（录入时校验，存储层不强制）:
// - run_time <= total_time（按解析后的秒数比较）
// - (date, shift, machine_number) 唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyRecord {
    // ===== 主键 =====
    pub id: String, // 记录唯一标识 (UUID)

    // ===== 录入信息 =====
    pub created_at: DateTime<Utc>, // 读数登记时间（日期+录入时刻合成）
    pub date: NaiveDate,           // 记录归属日期（本地日历日，无时区）
    pub entry_time: String,        // 录入时刻 HH:MM（仅展示/排序）
    pub shift: Shift,              // 班次

    // ===== 机台与读数 =====
    pub machine_number: String, // 机台号（数字字符串，按数值排序）
    pub weft_meter: f64,        // 纬纱产量（米）
    pub stops: i64,             // 停台次数

    // ===== 时长字段（HH:MM，兼容历史 HH:MM:SS）=====
    pub total_time: String, // 班次总时长
    pub run_time: String,   // 实际运转时长
}

// ==========================================
// NewEfficiencyRecord - 记录写入载荷
// ==========================================
// 用途: 新建/整体更新时由录入层提交（id/created_at 由仓储生成）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEfficiencyRecord {
    pub date: NaiveDate,
    pub entry_time: String,
    pub shift: Shift,
    pub machine_number: String,
    pub weft_meter: f64,
    pub stops: i64,
    pub total_time: String,
    pub run_time: String,
}

// ==========================================
// ComputedRecord - 记录 + 派生指标
// ==========================================
// 派生指标永不落库，每次读取时重算
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedRecord {
    #[serde(flatten)]
    pub record: EfficiencyRecord,
    pub metrics: RecordMetrics,
}
