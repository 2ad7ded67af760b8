// ==========================================
// 织机班次效率跟踪系统 - 排序引擎
// ==========================================
// 职责: 对 ComputedRecord 按任意列排序（列表/报表共用）
// 设计: 每个排序列映射到一个字段类别（数字字符串/时长/数值/文本），
//       类别携带比较语义，排序前解析一次，不在每次比较时重判类型
// 红线: 机台号 "2" < "10" 按数值比较；排序必须稳定（等值保持原序）
// ==========================================

use crate::domain::record::ComputedRecord;
use crate::domain::types::SortDirection;
use crate::engine::timecode::parse_duration;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// SortField - 可排序列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    MachineNumber, // 机台号（数字字符串）
    EntryTime,     // 录入时刻（时长语义）
    Efficiency,    // 效率 %
    Stops,         // 停台次数
    TotalTime,     // 总时长
    RunTime,       // 运转时长
    Diff,          // 停台时长
    WeftMeter,     // 产量
    HourlyRate,    // 时速
    Loss,          // 估算损失
    Date,          // 归属日期
    Shift,         // 班次
}

// ==========================================
// FieldKind - 字段类别（携带比较语义）
// ==========================================
enum FieldKind {
    /// 数字字符串（可解析时按整数比较，否则退回字典序）
    NumericString(fn(&ComputedRecord) -> &str),
    /// 时长字符串（按解析后的秒数比较）
    Duration(fn(&ComputedRecord) -> &str),
    /// 数值字段
    Number(fn(&ComputedRecord) -> f64),
    /// 其余退回字典序
    Text(fn(&ComputedRecord) -> String),
}

impl SortField {
    /// 解析一次字段类别，之后的比较不再做类型判断
    fn kind(self) -> FieldKind {
        match self {
            SortField::MachineNumber => FieldKind::NumericString(|r| &r.record.machine_number),
            SortField::EntryTime => FieldKind::Duration(|r| &r.record.entry_time),
            SortField::TotalTime => FieldKind::Duration(|r| &r.record.total_time),
            SortField::RunTime => FieldKind::Duration(|r| &r.record.run_time),
            SortField::Efficiency => FieldKind::Number(|r| r.metrics.efficiency_pct),
            SortField::Stops => FieldKind::Number(|r| r.record.stops as f64),
            SortField::Diff => FieldKind::Number(|r| r.metrics.diff_seconds as f64),
            SortField::WeftMeter => FieldKind::Number(|r| r.record.weft_meter),
            SortField::HourlyRate => FieldKind::Number(|r| r.metrics.hourly_rate),
            SortField::Loss => FieldKind::Number(|r| r.metrics.loss_meters),
            SortField::Date => FieldKind::Text(|r| r.record.date.to_string()),
            SortField::Shift => FieldKind::Text(|r| r.record.shift.to_string()),
        }
    }
}

/// 数字字符串比较: 双方都可解析为整数时按数值，否则退回字典序
pub fn numeric_string_cmp(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(na), Ok(nb)) => na.cmp(&nb),
        _ => a.cmp(b),
    }
}

/// 浮点数全序比较（NaN 已被指标层挡住，保底按相等处理）
fn number_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// ==========================================
// SortDescriptor - 排序描述（列 + 方向）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortDescriptor {
    /// 默认排序: 机台号升序
    pub fn default_machine_order() -> Self {
        Self {
            field: SortField::MachineNumber,
            direction: SortDirection::Asc,
        }
    }

    /// 点击列头的切换语义: 同列翻转方向，换列重置为升序
    pub fn toggle(current: Option<SortDescriptor>, field: SortField) -> SortDescriptor {
        match current {
            Some(desc) if desc.field == field => SortDescriptor {
                field,
                direction: desc.direction.toggled(),
            },
            _ => SortDescriptor {
                field,
                direction: SortDirection::Asc,
            },
        }
    }
}

// ==========================================
// SortEngine - 排序引擎
// ==========================================
pub struct SortEngine;

impl SortEngine {
    /// 比较两条记录的指定列（升序语义）
    pub fn compare(a: &ComputedRecord, b: &ComputedRecord, field: SortField) -> Ordering {
        match field.kind() {
            FieldKind::NumericString(get) => numeric_string_cmp(get(a), get(b)),
            FieldKind::Duration(get) => parse_duration(get(a)).cmp(&parse_duration(get(b))),
            FieldKind::Number(get) => number_cmp(get(a), get(b)),
            FieldKind::Text(get) => get(a).cmp(&get(b)),
        }
    }

    /// 按描述排序（稳定排序: 等值行保持输入相对顺序）
    pub fn sort_records(records: &mut [ComputedRecord], descriptor: SortDescriptor) {
        records.sort_by(|a, b| {
            let ordering = Self::compare(a, b, descriptor.field);
            match descriptor.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::EfficiencyRecord;
    use crate::domain::types::Shift;
    use crate::engine::metrics::MetricsEngine;
    use chrono::{NaiveDate, Utc};

    /// 创建测试用的计算后记录
    fn create_computed(id: &str, machine: &str, total: &str, run: &str, weft: f64) -> ComputedRecord {
        MetricsEngine::compute_record(EfficiencyRecord {
            id: id.to_string(),
            created_at: Utc::now(),
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            entry_time: "08:00".to_string(),
            shift: Shift::Day,
            machine_number: machine.to_string(),
            weft_meter: weft,
            stops: 0,
            total_time: total.to_string(),
            run_time: run.to_string(),
        })
    }

    #[test]
    fn test_machine_number_sorts_numerically() {
        let mut records = vec![
            create_computed("a", "10", "10:00", "09:00", 1.0),
            create_computed("b", "2", "10:00", "09:00", 1.0),
            create_computed("c", "1", "10:00", "09:00", 1.0),
        ];
        SortEngine::sort_records(&mut records, SortDescriptor::default_machine_order());
        let order: Vec<&str> = records.iter().map(|r| r.record.machine_number.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_non_numeric_machine_falls_back_to_lexical() {
        assert_eq!(numeric_string_cmp("A2", "A10"), Ordering::Less);
        assert_eq!(numeric_string_cmp("2", "10"), Ordering::Less);
    }

    #[test]
    fn test_duration_field_sorts_by_seconds() {
        let mut records = vec![
            create_computed("a", "1", "10:00", "09:30", 1.0),
            create_computed("b", "2", "09:00", "02:00", 1.0),
        ];
        SortEngine::sort_records(
            &mut records,
            SortDescriptor {
                field: SortField::RunTime,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(records[0].record.id, "b");
    }

    #[test]
    fn test_numeric_field_desc() {
        let mut records = vec![
            create_computed("low", "1", "10:00", "05:00", 1.0),
            create_computed("high", "2", "10:00", "09:00", 1.0),
        ];
        SortEngine::sort_records(
            &mut records,
            SortDescriptor {
                field: SortField::Efficiency,
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(records[0].record.id, "high");
    }

    #[test]
    fn test_toggle_semantics() {
        // 新列: 升序
        let first = SortDescriptor::toggle(None, SortField::Efficiency);
        assert_eq!(first.direction, SortDirection::Asc);
        // 同列再点: 翻转
        let second = SortDescriptor::toggle(Some(first), SortField::Efficiency);
        assert_eq!(second.direction, SortDirection::Desc);
        // 换列: 重置升序
        let third = SortDescriptor::toggle(Some(second), SortField::Stops);
        assert_eq!(third.field, SortField::Stops);
        assert_eq!(third.direction, SortDirection::Asc);
    }

    #[test]
    fn test_stable_sort_preserves_tie_order() {
        // 三条效率相同的记录，排序后保持输入相对顺序
        let mut records = vec![
            create_computed("first", "3", "10:00", "09:00", 1.0),
            create_computed("second", "1", "10:00", "09:00", 2.0),
            create_computed("third", "2", "10:00", "09:00", 3.0),
        ];
        SortEngine::sort_records(
            &mut records,
            SortDescriptor {
                field: SortField::Efficiency,
                direction: SortDirection::Asc,
            },
        );
        let order: Vec<&str> = records.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }
}
