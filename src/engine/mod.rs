// ==========================================
// 织机班次效率跟踪系统 - 引擎层
// ==========================================
// 职责: 纯计算引擎（编解码/指标/聚合/告警/排序）+ 变更事件 trait
// 红线: Engine 不拼 SQL、不持可变共享状态——输入快照，输出新值
// 红线: 所有核心函数为全函数，畸形输入软降级为零而非报错
// ==========================================

pub mod aggregate;
pub mod alert;
pub mod events;
pub mod metrics;
pub mod sort;
pub mod timecode;

// 重导出核心引擎
pub use aggregate::{AggregateEngine, DailySummary, DateGroup, GroupTotals, MachineDayComparison};
pub use alert::{AlertEngine, LowPerformer};
pub use events::{
    NoOpEventPublisher, OptionalEventPublisher, RecordEvent, RecordEventPublisher, RecordEventType,
};
pub use metrics::{MetricsEngine, RecordMetrics};
pub use sort::{SortDescriptor, SortEngine, SortField};
pub use timecode::{format_duration, format_minutes, parse_duration, DurationPrecision};
