// ==========================================
// 织机班次效率跟踪系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 班次效率看板（记录录入 -> 指标计算 -> 聚合展示/告警）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 指标/聚合/告警/排序
pub mod engine;

// 导入层 - 照片识别接口
pub mod importer;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ComputedRecord, EfficiencyRecord, NewEfficiencyRecord, Settings, Shift, SortDirection,
};

// 引擎
pub use engine::{
    AggregateEngine, AlertEngine, DailySummary, DateGroup, GroupTotals, LowPerformer,
    MachineDayComparison, MetricsEngine, RecordEvent, RecordEventPublisher, RecordEventType,
    RecordMetrics, SortDescriptor, SortEngine, SortField,
};

// 仓储
pub use repository::{EfficiencyRecordRepository, RecordFilter, SettingsRepository};

// API
pub use api::{ApiError, ApiResult, DashboardApi, LowEfficiencyAlert, RecordApi, ReportApi};

// 应用
pub use app::{get_default_db_path, AppState};

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
