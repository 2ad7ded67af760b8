// ==========================================
// 织机班次效率跟踪系统 - API 层
// ==========================================
// 职责: 组合仓储与引擎，提供展示层消费的业务接口
// 红线: API 层不做指标算术——全部委托引擎层
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod record_api;
pub mod report_api;

pub use dashboard_api::{
    DashboardApi, LowEfficiencyAlert, ALERT_LOOKBACK_DAYS, SUMMARY_CARD_DAYS, TREND_CHART_DAYS,
};
pub use error::{ApiError, ApiResult};
pub use record_api::{RecordApi, ShiftRecords, ShiftTotals};
pub use report_api::ReportApi;
