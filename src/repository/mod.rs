// ==========================================
// 织机班次效率跟踪系统 - 数据仓储层
// ==========================================
// 职责: efficiency_records / settings 两张表的数据访问
// 红线: 派生指标不落库，仓储只存原始读数
// ==========================================

pub mod error;
pub mod record_repo;
pub mod settings_repo;
pub mod sql_builder;

pub use error::{RepositoryError, RepositoryResult};
pub use record_repo::{EfficiencyRecordRepository, RecordFilter};
pub use settings_repo::SettingsRepository;
