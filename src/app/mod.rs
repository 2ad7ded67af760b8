// ==========================================
// 织机班次效率跟踪系统 - 应用层
// ==========================================
// 职责: 应用状态装配（连接、仓储、API 实例）
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
