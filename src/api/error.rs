// ==========================================
// 织机班次效率跟踪系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换 Repository 错误为用户友好的错误消息
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 同一 (日期, 班次, 机台) 的记录已存在
    #[error("重复记录: {0}")]
    DuplicateRecord(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ===== 底层错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(#[from] RepositoryError),
}

impl ApiError {
    /// Repository 错误按业务语义转换
    ///
    /// 唯一约束违反 -> 重复记录；校验失败 -> 无效输入；
    /// 未找到 -> NotFound；其余保持数据库错误
    pub fn from_repository(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::DuplicateRecord(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            other => ApiError::DatabaseError(other),
        }
    }
}

/// API层 Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
