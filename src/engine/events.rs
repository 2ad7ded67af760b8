// ==========================================
// 织机班次效率跟踪系统 - 数据变更事件
// ==========================================
// 职责: 定义记录变更事件发布 trait，替代原存储端的变更通知流
// 说明: 仓储层在每次成功写入后发布事件；订阅方收到后对相关
//       窗口重新取数并全量重算（核心不做增量更新）
// 红线: 事件发布失败不得使写入失败——调用方记日志后吞掉
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 记录变更事件类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordEventType {
    /// 记录新增
    Inserted,
    /// 记录整体更新
    Updated,
    /// 记录删除
    Deleted,
    /// 系统设置变更
    SettingsChanged,
}

impl RecordEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            RecordEventType::Inserted => "Inserted",
            RecordEventType::Updated => "Updated",
            RecordEventType::Deleted => "Deleted",
            RecordEventType::SettingsChanged => "SettingsChanged",
        }
    }
}

// ==========================================
// RecordEvent - 记录变更事件
// ==========================================
/// 仓储层发布的失效消息，携带受影响范围
///
/// date / machine_number 为 None 时表示无法界定范围（订阅方全量刷新）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEvent {
    /// 事件类型
    pub event_type: RecordEventType,
    /// 受影响日期
    pub date: Option<NaiveDate>,
    /// 受影响机台号
    pub machine_number: Option<String>,
}

impl RecordEvent {
    /// 创建针对单条记录的事件
    pub fn for_record(event_type: RecordEventType, date: NaiveDate, machine_number: &str) -> Self {
        Self {
            event_type,
            date: Some(date),
            machine_number: Some(machine_number.to_string()),
        }
    }

    /// 创建全量事件（设置变更等无法界定范围的场景）
    pub fn full_scope(event_type: RecordEventType) -> Self {
        Self {
            event_type,
            date: None,
            machine_number: None,
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 记录变更事件发布者 Trait
///
/// 仓储层定义并调用，视图/订阅层实现。
/// 订阅方的正确响应是"失效并重算": 按事件范围重新取数后全量重算。
pub trait RecordEventPublisher: Send + Sync {
    /// 发布变更事件
    fn publish(&self, event: RecordEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
///
/// 用于不需要事件发布的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl RecordEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: RecordEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - event_type={}",
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn RecordEventPublisher>> 的使用
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn RecordEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn RecordEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）
    ///
    /// 发布失败只记日志，绝不向上传播——写入已经成功
    pub fn publish(&self, event: RecordEvent) {
        if let Some(publisher) = &self.inner {
            if let Err(e) = publisher.publish(event.clone()) {
                tracing::warn!(
                    event_type = event.event_type.as_str(),
                    "事件发布失败(写入不受影响): {}",
                    e
                );
            }
        } else {
            tracing::debug!(
                "OptionalEventPublisher: 未配置发布者，跳过事件 - event_type={}",
                event.event_type.as_str()
            );
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
