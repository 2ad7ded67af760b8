// ==========================================
// 织机班次效率跟踪系统 - 系统设置仓储
// ==========================================
// 职责: 管理 settings 表（单例行 id=1）
// 红线: 设置行缺失不是错误——读取返回默认值（阈值 80、空花名册），
//       核心计算不得因设置缺失而失败
// ==========================================

use crate::domain::settings::Settings;
use crate::engine::events::{OptionalEventPublisher, RecordEvent, RecordEventType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 单例行主键
const SETTINGS_ROW_ID: i64 = 1;

pub struct SettingsRepository {
    conn: Arc<Mutex<Connection>>,
    events: OptionalEventPublisher,
}

impl SettingsRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self {
            conn,
            events: OptionalEventPublisher::none(),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    /// 附加变更事件发布者
    pub fn with_publisher(mut self, events: OptionalEventPublisher) -> Self {
        self.events = events;
        self
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
              id INTEGER PRIMARY KEY CHECK (id = 1),
              total_machines INTEGER,
              low_efficiency_threshold INTEGER,
              notify_number TEXT,
              notify_template TEXT
            );
            "#,
        )?;
        Ok(())
    }

    /// 读取设置（行缺失时返回默认值，不报错）
    pub fn get(&self) -> RepositoryResult<Settings> {
        let conn = self.get_conn()?;
        let settings = conn
            .query_row(
                "SELECT total_machines, low_efficiency_threshold, notify_number, notify_template
                 FROM settings WHERE id = ?1",
                params![SETTINGS_ROW_ID],
                |row| {
                    Ok(Settings {
                        total_machines: row.get(0)?,
                        low_efficiency_threshold: row.get(1)?,
                        notify_number: row.get(2)?,
                        notify_template: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(settings.unwrap_or_default())
    }

    /// 保存设置（整行 upsert 到 id=1）
    pub fn save(&self, settings: &Settings) -> RepositoryResult<()> {
        {
            let conn = self.get_conn()?;
            conn.execute(
                r#"INSERT INTO settings (id, total_machines, low_efficiency_threshold, notify_number, notify_template)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   ON CONFLICT(id) DO UPDATE SET
                     total_machines = excluded.total_machines,
                     low_efficiency_threshold = excluded.low_efficiency_threshold,
                     notify_number = excluded.notify_number,
                     notify_template = excluded.notify_template"#,
                params![
                    SETTINGS_ROW_ID,
                    settings.total_machines,
                    settings.low_efficiency_threshold,
                    settings.notify_number,
                    settings.notify_template,
                ],
            )?;
        }

        tracing::debug!(
            total_machines = ?settings.total_machines,
            threshold = ?settings.low_efficiency_threshold,
            "系统设置已保存"
        );
        self.events
            .publish(RecordEvent::full_scope(RecordEventType::SettingsChanged));
        Ok(())
    }
}
