// ==========================================
// 织机班次效率跟踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, RecordApi, ReportApi};
use crate::db::open_sqlite_connection;
use crate::engine::events::{OptionalEventPublisher, RecordEventPublisher};
use crate::repository::{EfficiencyRecordRepository, SettingsRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源，宿主（桌面壳/服务端）作为全局状态管理
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 效率记录API
    pub record_api: Arc<RecordApi>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 报表API
    pub report_api: Arc<ReportApi>,

    /// 系统设置仓储（设置页直接读写）
    pub settings_repo: Arc<SettingsRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接（统一 PRAGMA）
    /// 2. 初始化 Repository（建表）
    /// 3. 创建所有 API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_publisher(db_path, None)
    }

    /// 创建带变更事件发布者的AppState实例
    ///
    /// 发布者收到事件后应按范围重新取数并全量重算（无增量路径）
    pub fn with_publisher(
        db_path: String,
        publisher: Option<Arc<dyn RecordEventPublisher>>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let events = |p: &Option<Arc<dyn RecordEventPublisher>>| match p {
            Some(publisher) => OptionalEventPublisher::with_publisher(Arc::clone(publisher)),
            None => OptionalEventPublisher::none(),
        };

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let record_repo = Arc::new(
            EfficiencyRecordRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("初始化记录仓储失败: {}", e))?
                .with_publisher(events(&publisher)),
        );
        let settings_repo = Arc::new(
            SettingsRepository::from_connection(Arc::clone(&conn))
                .map_err(|e| format!("初始化设置仓储失败: {}", e))?
                .with_publisher(events(&publisher)),
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let record_api = Arc::new(RecordApi::new(Arc::clone(&record_repo)));
        let dashboard_api = Arc::new(DashboardApi::new(
            Arc::clone(&record_repo),
            Arc::clone(&settings_repo),
        ));
        let report_api = Arc::new(ReportApi::new(Arc::clone(&record_repo)));

        tracing::info!("AppState初始化成功");

        Ok(Self {
            db_path,
            record_api,
            dashboard_api,
            report_api,
            settings_repo,
        })
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("LOOM_EFFICIENCY_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 使用用户数据目录；拿不到时回退当前目录
    let mut path = PathBuf::from("./loom_efficiency.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("loom-efficiency-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("loom-efficiency");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("loom_efficiency.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    // 注意：AppState::new() 的测试需要真实的数据库文件
    // 这些测试在集成测试中进行
}
