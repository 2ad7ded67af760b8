// ==========================================
// 织机班次效率跟踪系统 - 效率记录仓储
// ==========================================
// 职责: 管理 efficiency_records 表（按日/日期区间/机台/班次查询 + CRUD）
// 录入规则（业务规则，写入前校验）:
// - run_time <= total_time（按解析后的秒数比较）
// - (date, shift, machine_number) 唯一，仅在新建时查重；
//   UNIQUE 索引兜底，整体更新沿用原行为不查重
// 事件: 每次成功写入后发布 RecordEvent（失败只记日志）
// ==========================================

use crate::domain::record::{EfficiencyRecord, NewEfficiencyRecord};
use crate::domain::types::Shift;
use crate::engine::events::{OptionalEventPublisher, RecordEvent, RecordEventType};
use crate::engine::timecode::parse_duration;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::SqlQueryBuilder;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 记录查询列（与 map_row 的列序一致）
const RECORD_COLUMNS: &str =
    "id, created_at, date, entry_time, shift, machine_number, weft_meter, stops, total_time, run_time";

// ==========================================
// RecordFilter - 报表查询过滤条件
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub machine_number: Option<String>,
    pub shift: Option<Shift>,
}

pub struct EfficiencyRecordRepository {
    conn: Arc<Mutex<Connection>>,
    events: OptionalEventPublisher,
}

impl EfficiencyRecordRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self {
            conn,
            events: OptionalEventPublisher::none(),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    /// 附加变更事件发布者（订阅方收到后重取数据并全量重算）
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
            CREATE TABLE IF NOT EXISTS efficiency_records (
              id TEXT PRIMARY KEY,
              created_at TEXT NOT NULL,
              date TEXT NOT NULL,
              entry_time TEXT NOT NULL,
              shift TEXT NOT NULL CHECK (shift IN ('Day', 'Night')),
              machine_number TEXT NOT NULL,
              weft_meter REAL NOT NULL,
              stops INTEGER NOT NULL,
              total_time TEXT NOT NULL,
              run_time TEXT NOT NULL,
              UNIQUE(date, shift, machine_number)
            );

            CREATE INDEX IF NOT EXISTS idx_efficiency_records_date
              ON efficiency_records(date);
            CREATE INDEX IF NOT EXISTS idx_efficiency_records_machine
              ON efficiency_records(machine_number);
            "#,
        )?;
        Ok(())
    }

    /// 行映射（列序与 RECORD_COLUMNS 一致）
    fn map_row(row: &Row<'_>) -> rusqlite::Result<EfficiencyRecord> {
        let shift_str: String = row.get(4)?;
        let shift = Shift::from_str(&shift_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;
        Ok(EfficiencyRecord {
            id: row.get(0)?,
            created_at: row.get(1)?,
            date: row.get(2)?,
            entry_time: row.get(3)?,
            shift,
            machine_number: row.get(5)?,
            weft_meter: row.get(6)?,
            stops: row.get(7)?,
            total_time: row.get(8)?,
            run_time: row.get(9)?,
        })
    }

    /// 录入时刻 + 归属日期合成登记时间戳
    ///
    /// entry_time 解析失败时退回当日零点（与时长解析同样软降级）
    fn compose_created_at(date: NaiveDate, entry_time: &str) -> DateTime<Utc> {
        let time = NaiveTime::parse_from_str(entry_time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        date.and_time(time).and_utc()
    }

    /// 校验 run_time <= total_time
    fn validate_run_within_total(payload: &NewEfficiencyRecord) -> RepositoryResult<()> {
        if parse_duration(&payload.run_time) > parse_duration(&payload.total_time) {
            return Err(RepositoryError::ValidationError(format!(
                "运转时长不能大于总时长: run={} total={}",
                payload.run_time, payload.total_time
            )));
        }
        Ok(())
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 新建记录
    ///
    /// # 校验
    /// - run_time <= total_time
    /// - (date, shift, machine_number) 不得重复
    pub fn insert(&self, payload: NewEfficiencyRecord) -> RepositoryResult<EfficiencyRecord> {
        Self::validate_run_within_total(&payload)?;

        if self.exists_for(payload.date, payload.shift, &payload.machine_number)? {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "机台 {} 在 {} {} 班已有记录",
                payload.machine_number, payload.date, payload.shift
            )));
        }

        let record = EfficiencyRecord {
            id: Uuid::new_v4().to_string(),
            created_at: Self::compose_created_at(payload.date, &payload.entry_time),
            date: payload.date,
            entry_time: payload.entry_time,
            shift: payload.shift,
            machine_number: payload.machine_number,
            weft_meter: payload.weft_meter,
            stops: payload.stops,
            total_time: payload.total_time,
            run_time: payload.run_time,
        };

        {
            let conn = self.get_conn()?;
            conn.execute(
                r#"INSERT INTO efficiency_records
                   (id, created_at, date, entry_time, shift, machine_number,
                    weft_meter, stops, total_time, run_time)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
                params![
                    record.id,
                    record.created_at,
                    record.date,
                    record.entry_time,
                    record.shift.as_str(),
                    record.machine_number,
                    record.weft_meter,
                    record.stops,
                    record.total_time,
                    record.run_time,
                ],
            )?;
        }

        tracing::debug!(
            id = %record.id,
            machine = %record.machine_number,
            date = %record.date,
            "效率记录已新建"
        );
        self.events.publish(RecordEvent::for_record(
            RecordEventType::Inserted,
            record.date,
            &record.machine_number,
        ));
        Ok(record)
    }

    /// 整体更新记录（替换全部可变字段）
    ///
    /// 沿用录入层原行为: 更新不查重，仅校验 run <= total
    pub fn update(&self, id: &str, payload: NewEfficiencyRecord) -> RepositoryResult<EfficiencyRecord> {
        Self::validate_run_within_total(&payload)?;

        let record = EfficiencyRecord {
            id: id.to_string(),
            created_at: Self::compose_created_at(payload.date, &payload.entry_time),
            date: payload.date,
            entry_time: payload.entry_time,
            shift: payload.shift,
            machine_number: payload.machine_number,
            weft_meter: payload.weft_meter,
            stops: payload.stops,
            total_time: payload.total_time,
            run_time: payload.run_time,
        };

        let updated = {
            let conn = self.get_conn()?;
            conn.execute(
                r#"UPDATE efficiency_records SET
                     created_at = ?2, date = ?3, entry_time = ?4, shift = ?5,
                     machine_number = ?6, weft_meter = ?7, stops = ?8,
                     total_time = ?9, run_time = ?10
                   WHERE id = ?1"#,
                params![
                    record.id,
                    record.created_at,
                    record.date,
                    record.entry_time,
                    record.shift.as_str(),
                    record.machine_number,
                    record.weft_meter,
                    record.stops,
                    record.total_time,
                    record.run_time,
                ],
            )?
        };

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "efficiency_record".to_string(),
                id: id.to_string(),
            });
        }

        tracing::debug!(id = %record.id, "效率记录已更新");
        self.events.publish(RecordEvent::for_record(
            RecordEventType::Updated,
            record.date,
            &record.machine_number,
        ));
        Ok(record)
    }

    /// 删除记录
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let existing = self.find_by_id(id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "efficiency_record".to_string(),
            id: id.to_string(),
        })?;

        {
            let conn = self.get_conn()?;
            conn.execute("DELETE FROM efficiency_records WHERE id = ?1", params![id])?;
        }

        tracing::debug!(id = id, "效率记录已删除");
        self.events.publish(RecordEvent::for_record(
            RecordEventType::Deleted,
            existing.date,
            &existing.machine_number,
        ));
        Ok(())
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按主键查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<EfficiencyRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM efficiency_records WHERE id = ?1",
            RECORD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// 是否已存在 (date, shift, machine_number) 记录
    pub fn exists_for(&self, date: NaiveDate, shift: Shift, machine_number: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM efficiency_records
             WHERE date = ?1 AND shift = ?2 AND machine_number = ?3",
            params![date, shift.as_str(), machine_number],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 查询指定日期的全部记录
    pub fn list_by_date(&self, date: NaiveDate) -> RepositoryResult<Vec<EfficiencyRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM efficiency_records WHERE date = ?1 ORDER BY shift, machine_number",
            RECORD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![date], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// 查询日期区间内的全部记录（闭区间）
    pub fn list_between(&self, from: NaiveDate, to: NaiveDate) -> RepositoryResult<Vec<EfficiencyRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM efficiency_records WHERE date >= ?1 AND date <= ?2 ORDER BY date, shift, machine_number",
            RECORD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![from, to], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// 报表过滤查询（可选日期区间/机台/班次；日期降序）
    pub fn list_filtered(&self, filter: &RecordFilter) -> RepositoryResult<Vec<EfficiencyRecord>> {
        let sql = SqlQueryBuilder::new(&format!("SELECT {} FROM efficiency_records", RECORD_COLUMNS))
            .and_if(filter.date_from.map(|_| "date >= ?"))
            .and_if(filter.date_to.map(|_| "date <= ?"))
            .and_if(filter.machine_number.as_ref().map(|_| "machine_number = ?"))
            .and_if(filter.shift.map(|_| "shift = ?"))
            .order_by("date DESC, shift, machine_number")
            .build();

        // 参数顺序与上面 and_if 的顺序一致
        let mut bind_values: Vec<String> = Vec::new();
        if let Some(from) = filter.date_from {
            bind_values.push(from.to_string());
        }
        if let Some(to) = filter.date_to {
            bind_values.push(to.to_string());
        }
        if let Some(machine) = &filter.machine_number {
            bind_values.push(machine.clone());
        }
        if let Some(shift) = filter.shift {
            bind_values.push(shift.as_str().to_string());
        }

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(rusqlite::params_from_iter(bind_values.iter()), Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// 出现过记录的机台号（去重，数值升序——报表过滤下拉用）
    pub fn list_machine_numbers(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT machine_number FROM efficiency_records")?;
        let mut machines = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        machines.sort_by(|a, b| crate::engine::sort::numeric_string_cmp(a, b));
        Ok(machines)
    }
}
