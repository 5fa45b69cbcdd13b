// ==========================================
// 银行设备维保运维控制台 - 操作日志数据仓储
// ==========================================
// 红线: 只追加, 不修改, 不删除
// ==========================================

use crate::db::open_connection;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_datetime, parse_datetime};
use chrono::Local;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ActionLog> {
        let ts_raw: String = row.get(1)?;
        Ok(ActionLog {
            log_id: row.get(0)?,
            timestamp: parse_datetime(&ts_raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        e.to_string(),
                    )),
                )
            })?,
            actor: row.get(2)?,
            action: row.get(3)?,
            details: row.get(4)?,
        })
    }

    /// 追加一条操作日志
    pub fn append(&self, actor: &str, action: ActionType, details: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO action_log (log_id, timestamp, actor, action, details)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                Uuid::new_v4().to_string(),
                format_datetime(Local::now().naive_local()),
                actor,
                action.as_str(),
                details,
            ],
        )?;
        Ok(())
    }

    /// 查询最近 N 条日志, 时间倒序
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, timestamp, actor, action, details
            FROM action_log
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit as i64], Self::map_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }

    /// 按操作类型统计条数
    pub fn count_by_action(&self, action: ActionType) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM action_log WHERE action = ?1",
            params![action.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
