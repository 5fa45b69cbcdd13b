// ==========================================
// 银行设备维保运维控制台 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为, 避免部分模块外键开启/部分不开启
// - 统一 busy_timeout, 减少偶发 busy 错误
// - 控制台默认使用内存库; 文件路径仅供开发排查
// ==========================================

use rusqlite::{Connection, OptionalExtension};
use std::time::Duration;

/// 默认 busy_timeout(毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明: 本系统无迁移机制, 版本号只用于提示/告警,
/// 避免静默在旧库文件上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要每个连接单独开启
/// - busy_timeout 需要每个连接单独配置
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开文件库连接并应用统一配置
pub fn open_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// 打开内存库连接并应用统一配置(控制台默认)
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version(若表不存在则返回 None)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化全部表结构
///
/// # 说明
/// - 幂等: 全部 CREATE TABLE IF NOT EXISTS
/// - mission 上的 UNIQUE(tournee_id, visit_order) 为拜访顺序唯一性兜底,
///   业务层的重排算法保证 {1..N} 连续
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS bank (
            bank_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            head_office_address TEXT NOT NULL,
            contact_email TEXT NOT NULL,
            contact_phone TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS agency (
            agency_id TEXT PRIMARY KEY,
            bank_id TEXT NOT NULL REFERENCES bank(bank_id),
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            region TEXT NOT NULL,
            city TEXT NOT NULL,
            manager_name TEXT,
            manager_phone TEXT
        );

        CREATE TABLE IF NOT EXISTS contract (
            contract_id TEXT PRIMARY KEY,
            bank_id TEXT NOT NULL REFERENCES bank(bank_id),
            contract_no TEXT NOT NULL,
            date_start TEXT NOT NULL,
            date_end TEXT NOT NULL,
            frequency TEXT NOT NULL,
            status TEXT NOT NULL,
            penalty_per_day REAL NOT NULL DEFAULT 0,
            sla_conditions TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS equipment (
            equipment_id TEXT PRIMARY KEY,
            serial_no TEXT NOT NULL,
            type_code TEXT NOT NULL,
            brand_model TEXT NOT NULL,
            agency_id TEXT NOT NULL REFERENCES agency(agency_id),
            bank_id TEXT NOT NULL REFERENCES bank(bank_id),
            contract_id TEXT NOT NULL REFERENCES contract(contract_id),
            installed_on TEXT NOT NULL,
            last_intervention_on TEXT,
            status TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS app_user (
            user_id TEXT PRIMARY KEY,
            last_name TEXT NOT NULL,
            first_name TEXT NOT NULL,
            roles TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            login TEXT NOT NULL,
            regions TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS tournee (
            tournee_id TEXT PRIMARY KEY,
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date_start TEXT NOT NULL,
            date_deadline TEXT NOT NULL,
            status TEXT NOT NULL,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS mission (
            mission_id TEXT PRIMARY KEY,
            tournee_id TEXT NOT NULL REFERENCES tournee(tournee_id),
            agency_id TEXT NOT NULL,
            technician_id TEXT NOT NULL,
            visit_order INTEGER NOT NULL,
            status TEXT NOT NULL,
            started_at TEXT,
            completed_at TEXT,
            UNIQUE(tournee_id, visit_order)
        );

        CREATE TABLE IF NOT EXISTS sub_mission (
            sub_mission_id TEXT PRIMARY KEY,
            mission_id TEXT NOT NULL REFERENCES mission(mission_id),
            equipment_id TEXT NOT NULL,
            type_code TEXT NOT NULL,
            status TEXT NOT NULL,
            functionality TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS action_log (
            log_id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            actor TEXT NOT NULL,
            action TEXT NOT NULL,
            details TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_equipment_agency ON equipment(agency_id);
        CREATE INDEX IF NOT EXISTS idx_equipment_contract ON equipment(contract_id);
        CREATE INDEX IF NOT EXISTS idx_mission_tournee ON mission(tournee_id);
        CREATE INDEX IF NOT EXISTS idx_mission_technician ON mission(technician_id);
        CREATE INDEX IF NOT EXISTS idx_sub_mission_mission ON sub_mission(mission_id);
        CREATE INDEX IF NOT EXISTS idx_action_log_timestamp ON action_log(timestamp);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_schema_is_idempotent() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }

    #[test]
    fn schema_version_absent_on_fresh_db() {
        let conn = open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }
}
