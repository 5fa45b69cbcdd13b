// ==========================================
// 银行设备维保运维控制台 - 用户数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: roles / regions 以 JSON 字符串列存储
// ==========================================

use crate::db::open_connection;
use crate::domain::types::UserRole;
use crate::domain::user::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// UserRepository - 用户仓储
// ==========================================
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
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

    const COLUMNS: &'static str =
        "user_id, last_name, first_name, roles, email, phone, login, regions, active";

    fn map_row(row: &Row<'_>) -> rusqlite::Result<User> {
        let roles_json: String = row.get(3)?;
        let regions_json: String = row.get(7)?;
        let roles: Vec<UserRole> = serde_json::from_str(&roles_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let regions: Vec<String> = serde_json::from_str(&regions_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(User {
            user_id: row.get(0)?,
            last_name: row.get(1)?,
            first_name: row.get(2)?,
            roles,
            email: row.get(4)?,
            phone: row.get(5)?,
            login: row.get(6)?,
            regions,
            active: row.get(8)?,
        })
    }

    fn insert_stmt(tx: &rusqlite::Transaction<'_>, user: &User) -> RepositoryResult<()> {
        let roles_json = serde_json::to_string(&user.roles)
            .map_err(|e| RepositoryError::InternalError(format!("角色序列化失败: {}", e)))?;
        let regions_json = serde_json::to_string(&user.regions)
            .map_err(|e| RepositoryError::InternalError(format!("大区序列化失败: {}", e)))?;
        tx.execute(
            r#"
            INSERT INTO app_user (user_id, last_name, first_name, roles, email, phone, login, regions, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user.user_id,
                user.last_name,
                user.first_name,
                roles_json,
                user.email,
                user.phone,
                user.login,
                regions_json,
                user.active,
            ],
        )?;
        Ok(())
    }

    /// 整集合替换
    pub fn replace_all(&self, users: &[User]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM app_user", [])?;
        for user in users {
            Self::insert_stmt(&tx, user)?;
        }
        tx.commit()?;
        Ok(users.len())
    }

    /// 追加单条记录
    pub fn insert(&self, user: &User) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        Self::insert_stmt(&tx, user)?;
        tx.commit()?;
        Ok(())
    }

    /// 查询全部用户
    pub fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM app_user ORDER BY last_name, first_name",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// 查询全部在职技师
    pub fn list_technicians(&self) -> RepositoryResult<Vec<User>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|u| u.active && u.is_technician())
            .collect())
    }

    /// 按ID查询
    pub fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM app_user WHERE user_id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![user_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}
