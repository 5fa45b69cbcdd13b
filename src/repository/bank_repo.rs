// ==========================================
// 银行设备维保运维控制台 - 银行/网点数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_connection;
use crate::domain::bank::{Agency, Bank};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// BankRepository - 银行仓储
// ==========================================
/// 银行仓储
/// 职责: 管理 bank 表的数据访问
/// 说明: 参照数据, 核心流程只读; 写入口供种子/外部维护使用
pub struct BankRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BankRepository {
    /// 从数据库文件路径创建仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Bank> {
        Ok(Bank {
            bank_id: row.get(0)?,
            name: row.get(1)?,
            head_office_address: row.get(2)?,
            contact_email: row.get(3)?,
            contact_phone: row.get(4)?,
        })
    }

    /// 整集合替换 (先清空再写入, 事务保证原子性)
    pub fn replace_all(&self, banks: &[Bank]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM bank", [])?;
        let mut count = 0;
        for bank in banks {
            tx.execute(
                r#"
                INSERT INTO bank (bank_id, name, head_office_address, contact_email, contact_phone)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    bank.bank_id,
                    bank.name,
                    bank.head_office_address,
                    bank.contact_email,
                    bank.contact_phone,
                ],
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    }

    /// 追加单条记录
    pub fn insert(&self, bank: &Bank) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO bank (bank_id, name, head_office_address, contact_email, contact_phone)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                bank.bank_id,
                bank.name,
                bank.head_office_address,
                bank.contact_email,
                bank.contact_phone,
            ],
        )?;
        Ok(())
    }

    /// 查询全部银行
    pub fn list_all(&self) -> RepositoryResult<Vec<Bank>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT bank_id, name, head_office_address, contact_email, contact_phone
             FROM bank ORDER BY name",
        )?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut banks = Vec::new();
        for row in rows {
            banks.push(row?);
        }
        Ok(banks)
    }

    /// 按ID查询
    pub fn find_by_id(&self, bank_id: &str) -> RepositoryResult<Option<Bank>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT bank_id, name, head_office_address, contact_email, contact_phone
             FROM bank WHERE bank_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![bank_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

// ==========================================
// AgencyRepository - 网点仓储
// ==========================================
/// 网点仓储
/// 职责: 管理 agency 表的数据访问
pub struct AgencyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AgencyRepository {
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

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Agency> {
        Ok(Agency {
            agency_id: row.get(0)?,
            bank_id: row.get(1)?,
            code: row.get(2)?,
            name: row.get(3)?,
            address: row.get(4)?,
            region: row.get(5)?,
            city: row.get(6)?,
            manager_name: row.get(7)?,
            manager_phone: row.get(8)?,
        })
    }

    const COLUMNS: &'static str =
        "agency_id, bank_id, code, name, address, region, city, manager_name, manager_phone";

    /// 整集合替换
    pub fn replace_all(&self, agencies: &[Agency]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM agency", [])?;
        let mut count = 0;
        for agency in agencies {
            tx.execute(
                r#"
                INSERT INTO agency (agency_id, bank_id, code, name, address, region, city, manager_name, manager_phone)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    agency.agency_id,
                    agency.bank_id,
                    agency.code,
                    agency.name,
                    agency.address,
                    agency.region,
                    agency.city,
                    agency.manager_name,
                    agency.manager_phone,
                ],
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    }

    /// 追加单条记录
    pub fn insert(&self, agency: &Agency) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO agency (agency_id, bank_id, code, name, address, region, city, manager_name, manager_phone)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                agency.agency_id,
                agency.bank_id,
                agency.code,
                agency.name,
                agency.address,
                agency.region,
                agency.city,
                agency.manager_name,
                agency.manager_phone,
            ],
        )?;
        Ok(())
    }

    /// 查询全部网点
    pub fn list_all(&self) -> RepositoryResult<Vec<Agency>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agency ORDER BY region, city, name",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut agencies = Vec::new();
        for row in rows {
            agencies.push(row?);
        }
        Ok(agencies)
    }

    /// 按所属银行查询
    pub fn list_by_bank(&self, bank_id: &str) -> RepositoryResult<Vec<Agency>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agency WHERE bank_id = ?1 ORDER BY region, city, name",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map(params![bank_id], Self::map_row)?;
        let mut agencies = Vec::new();
        for row in rows {
            agencies.push(row?);
        }
        Ok(agencies)
    }

    /// 按ID查询
    pub fn find_by_id(&self, agency_id: &str) -> RepositoryResult<Option<Agency>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agency WHERE agency_id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![agency_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}
