// ==========================================
// 银行设备维保运维控制台 - 维保合同数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_connection;
use crate::domain::contract::Contract;
use crate::domain::types::ContractFrequency;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ContractRepository - 合同仓储
// ==========================================
pub struct ContractRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ContractRepository {
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

    const COLUMNS: &'static str = "contract_id, bank_id, contract_no, date_start, date_end, \
         frequency, status, penalty_per_day, sla_conditions";

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Contract> {
        let frequency_raw: String = row.get(5)?;
        let frequency = ContractFrequency::from_str(&frequency_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            )
        })?;
        Ok(Contract {
            contract_id: row.get(0)?,
            bank_id: row.get(1)?,
            contract_no: row.get(2)?,
            date_start: row.get::<_, NaiveDate>(3)?,
            date_end: row.get::<_, NaiveDate>(4)?,
            frequency,
            status: row.get(6)?,
            penalty_per_day: row.get(7)?,
            sla_conditions: row.get(8)?,
        })
    }

    /// 整集合替换
    pub fn replace_all(&self, contracts: &[Contract]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM contract", [])?;
        let mut count = 0;
        for contract in contracts {
            tx.execute(
                r#"
                INSERT INTO contract (contract_id, bank_id, contract_no, date_start, date_end,
                                      frequency, status, penalty_per_day, sla_conditions)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    contract.contract_id,
                    contract.bank_id,
                    contract.contract_no,
                    contract.date_start,
                    contract.date_end,
                    contract.frequency.as_str(),
                    contract.status,
                    contract.penalty_per_day,
                    contract.sla_conditions,
                ],
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    }

    /// 追加单条记录
    pub fn insert(&self, contract: &Contract) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO contract (contract_id, bank_id, contract_no, date_start, date_end,
                                  frequency, status, penalty_per_day, sla_conditions)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                contract.contract_id,
                contract.bank_id,
                contract.contract_no,
                contract.date_start,
                contract.date_end,
                contract.frequency.as_str(),
                contract.status,
                contract.penalty_per_day,
                contract.sla_conditions,
            ],
        )?;
        Ok(())
    }

    /// 查询全部合同
    pub fn list_all(&self) -> RepositoryResult<Vec<Contract>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM contract ORDER BY contract_no",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut contracts = Vec::new();
        for row in rows {
            contracts.push(row?);
        }
        Ok(contracts)
    }

    /// 按所属银行查询
    pub fn list_by_bank(&self, bank_id: &str) -> RepositoryResult<Vec<Contract>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM contract WHERE bank_id = ?1 ORDER BY contract_no",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map(params![bank_id], Self::map_row)?;
        let mut contracts = Vec::new();
        for row in rows {
            contracts.push(row?);
        }
        Ok(contracts)
    }

    /// 按ID查询
    pub fn find_by_id(&self, contract_id: &str) -> RepositoryResult<Option<Contract>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM contract WHERE contract_id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![contract_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}
