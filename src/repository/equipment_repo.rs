// ==========================================
// 银行设备维保运维控制台 - 设备数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_connection;
use crate::domain::equipment::Equipment;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// EquipmentRepository - 设备仓储
// ==========================================
pub struct EquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentRepository {
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

    const COLUMNS: &'static str = "equipment_id, serial_no, type_code, brand_model, agency_id, \
         bank_id, contract_id, installed_on, last_intervention_on, status";

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Equipment> {
        Ok(Equipment {
            equipment_id: row.get(0)?,
            serial_no: row.get(1)?,
            type_code: row.get(2)?,
            brand_model: row.get(3)?,
            agency_id: row.get(4)?,
            bank_id: row.get(5)?,
            contract_id: row.get(6)?,
            installed_on: row.get::<_, NaiveDate>(7)?,
            last_intervention_on: row.get::<_, Option<NaiveDate>>(8)?,
            status: row.get(9)?,
        })
    }

    fn insert_stmt(tx: &rusqlite::Transaction<'_>, equipment: &Equipment) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO equipment (equipment_id, serial_no, type_code, brand_model, agency_id,
                                   bank_id, contract_id, installed_on, last_intervention_on, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                equipment.equipment_id,
                equipment.serial_no,
                equipment.type_code,
                equipment.brand_model,
                equipment.agency_id,
                equipment.bank_id,
                equipment.contract_id,
                equipment.installed_on,
                equipment.last_intervention_on,
                equipment.status,
            ],
        )?;
        Ok(())
    }

    /// 整集合替换
    pub fn replace_all(&self, equipments: &[Equipment]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM equipment", [])?;
        for equipment in equipments {
            Self::insert_stmt(&tx, equipment)?;
        }
        tx.commit()?;
        Ok(equipments.len())
    }

    /// 批量追加
    pub fn insert_batch(&self, equipments: &[Equipment]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for equipment in equipments {
            Self::insert_stmt(&tx, equipment)?;
        }
        tx.commit()?;
        Ok(equipments.len())
    }

    /// 查询全部设备
    pub fn list_all(&self) -> RepositoryResult<Vec<Equipment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM equipment ORDER BY equipment_id",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut equipments = Vec::new();
        for row in rows {
            equipments.push(row?);
        }
        Ok(equipments)
    }

    /// 按网点查询
    pub fn list_by_agency(&self, agency_id: &str) -> RepositoryResult<Vec<Equipment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM equipment WHERE agency_id = ?1 ORDER BY equipment_id",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map(params![agency_id], Self::map_row)?;
        let mut equipments = Vec::new();
        for row in rows {
            equipments.push(row?);
        }
        Ok(equipments)
    }

    /// 按ID查询
    pub fn find_by_id(&self, equipment_id: &str) -> RepositoryResult<Option<Equipment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM equipment WHERE equipment_id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![equipment_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// 删除单台设备 (报废下线)
    pub fn delete(&self, equipment_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n = conn.execute(
            "DELETE FROM equipment WHERE equipment_id = ?1",
            params![equipment_id],
        )?;
        Ok(n)
    }
}
