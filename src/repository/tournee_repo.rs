// ==========================================
// 银行设备维保运维控制台 - 巡检轮次数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储契约: replace_for_tournee 支撑编辑再生成的整批替换,
//           其余轮次的任务不受影响
// ==========================================

use crate::db::open_connection;
use crate::domain::tournee::{Mission, SubMission, Tournee};
use crate::domain::types::{Functionality, MissionStatus, SubMissionStatus, TourneeStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_datetime, parse_datetime};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

fn status_parse_err<E: std::fmt::Display>(idx: usize, e: E) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        )),
    )
}

// ==========================================
// TourneeRepository - 轮次仓储
// ==========================================
pub struct TourneeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TourneeRepository {
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

    const COLUMNS: &'static str = "tournee_id, code, name, description, date_start, \
         date_deadline, status, created_by, created_at";

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Tournee> {
        let status_raw: String = row.get(6)?;
        let created_at_raw: String = row.get(8)?;
        Ok(Tournee {
            tournee_id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            date_start: row.get::<_, NaiveDate>(4)?,
            date_deadline: row.get::<_, NaiveDate>(5)?,
            status: TourneeStatus::from_str(&status_raw).map_err(|e| status_parse_err(6, e))?,
            created_by: row.get(7)?,
            created_at: parse_datetime(&created_at_raw).map_err(|e| status_parse_err(8, e))?,
        })
    }

    /// 追加新轮次
    pub fn insert(&self, tournee: &Tournee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO tournee (tournee_id, code, name, description, date_start,
                                 date_deadline, status, created_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                tournee.tournee_id,
                tournee.code,
                tournee.name,
                tournee.description,
                tournee.date_start,
                tournee.date_deadline,
                tournee.status.as_str(),
                tournee.created_by,
                format_datetime(tournee.created_at),
            ],
        )?;
        Ok(())
    }

    /// 原地替换轮次记录 (编辑再生成)
    pub fn update(&self, tournee: &Tournee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let n = conn.execute(
            r#"
            UPDATE tournee
            SET code = ?2, name = ?3, description = ?4, date_start = ?5,
                date_deadline = ?6, status = ?7
            WHERE tournee_id = ?1
            "#,
            params![
                tournee.tournee_id,
                tournee.code,
                tournee.name,
                tournee.description,
                tournee.date_start,
                tournee.date_deadline,
                tournee.status.as_str(),
            ],
        )?;
        if n == 0 {
            return Err(RepositoryError::NotFound {
                entity: "tournee".to_string(),
                id: tournee.tournee_id.clone(),
            });
        }
        Ok(())
    }

    /// 更新轮次状态 (生命周期控制器专用)
    pub fn update_status(&self, tournee_id: &str, status: TourneeStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let n = conn.execute(
            "UPDATE tournee SET status = ?2 WHERE tournee_id = ?1",
            params![tournee_id, status.as_str()],
        )?;
        if n == 0 {
            return Err(RepositoryError::NotFound {
                entity: "tournee".to_string(),
                id: tournee_id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询全部轮次
    pub fn list_all(&self) -> RepositoryResult<Vec<Tournee>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tournee ORDER BY created_at DESC",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut tournees = Vec::new();
        for row in rows {
            tournees.push(row?);
        }
        Ok(tournees)
    }

    /// 按ID查询
    pub fn find_by_id(&self, tournee_id: &str) -> RepositoryResult<Option<Tournee>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tournee WHERE tournee_id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![tournee_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// 按ID查询, 未找到即报错
    pub fn get(&self, tournee_id: &str) -> RepositoryResult<Tournee> {
        self.find_by_id(tournee_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "tournee".to_string(),
                id: tournee_id.to_string(),
            })
    }
}

// ==========================================
// MissionRepository - 网点任务仓储
// ==========================================
pub struct MissionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MissionRepository {
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

    const COLUMNS: &'static str = "mission_id, tournee_id, agency_id, technician_id, \
         visit_order, status, started_at, completed_at";

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Mission> {
        let status_raw: String = row.get(5)?;
        let started_raw: Option<String> = row.get(6)?;
        let completed_raw: Option<String> = row.get(7)?;
        let started_at = match started_raw {
            Some(s) => Some(parse_datetime(&s).map_err(|e| status_parse_err(6, e))?),
            None => None,
        };
        let completed_at = match completed_raw {
            Some(s) => Some(parse_datetime(&s).map_err(|e| status_parse_err(7, e))?),
            None => None,
        };
        Ok(Mission {
            mission_id: row.get(0)?,
            tournee_id: row.get(1)?,
            agency_id: row.get(2)?,
            technician_id: row.get(3)?,
            visit_order: row.get(4)?,
            status: MissionStatus::from_str(&status_raw).map_err(|e| status_parse_err(5, e))?,
            started_at,
            completed_at,
        })
    }

    fn insert_stmt(tx: &rusqlite::Transaction<'_>, mission: &Mission) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO mission (mission_id, tournee_id, agency_id, technician_id,
                                 visit_order, status, started_at, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                mission.mission_id,
                mission.tournee_id,
                mission.agency_id,
                mission.technician_id,
                mission.visit_order,
                mission.status.as_str(),
                mission.started_at.map(format_datetime),
                mission.completed_at.map(format_datetime),
            ],
        )?;
        Ok(())
    }

    /// 批量追加 (轮次生成)
    pub fn insert_batch(&self, missions: &[Mission]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for mission in missions {
            Self::insert_stmt(&tx, mission)?;
        }
        tx.commit()?;
        Ok(missions.len())
    }

    /// 按轮次过滤后替换 (编辑再生成)
    ///
    /// # 说明
    /// - 仅删除该轮次的旧任务, 其他轮次不受影响
    /// - 调用方须先删除该轮次的子任务 (外键约束)
    pub fn replace_for_tournee(
        &self,
        tournee_id: &str,
        missions: &[Mission],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM mission WHERE tournee_id = ?1", params![tournee_id])?;
        for mission in missions {
            Self::insert_stmt(&tx, mission)?;
        }
        tx.commit()?;
        Ok(missions.len())
    }

    /// 查询全部任务
    pub fn list_all(&self) -> RepositoryResult<Vec<Mission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mission ORDER BY tournee_id, visit_order",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut missions = Vec::new();
        for row in rows {
            missions.push(row?);
        }
        Ok(missions)
    }

    /// 按轮次查询, 拜访顺序升序
    pub fn list_by_tournee(&self, tournee_id: &str) -> RepositoryResult<Vec<Mission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mission WHERE tournee_id = ?1 ORDER BY visit_order",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map(params![tournee_id], Self::map_row)?;
        let mut missions = Vec::new();
        for row in rows {
            missions.push(row?);
        }
        Ok(missions)
    }

    /// 按技师查询, 拜访顺序升序
    pub fn list_by_technician(&self, technician_id: &str) -> RepositoryResult<Vec<Mission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mission WHERE technician_id = ?1 ORDER BY visit_order",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map(params![technician_id], Self::map_row)?;
        let mut missions = Vec::new();
        for row in rows {
            missions.push(row?);
        }
        Ok(missions)
    }

    /// 按ID查询, 未找到即报错
    pub fn get(&self, mission_id: &str) -> RepositoryResult<Mission> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mission WHERE mission_id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![mission_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(RepositoryError::NotFound {
                entity: "mission".to_string(),
                id: mission_id.to_string(),
            }),
        }
    }

    /// 更新任务状态与时间戳 (现场执行流专用)
    pub fn update_status(
        &self,
        mission_id: &str,
        status: MissionStatus,
        started_at: Option<chrono::NaiveDateTime>,
        completed_at: Option<chrono::NaiveDateTime>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let n = conn.execute(
            r#"
            UPDATE mission
            SET status = ?2,
                started_at = COALESCE(?3, started_at),
                completed_at = ?4
            WHERE mission_id = ?1
            "#,
            params![
                mission_id,
                status.as_str(),
                started_at.map(format_datetime),
                completed_at.map(format_datetime),
            ],
        )?;
        if n == 0 {
            return Err(RepositoryError::NotFound {
                entity: "mission".to_string(),
                id: mission_id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// SubMissionRepository - 设备子任务仓储
// ==========================================
pub struct SubMissionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubMissionRepository {
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
        "sub_mission_id, mission_id, equipment_id, type_code, status, functionality";

    fn map_row(row: &Row<'_>) -> rusqlite::Result<SubMission> {
        let status_raw: String = row.get(4)?;
        let functionality_raw: String = row.get(5)?;
        Ok(SubMission {
            sub_mission_id: row.get(0)?,
            mission_id: row.get(1)?,
            equipment_id: row.get(2)?,
            type_code: row.get(3)?,
            status: SubMissionStatus::from_str(&status_raw)
                .map_err(|e| status_parse_err(4, e))?,
            functionality: Functionality::from_str(&functionality_raw)
                .map_err(|e| status_parse_err(5, e))?,
        })
    }

    fn insert_stmt(tx: &rusqlite::Transaction<'_>, sub: &SubMission) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO sub_mission (sub_mission_id, mission_id, equipment_id, type_code, status, functionality)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                sub.sub_mission_id,
                sub.mission_id,
                sub.equipment_id,
                sub.type_code,
                sub.status.as_str(),
                sub.functionality.as_str(),
            ],
        )?;
        Ok(())
    }

    /// 批量追加 (轮次生成)
    pub fn insert_batch(&self, subs: &[SubMission]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for sub in subs {
            Self::insert_stmt(&tx, sub)?;
        }
        tx.commit()?;
        Ok(subs.len())
    }

    /// 删除某轮次的全部子任务 (编辑再生成前置步骤)
    pub fn delete_for_tournee(&self, tournee_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n = conn.execute(
            r#"
            DELETE FROM sub_mission
            WHERE mission_id IN (SELECT mission_id FROM mission WHERE tournee_id = ?1)
            "#,
            params![tournee_id],
        )?;
        Ok(n)
    }

    /// 查询全部子任务
    pub fn list_all(&self) -> RepositoryResult<Vec<SubMission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sub_mission ORDER BY mission_id, sub_mission_id",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::map_row)?;
        let mut subs = Vec::new();
        for row in rows {
            subs.push(row?);
        }
        Ok(subs)
    }

    /// 按任务查询
    pub fn list_by_mission(&self, mission_id: &str) -> RepositoryResult<Vec<SubMission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sub_mission WHERE mission_id = ?1 ORDER BY sub_mission_id",
            Self::COLUMNS
        ))?;
        let rows = stmt.query_map(params![mission_id], Self::map_row)?;
        let mut subs = Vec::new();
        for row in rows {
            subs.push(row?);
        }
        Ok(subs)
    }

    /// 按轮次查询 (联树任务表)
    pub fn list_for_tournee(&self, tournee_id: &str) -> RepositoryResult<Vec<SubMission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sm.sub_mission_id, sm.mission_id, sm.equipment_id, sm.type_code, sm.status, sm.functionality
            FROM sub_mission sm
            JOIN mission m ON m.mission_id = sm.mission_id
            WHERE m.tournee_id = ?1
            ORDER BY m.visit_order, sm.sub_mission_id
            "#,
        )?;
        let rows = stmt.query_map(params![tournee_id], Self::map_row)?;
        let mut subs = Vec::new();
        for row in rows {
            subs.push(row?);
        }
        Ok(subs)
    }

    /// 按ID查询, 未找到即报错
    pub fn get(&self, sub_mission_id: &str) -> RepositoryResult<SubMission> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sub_mission WHERE sub_mission_id = ?1",
            Self::COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![sub_mission_id], Self::map_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(RepositoryError::NotFound {
                entity: "sub_mission".to_string(),
                id: sub_mission_id.to_string(),
            }),
        }
    }

    /// 更新子任务状态与功能标记 (现场执行流专用)
    pub fn update_state(
        &self,
        sub_mission_id: &str,
        status: SubMissionStatus,
        functionality: Functionality,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let n = conn.execute(
            "UPDATE sub_mission SET status = ?2, functionality = ?3 WHERE sub_mission_id = ?1",
            params![sub_mission_id, status.as_str(), functionality.as_str()],
        )?;
        if n == 0 {
            return Err(RepositoryError::NotFound {
                entity: "sub_mission".to_string(),
                id: sub_mission_id.to_string(),
            });
        }
        Ok(())
    }
}
