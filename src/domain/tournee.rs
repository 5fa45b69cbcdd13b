// ==========================================
// 银行设备维保运维控制台 - 巡检轮次领域模型
// ==========================================
// 层级: Tournée → Mission(网点任务) → SubMission(设备子任务)
// 红线: mission_id / sub_mission_id 由 {轮次, 网点/设备} 确定性派生,
//       编辑再生成可安全整批替换而不波及其他轮次
// ==========================================

use crate::domain::types::{Functionality, MissionStatus, SubMissionStatus, TourneeStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Tournee - 巡检轮次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournee {
    pub tournee_id: String,        // 轮次ID
    pub code: String,              // 轮次编号 (如 T2024-Q1)
    pub name: String,              // 轮次名称
    pub description: String,       // 描述
    pub date_start: NaiveDate,     // 开始日期
    pub date_deadline: NaiveDate,  // 截止日期
    pub status: TourneeStatus,     // 生命周期状态
    pub created_by: String,        // 创建人
    pub created_at: NaiveDateTime, // 创建时间
}

// ==========================================
// Mission - 网点任务(轮次内一个网点的拜访)
// ==========================================
// visit_order 在同一轮次内为 {1..N} 连续且唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: String,                 // 任务ID (m-{轮次}-{网点})
    pub tournee_id: String,                 // 所属轮次
    pub agency_id: String,                  // 拜访网点
    pub technician_id: String,              // 指派技师
    pub visit_order: i32,                   // 拜访顺序 (≥1)
    pub status: MissionStatus,              // 任务状态
    pub started_at: Option<NaiveDateTime>,  // 开工时间
    pub completed_at: Option<NaiveDateTime>, // 完工时间
}

impl Mission {
    /// 确定性任务ID: 同一 {轮次, 网点} 再生成必得同一ID
    pub fn derive_id(tournee_id: &str, agency_id: &str) -> String {
        format!("m-{}-{}", tournee_id, agency_id)
    }

    pub fn is_done(&self) -> bool {
        self.status == MissionStatus::Done
    }
}

// ==========================================
// SubMission - 设备子任务(任务内一台设备的检查单)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubMission {
    pub sub_mission_id: String,        // 子任务ID (sm-{轮次}-{设备})
    pub mission_id: String,            // 所属任务
    pub equipment_id: String,          // 检查设备
    pub type_code: String,             // 设备类型快照
    pub status: SubMissionStatus,      // 子任务状态
    pub functionality: Functionality,  // 功能状态标记
}

impl SubMission {
    /// 确定性子任务ID: 同一 {轮次, 设备} 再生成必得同一ID
    pub fn derive_id(tournee_id: &str, equipment_id: &str) -> String {
        format!("sm-{}-{}", tournee_id, equipment_id)
    }

    pub fn is_validated(&self) -> bool {
        self.status == SubMissionStatus::Validated
    }
}
