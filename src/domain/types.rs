// ==========================================
// 银行设备维保运维控制台 - 领域类型定义
// ==========================================
// 序列化格式: 与前端/数据库一致的法语 wire 字符串
// 红线: 状态一律用类型安全枚举, 不允许裸字符串流转
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 巡检轮次状态 (Tournée Status)
// ==========================================
// 生命周期: planifiee → declenchee ⇄ en_pause → terminee → cloturee
// 红线: cloturee 为终态, 任何转换不得复活
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TourneeStatus {
    #[serde(rename = "planifiee")]
    Planned, // 已规划(可编辑)
    #[serde(rename = "declenchee")]
    Triggered, // 已触发(执行中)
    #[serde(rename = "en_pause")]
    Paused, // 暂停(可编辑)
    #[serde(rename = "terminee")]
    Completed, // 已完成(全部任务 done 时自动到达)
    #[serde(rename = "cloturee")]
    Closed, // 已归档(终态)
}

impl TourneeStatus {
    /// 转换为数据库/前端 wire 字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            TourneeStatus::Planned => "planifiee",
            TourneeStatus::Triggered => "declenchee",
            TourneeStatus::Paused => "en_pause",
            TourneeStatus::Completed => "terminee",
            TourneeStatus::Closed => "cloturee",
        }
    }

    /// 判断轮次是否处于可编辑状态 (planifiee / en_pause)
    pub fn is_editable(&self) -> bool {
        matches!(self, TourneeStatus::Planned | TourneeStatus::Paused)
    }

    /// 判断轮次是否处于执行态 (declenchee / en_pause)
    ///
    /// 自动完成检查只对执行态轮次生效
    pub fn is_running(&self) -> bool {
        matches!(self, TourneeStatus::Triggered | TourneeStatus::Paused)
    }
}

impl fmt::Display for TourneeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TourneeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planifiee" => Ok(TourneeStatus::Planned),
            "declenchee" => Ok(TourneeStatus::Triggered),
            "en_pause" => Ok(TourneeStatus::Paused),
            "terminee" => Ok(TourneeStatus::Completed),
            "cloturee" => Ok(TourneeStatus::Closed),
            other => Err(format!("未知的轮次状态: {}", other)),
        }
    }
}

// ==========================================
// 网点任务状态 (Mission Status)
// ==========================================
// 由现场执行流变更; 进度聚合与生命周期控制只读
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionStatus {
    #[serde(rename = "a_faire")]
    Todo, // 待处理
    #[serde(rename = "en_cours")]
    InProgress, // 进行中
    #[serde(rename = "terminee")]
    Done, // 已完成
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Todo => "a_faire",
            MissionStatus::InProgress => "en_cours",
            MissionStatus::Done => "terminee",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a_faire" => Ok(MissionStatus::Todo),
            "en_cours" => Ok(MissionStatus::InProgress),
            "terminee" => Ok(MissionStatus::Done),
            other => Err(format!("未知的任务状态: {}", other)),
        }
    }
}

// ==========================================
// 设备子任务状态 (SubMission Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubMissionStatus {
    #[serde(rename = "a_faire")]
    Todo, // 待处理
    #[serde(rename = "en_cours")]
    InProgress, // 进行中
    #[serde(rename = "valide")]
    Validated, // 已验证
}

impl SubMissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubMissionStatus::Todo => "a_faire",
            SubMissionStatus::InProgress => "en_cours",
            SubMissionStatus::Validated => "valide",
        }
    }
}

impl fmt::Display for SubMissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubMissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a_faire" => Ok(SubMissionStatus::Todo),
            "en_cours" => Ok(SubMissionStatus::InProgress),
            "valide" => Ok(SubMissionStatus::Validated),
            other => Err(format!("未知的子任务状态: {}", other)),
        }
    }
}

// ==========================================
// 设备功能状态 (Functionality)
// ==========================================
// 默认乐观值: fonctionnel (生成子任务时使用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Functionality {
    #[serde(rename = "fonctionnel")]
    Functional, // 功能正常
    #[serde(rename = "non_fonctionnel")]
    NonFunctional, // 功能异常
}

impl Functionality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Functionality::Functional => "fonctionnel",
            Functionality::NonFunctional => "non_fonctionnel",
        }
    }
}

impl fmt::Display for Functionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Functionality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fonctionnel" => Ok(Functionality::Functional),
            "non_fonctionnel" => Ok(Functionality::NonFunctional),
            other => Err(format!("未知的功能状态: {}", other)),
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ADMIN")]
    Admin, // 管理员(参照数据维护)
    #[serde(rename = "COORDINATEUR")]
    Coordinator, // 调度员(轮次规划)
    #[serde(rename = "TECHNICIEN")]
    Technician, // 技师(现场执行)
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Coordinator => "COORDINATEUR",
            UserRole::Technician => "TECHNICIEN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "COORDINATEUR" => Ok(UserRole::Coordinator),
            "TECHNICIEN" => Ok(UserRole::Technician),
            other => Err(format!("未知的用户角色: {}", other)),
        }
    }
}

// ==========================================
// 合同维保频率 (Contract Frequency)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractFrequency {
    #[serde(rename = "Trimestrielle")]
    Quarterly, // 季度
    #[serde(rename = "Semestrielle")]
    SemiAnnual, // 半年
    #[serde(rename = "Annuelle")]
    Annual, // 年度
}

impl ContractFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractFrequency::Quarterly => "Trimestrielle",
            ContractFrequency::SemiAnnual => "Semestrielle",
            ContractFrequency::Annual => "Annuelle",
        }
    }
}

impl fmt::Display for ContractFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContractFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Trimestrielle" => Ok(ContractFrequency::Quarterly),
            "Semestrielle" => Ok(ContractFrequency::SemiAnnual),
            "Annuelle" => Ok(ContractFrequency::Annual),
            other => Err(format!("未知的维保频率: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tournee_status_roundtrip() {
        for s in [
            TourneeStatus::Planned,
            TourneeStatus::Triggered,
            TourneeStatus::Paused,
            TourneeStatus::Completed,
            TourneeStatus::Closed,
        ] {
            assert_eq!(s.as_str().parse::<TourneeStatus>().unwrap(), s);
        }
    }

    #[test]
    fn editable_states() {
        assert!(TourneeStatus::Planned.is_editable());
        assert!(TourneeStatus::Paused.is_editable());
        assert!(!TourneeStatus::Triggered.is_editable());
        assert!(!TourneeStatus::Completed.is_editable());
        assert!(!TourneeStatus::Closed.is_editable());
    }

    #[test]
    fn running_states() {
        assert!(TourneeStatus::Triggered.is_running());
        assert!(TourneeStatus::Paused.is_running());
        assert!(!TourneeStatus::Planned.is_running());
        assert!(!TourneeStatus::Closed.is_running());
    }
}
