// ==========================================
// 银行设备维保运维控制台 - 操作日志领域模型
// ==========================================
// 用途: 审计追踪, 仪表盘"最近操作"列表
// 红线: 只追加, 不修改, 不删除
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    TourneeCreated,      // 轮次创建
    TourneeRegenerated,  // 轮次编辑再生成
    TourneeTriggered,    // 轮次触发
    TourneePaused,       // 轮次暂停
    TourneeResumed,      // 轮次恢复
    TourneeAutoCompleted, // 轮次自动完成
    TourneeClosed,       // 轮次归档
    MissionStarted,      // 任务开工
    MissionCompleted,    // 任务完工
    SubMissionUpdated,   // 子任务更新
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::TourneeCreated => "TOURNEE_CREATED",
            ActionType::TourneeRegenerated => "TOURNEE_REGENERATED",
            ActionType::TourneeTriggered => "TOURNEE_TRIGGERED",
            ActionType::TourneePaused => "TOURNEE_PAUSED",
            ActionType::TourneeResumed => "TOURNEE_RESUMED",
            ActionType::TourneeAutoCompleted => "TOURNEE_AUTO_COMPLETED",
            ActionType::TourneeClosed => "TOURNEE_CLOSED",
            ActionType::MissionStarted => "MISSION_STARTED",
            ActionType::MissionCompleted => "MISSION_COMPLETED",
            ActionType::SubMissionUpdated => "SUB_MISSION_UPDATED",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// ActionLog - 操作日志条目
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub log_id: String,            // 日志ID (uuid)
    pub timestamp: NaiveDateTime,  // 发生时间
    pub actor: String,             // 操作人
    pub action: String,            // 操作类型字符串
    pub details: String,           // 细节描述
}
