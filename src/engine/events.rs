// ==========================================
// 银行设备维保运维控制台 - 任务事件
// ==========================================
// 职责: 现场执行层通过事件通知生命周期层, 解除两层的直接依赖
// 典型链路: complete_mission → publish → 生命周期层做自动完工判定
// ==========================================

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MissionEventType {
    /// 任务开工
    MissionStarted,
    /// 任务完工 (触发自动完工判定)
    MissionCompleted,
    /// 子任务状态/功能标记变更
    SubMissionUpdated,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionEvent {
    pub tournee_id: String,
    pub event_type: MissionEventType,
    /// 事件来源 (操作者登录名)
    pub source: String,
}

impl MissionEvent {
    pub fn new(tournee_id: &str, event_type: MissionEventType, source: &str) -> Self {
        Self {
            tournee_id: tournee_id.to_string(),
            event_type,
            source: source.to_string(),
        }
    }
}

/// 任务事件发布口 - 由生命周期层实现, 执行层只依赖本 trait
pub trait MissionEventPublisher: Send + Sync {
    fn publish(&self, event: &MissionEvent);
}

/// 空实现, 用于测试或无观察者场景
pub struct NoOpEventPublisher;

impl MissionEventPublisher for NoOpEventPublisher {
    fn publish(&self, _event: &MissionEvent) {}
}
