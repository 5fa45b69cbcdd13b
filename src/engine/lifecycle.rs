// ==========================================
// 银行设备维保运维控制台 - 轮次生命周期控制器
// ==========================================
// 状态机: planifiee → declenchee ⇄ en_pause → terminee → cloturee
// 红线: 自动完工只在运行态触发, 且要求任务集非空并全部完工
// 红线: cloturee 为终态, 任何迁移请求一律拒绝
// ==========================================

use crate::domain::tournee::Mission;
use crate::domain::types::TourneeStatus;
use tracing::info;

// ==========================================
// LifecycleController - 状态机裁决
// ==========================================
pub struct LifecycleController;

impl LifecycleController {
    /// 当前状态下是否允许进入编辑向导
    pub fn can_edit(status: TourneeStatus) -> bool {
        status.is_editable()
    }

    /// 裁决人工状态迁移是否合法
    pub fn can_transition(from: TourneeStatus, to: TourneeStatus) -> bool {
        use TourneeStatus::*;
        matches!(
            (from, to),
            (Planned, Triggered)
                | (Triggered, Paused)
                | (Paused, Triggered)
                | (Triggered, Completed)
                | (Paused, Completed)
                | (Completed, Closed)
        )
    }

    /// 任务完工后的自动完工判定
    ///
    /// 返回 Some(Completed) 当且仅当: 轮次处于运行态, 任务集非空, 且全部任务完工
    pub fn auto_complete(status: TourneeStatus, missions: &[Mission]) -> Option<TourneeStatus> {
        if !status.is_running() {
            return None;
        }
        if missions.is_empty() {
            return None;
        }
        if missions.iter().all(Mission::is_done) {
            info!(missions = missions.len(), "全部任务完工, 轮次自动转为 terminee");
            Some(TourneeStatus::Completed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MissionStatus;

    fn mission(id: &str, status: MissionStatus) -> Mission {
        Mission {
            mission_id: id.to_string(),
            tournee_id: "t1".to_string(),
            agency_id: format!("a-{}", id),
            technician_id: "tech-1".to_string(),
            visit_order: 1,
            status,
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn transition_table_matches_lifecycle() {
        use TourneeStatus::*;
        assert!(LifecycleController::can_transition(Planned, Triggered));
        assert!(LifecycleController::can_transition(Triggered, Paused));
        assert!(LifecycleController::can_transition(Paused, Triggered));
        assert!(LifecycleController::can_transition(Triggered, Completed));
        assert!(LifecycleController::can_transition(Completed, Closed));

        assert!(!LifecycleController::can_transition(Planned, Completed));
        assert!(!LifecycleController::can_transition(Planned, Paused));
        assert!(!LifecycleController::can_transition(Closed, Triggered));
        assert!(!LifecycleController::can_transition(Closed, Planned));
        assert!(!LifecycleController::can_transition(Completed, Triggered));
    }

    #[test]
    fn editing_only_in_planned_or_paused() {
        use TourneeStatus::*;
        assert!(LifecycleController::can_edit(Planned));
        assert!(LifecycleController::can_edit(Paused));
        assert!(!LifecycleController::can_edit(Triggered));
        assert!(!LifecycleController::can_edit(Completed));
        assert!(!LifecycleController::can_edit(Closed));
    }

    #[test]
    fn auto_complete_fires_only_when_all_done_while_running() {
        let partial = vec![
            mission("m1", MissionStatus::Done),
            mission("m2", MissionStatus::InProgress),
        ];
        assert_eq!(
            LifecycleController::auto_complete(TourneeStatus::Triggered, &partial),
            None
        );

        let done = vec![
            mission("m1", MissionStatus::Done),
            mission("m2", MissionStatus::Done),
        ];
        assert_eq!(
            LifecycleController::auto_complete(TourneeStatus::Triggered, &done),
            Some(TourneeStatus::Completed)
        );
        // 暂停中同样允许自动完工 (is_running 含 en_pause)
        assert_eq!(
            LifecycleController::auto_complete(TourneeStatus::Paused, &done),
            Some(TourneeStatus::Completed)
        );
    }

    #[test]
    fn auto_complete_never_fires_outside_running_states() {
        let done = vec![mission("m1", MissionStatus::Done)];
        assert_eq!(
            LifecycleController::auto_complete(TourneeStatus::Planned, &done),
            None
        );
        assert_eq!(
            LifecycleController::auto_complete(TourneeStatus::Completed, &done),
            None
        );
    }

    #[test]
    fn empty_mission_set_never_auto_completes() {
        assert_eq!(
            LifecycleController::auto_complete(TourneeStatus::Triggered, &[]),
            None
        );
    }
}
