// ==========================================
// 银行设备维保运维控制台 - 生命周期API
// ==========================================
// 职责: 轮次状态机的人工迁移入口 + 订阅任务事件做自动完工
// 红线: 迁移合法性由 LifecycleController 统一裁决, 本层只负责落库与留痕
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionType;
use crate::domain::tournee::Tournee;
use crate::domain::types::TourneeStatus;
use crate::engine::events::{MissionEvent, MissionEventPublisher, MissionEventType};
use crate::engine::lifecycle::LifecycleController;
use crate::repository::{ActionLogRepository, MissionRepository, TourneeRepository};
use tracing::{error, info, instrument};

// ==========================================
// LifecycleApi - 状态机入口
// ==========================================
pub struct LifecycleApi {
    tournee_repo: TourneeRepository,
    mission_repo: MissionRepository,
    action_log_repo: ActionLogRepository,
}

impl LifecycleApi {
    pub fn new(
        tournee_repo: TourneeRepository,
        mission_repo: MissionRepository,
        action_log_repo: ActionLogRepository,
    ) -> Self {
        Self {
            tournee_repo,
            mission_repo,
            action_log_repo,
        }
    }

    /// 触发轮次 (planifiee → declenchee)
    pub fn trigger(&self, tournee_id: &str, actor: &str) -> ApiResult<Tournee> {
        self.transition(tournee_id, TourneeStatus::Triggered, actor, ActionType::TourneeTriggered)
    }

    /// 暂停轮次 (declenchee → en_pause)
    pub fn pause(&self, tournee_id: &str, actor: &str) -> ApiResult<Tournee> {
        self.transition(tournee_id, TourneeStatus::Paused, actor, ActionType::TourneePaused)
    }

    /// 恢复轮次 (en_pause → declenchee)
    pub fn resume(&self, tournee_id: &str, actor: &str) -> ApiResult<Tournee> {
        self.transition(tournee_id, TourneeStatus::Triggered, actor, ActionType::TourneeResumed)
    }

    /// 关账 (terminee → cloturee, 终态)
    pub fn close(&self, tournee_id: &str, actor: &str) -> ApiResult<Tournee> {
        self.transition(tournee_id, TourneeStatus::Closed, actor, ActionType::TourneeClosed)
    }

    /// 人工状态迁移的统一路径
    #[instrument(skip(self))]
    fn transition(
        &self,
        tournee_id: &str,
        to: TourneeStatus,
        actor: &str,
        action: ActionType,
    ) -> ApiResult<Tournee> {
        let mut tournee = self.tournee_repo.get(tournee_id)?;
        if !LifecycleController::can_transition(tournee.status, to) {
            return Err(ApiError::InvalidStateTransition {
                from: tournee.status.to_string(),
                to: to.to_string(),
            });
        }

        self.tournee_repo.update_status(tournee_id, to)?;
        self.action_log_repo.append(
            actor,
            action,
            &format!("轮次 {} 状态: {} → {}", tournee.code, tournee.status, to),
        )?;
        info!(from = %tournee.status, to = %to, "轮次状态迁移完成");
        tournee.status = to;
        Ok(tournee)
    }

    /// 自动完工判定: 运行态 + 任务集非空 + 全部完工 → terminee
    fn evaluate_auto_complete(&self, tournee_id: &str, source: &str) -> ApiResult<()> {
        let tournee = self.tournee_repo.get(tournee_id)?;
        let missions = self.mission_repo.list_by_tournee(tournee_id)?;

        if let Some(next) = LifecycleController::auto_complete(tournee.status, &missions) {
            self.tournee_repo.update_status(tournee_id, next)?;
            self.action_log_repo.append(
                source,
                ActionType::TourneeAutoCompleted,
                &format!("轮次 {} 全部任务完工, 自动转为 {}", tournee.code, next),
            )?;
            info!(tournee_id, "轮次自动完工");
        }
        Ok(())
    }
}

// 执行层每次任务完工后发布事件, 本层在此做自动完工判定
impl MissionEventPublisher for LifecycleApi {
    fn publish(&self, event: &MissionEvent) {
        if event.event_type != MissionEventType::MissionCompleted {
            return;
        }
        if let Err(err) = self.evaluate_auto_complete(&event.tournee_id, &event.source) {
            // 发布口无返回值, 自动完工失败只留痕不上抛
            error!(tournee_id = %event.tournee_id, error = %err, "自动完工判定失败");
        }
    }
}
