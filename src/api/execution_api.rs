// ==========================================
// 银行设备维保运维控制台 - 现场执行API
// ==========================================
// 职责: 技师侧的任务清单与执行动作 (开工 / 完工 / 子任务状态)
// 红线: 执行动作只在运行态轮次上允许; 完工后经事件口通知生命周期层
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionType;
use crate::domain::tournee::{Mission, SubMission};
use crate::domain::types::{Functionality, MissionStatus, SubMissionStatus};
use crate::engine::events::{MissionEvent, MissionEventPublisher, MissionEventType};
use crate::repository::{
    ActionLogRepository, AgencyRepository, MissionRepository, SubMissionRepository,
    TourneeRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// MissionListFilter - 技师任务清单筛选
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MissionListFilter {
    pub region: Option<String>,
    pub city: Option<String>,
    pub bank_id: Option<String>,
    /// false = 隐藏已完工任务 (技师默认视图)
    pub include_finished: bool,
}

// ==========================================
// ExecutionApi - 执行入口
// ==========================================
pub struct ExecutionApi {
    tournee_repo: TourneeRepository,
    mission_repo: MissionRepository,
    sub_mission_repo: SubMissionRepository,
    agency_repo: AgencyRepository,
    action_log_repo: ActionLogRepository,
    publisher: Arc<dyn MissionEventPublisher>,
}

impl ExecutionApi {
    pub fn new(
        tournee_repo: TourneeRepository,
        mission_repo: MissionRepository,
        sub_mission_repo: SubMissionRepository,
        agency_repo: AgencyRepository,
        action_log_repo: ActionLogRepository,
        publisher: Arc<dyn MissionEventPublisher>,
    ) -> Self {
        Self {
            tournee_repo,
            mission_repo,
            sub_mission_repo,
            agency_repo,
            action_log_repo,
            publisher,
        }
    }

    /// 技师任务清单: 地域/银行筛选, 按 (轮次, 拜访顺序) 排序
    pub fn missions_for_technician(
        &self,
        technician_id: &str,
        filter: &MissionListFilter,
    ) -> ApiResult<Vec<Mission>> {
        let agencies = self.agency_repo.list_all()?;
        let agency_index: HashMap<&str, &crate::domain::bank::Agency> = agencies
            .iter()
            .map(|a| (a.agency_id.as_str(), a))
            .collect();

        let mut missions = self.mission_repo.list_by_technician(technician_id)?;
        missions.retain(|m| {
            if !filter.include_finished && m.is_done() {
                return false;
            }
            let Some(agency) = agency_index.get(m.agency_id.as_str()) else {
                return false;
            };
            filter.region.as_deref().map_or(true, |r| agency.region == r)
                && filter.city.as_deref().map_or(true, |c| agency.city == c)
                && filter
                    .bank_id
                    .as_deref()
                    .map_or(true, |b| agency.bank_id == b)
        });
        missions.sort_by(|a, b| {
            a.tournee_id
                .cmp(&b.tournee_id)
                .then(a.visit_order.cmp(&b.visit_order))
        });
        Ok(missions)
    }

    pub fn sub_missions_of(&self, mission_id: &str) -> ApiResult<Vec<SubMission>> {
        Ok(self.sub_mission_repo.list_by_mission(mission_id)?)
    }

    /// 任务开工 (a_faire → en_cours); 重复开工为幂等 no-op
    #[instrument(skip(self))]
    pub fn start_mission(&self, mission_id: &str, actor: &str) -> ApiResult<Mission> {
        let mission = self.mission_repo.get(mission_id)?;
        self.ensure_running(&mission.tournee_id)?;
        if mission.status != MissionStatus::Todo {
            return Ok(mission);
        }

        let now = chrono::Local::now().naive_local();
        self.mission_repo
            .update_status(mission_id, MissionStatus::InProgress, Some(now), None)?;
        self.action_log_repo.append(
            actor,
            ActionType::MissionStarted,
            &format!("任务 {} 开工", mission_id),
        )?;
        self.publisher.publish(&MissionEvent::new(
            &mission.tournee_id,
            MissionEventType::MissionStarted,
            actor,
        ));
        info!(mission_id, "任务开工");
        self.mission_repo.get(mission_id).map_err(ApiError::from)
    }

    /// 任务完工 (→ terminee); 完工事件触发轮次自动完工判定
    #[instrument(skip(self))]
    pub fn complete_mission(&self, mission_id: &str, actor: &str) -> ApiResult<Mission> {
        let mission = self.mission_repo.get(mission_id)?;
        self.ensure_running(&mission.tournee_id)?;
        if mission.is_done() {
            return Ok(mission);
        }

        let now = chrono::Local::now().naive_local();
        // started_at 经 COALESCE 只在未开工时补写
        self.mission_repo
            .update_status(mission_id, MissionStatus::Done, Some(now), Some(now))?;
        self.action_log_repo.append(
            actor,
            ActionType::MissionCompleted,
            &format!("任务 {} 完工", mission_id),
        )?;
        self.publisher.publish(&MissionEvent::new(
            &mission.tournee_id,
            MissionEventType::MissionCompleted,
            actor,
        ));
        info!(mission_id, "任务完工");
        self.mission_repo.get(mission_id).map_err(ApiError::from)
    }

    /// 更新子任务状态与功能标记
    #[instrument(skip(self))]
    pub fn update_sub_mission(
        &self,
        sub_mission_id: &str,
        status: SubMissionStatus,
        functionality: Functionality,
        actor: &str,
    ) -> ApiResult<SubMission> {
        let sub = self.sub_mission_repo.get(sub_mission_id)?;
        let mission = self.mission_repo.get(&sub.mission_id)?;
        self.ensure_running(&mission.tournee_id)?;

        self.sub_mission_repo
            .update_state(sub_mission_id, status, functionality)?;
        self.action_log_repo.append(
            actor,
            ActionType::SubMissionUpdated,
            &format!(
                "子任务 {} → {} / {}",
                sub_mission_id,
                status,
                functionality
            ),
        )?;
        self.publisher.publish(&MissionEvent::new(
            &mission.tournee_id,
            MissionEventType::SubMissionUpdated,
            actor,
        ));
        self.sub_mission_repo
            .get(sub_mission_id)
            .map_err(ApiError::from)
    }

    /// 执行动作前置守卫: 轮次必须处于运行态
    fn ensure_running(&self, tournee_id: &str) -> ApiResult<()> {
        let tournee = self.tournee_repo.get(tournee_id)?;
        if !tournee.status.is_running() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "轮次 {} 处于 {} 状态, 不接受现场执行动作",
                tournee.code, tournee.status
            )));
        }
        Ok(())
    }
}
