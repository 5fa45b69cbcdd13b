// ==========================================
// 银行设备维保运维控制台 - 进度看板API
// ==========================================
// 职责: 进度报表查询 + 运维洞察 + 操作留痕回看
// 红线: 看板只读, 不做任何写入
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::action_log::ActionLog;
use crate::engine::insight::{generate_or_fallback, InsightGenerator};
use crate::engine::progress::{ProgressAggregator, ProgressFilter, ProgressReport};
use crate::repository::{
    ActionLogRepository, AgencyRepository, EquipmentRepository, MissionRepository,
    SubMissionRepository, UserRepository,
};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// DashboardApi - 看板入口
// ==========================================
pub struct DashboardApi {
    mission_repo: MissionRepository,
    sub_mission_repo: SubMissionRepository,
    agency_repo: AgencyRepository,
    equipment_repo: EquipmentRepository,
    user_repo: UserRepository,
    action_log_repo: ActionLogRepository,
    insight_generator: Arc<dyn InsightGenerator>,
}

impl DashboardApi {
    pub fn new(
        mission_repo: MissionRepository,
        sub_mission_repo: SubMissionRepository,
        agency_repo: AgencyRepository,
        equipment_repo: EquipmentRepository,
        user_repo: UserRepository,
        action_log_repo: ActionLogRepository,
        insight_generator: Arc<dyn InsightGenerator>,
    ) -> Self {
        Self {
            mission_repo,
            sub_mission_repo,
            agency_repo,
            equipment_repo,
            user_repo,
            action_log_repo,
            insight_generator,
        }
    }

    /// 进度报表: 三级筛选后的多维汇总
    #[instrument(skip(self))]
    pub fn progress(&self, filter: &ProgressFilter) -> ApiResult<ProgressReport> {
        let missions = self.mission_repo.list_all()?;
        let sub_missions = self.sub_mission_repo.list_all()?;
        let agencies = self.agency_repo.list_all()?;
        let equipments = self.equipment_repo.list_all()?;
        let technicians = self.user_repo.list_all()?;

        Ok(ProgressAggregator::aggregate(
            filter,
            &missions,
            &sub_missions,
            &agencies,
            &equipments,
            &technicians,
        ))
    }

    /// 运维洞察: 分析服务不可用时回退固定文案, 绝不报错
    pub async fn insight(&self, filter: &ProgressFilter) -> ApiResult<String> {
        let report = self.progress(filter)?;
        Ok(generate_or_fallback(self.insight_generator.as_ref(), &report).await)
    }

    /// 最近操作留痕 (倒序)
    pub fn recent_actions(&self, limit: usize) -> ApiResult<Vec<ActionLog>> {
        Ok(self.action_log_repo.list_recent(limit)?)
    }
}
