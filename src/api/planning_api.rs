// ==========================================
// 银行设备维保运维控制台 - 规划向导API
// ==========================================
// 职责: 协调员侧的轮次规划三步向导 (基本信息 → 合同选择 → 指派与顺序)
// 红线: 提交是唯一写入点, 向导中间态不落库
// 红线: 编辑提交走批量替换 (先删子任务, 再换任务, 最后插新子任务, FK序不可乱)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::ActionType;
use crate::domain::tournee::Tournee;
use crate::domain::user::User;
use crate::engine::draft::TourneeDraft;
use crate::engine::eligibility::{EligibilityEngine, EligibleAgency};
use crate::engine::generator::TourneeGenerator;
use crate::repository::{
    ActionLogRepository, AgencyRepository, ContractRepository, EquipmentRepository,
    MissionRepository, SubMissionRepository, TourneeRepository, UserRepository,
};
use std::collections::BTreeSet;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// PlanningApi - 规划向导入口
// ==========================================
pub struct PlanningApi {
    tournee_repo: TourneeRepository,
    mission_repo: MissionRepository,
    sub_mission_repo: SubMissionRepository,
    agency_repo: AgencyRepository,
    equipment_repo: EquipmentRepository,
    contract_repo: ContractRepository,
    user_repo: UserRepository,
    action_log_repo: ActionLogRepository,
}

impl PlanningApi {
    pub fn new(
        tournee_repo: TourneeRepository,
        mission_repo: MissionRepository,
        sub_mission_repo: SubMissionRepository,
        agency_repo: AgencyRepository,
        equipment_repo: EquipmentRepository,
        contract_repo: ContractRepository,
        user_repo: UserRepository,
        action_log_repo: ActionLogRepository,
    ) -> Self {
        Self {
            tournee_repo,
            mission_repo,
            sub_mission_repo,
            agency_repo,
            equipment_repo,
            contract_repo,
            user_repo,
            action_log_repo,
        }
    }

    /// 新建向导: 预生成轮次ID, 返回空草稿
    pub fn start_draft(&self, created_by: &str) -> TourneeDraft {
        let tournee_id = Uuid::new_v4().to_string();
        TourneeDraft::new(tournee_id, created_by.to_string())
    }

    /// 编辑向导: 从既有轮次重建草稿
    ///
    /// 合同选择从子任务设备反推 (轮次本身不存储合同清单),
    /// 指派台账从既有任务恢复, 用户的既往顺序与技师选择全部保留
    #[instrument(skip(self))]
    pub fn start_edit(&self, tournee_id: &str) -> ApiResult<TourneeDraft> {
        let tournee = self.tournee_repo.get(tournee_id)?;
        if !tournee.status.is_editable() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "轮次 {} 处于 {} 状态, 不允许编辑",
                tournee_id, tournee.status
            )));
        }

        let missions = self.mission_repo.list_by_tournee(tournee_id)?;
        let sub_missions = self.sub_mission_repo.list_for_tournee(tournee_id)?;

        let mut contract_ids: BTreeSet<String> = BTreeSet::new();
        for sub in &sub_missions {
            if let Some(equipment) = self.equipment_repo.find_by_id(&sub.equipment_id)? {
                contract_ids.insert(equipment.contract_id);
            }
        }

        let mut draft = TourneeDraft::new(tournee_id.to_string(), tournee.created_by.clone());
        draft.editing = true;
        draft.code = tournee.code;
        draft.name = tournee.name;
        draft.description = tournee.description;
        draft.date_start = Some(tournee.date_start);
        draft.date_deadline = Some(tournee.date_deadline);
        draft.initial_status = tournee.status;
        draft.selected_contract_ids = contract_ids.into_iter().collect();
        draft.ledger.seed_from_missions(&missions);
        Ok(draft)
    }

    /// 第三步数据源: 以草稿当前合同选择判定入选网点
    pub fn eligible_agencies(&self, draft: &TourneeDraft) -> ApiResult<Vec<EligibleAgency>> {
        let agencies = self.agency_repo.list_all()?;
        let equipments = self.equipment_repo.list_all()?;
        let contracts = self.contract_repo.list_all()?;
        Ok(EligibilityEngine::resolve(
            &draft.selected_contract_ids,
            &agencies,
            &equipments,
            &contracts,
        ))
    }

    /// 可指派技师清单 (在职且具备技师角色)
    pub fn available_technicians(&self) -> ApiResult<Vec<User>> {
        Ok(self.user_repo.list_technicians()?)
    }

    pub fn list_tournees(&self) -> ApiResult<Vec<Tournee>> {
        Ok(self.tournee_repo.list_all()?)
    }

    pub fn get_tournee(&self, tournee_id: &str) -> ApiResult<Tournee> {
        Ok(self.tournee_repo.get(tournee_id)?)
    }

    /// 提交草稿: 生成并落库完整批次
    ///
    /// # 流程
    /// 1. 生成器内部先做全量校验与资格重判定
    /// 2. 新建: 轮次 + 任务 + 子任务 三表直插
    /// 3. 编辑: 轮次整行更新 → 删旧子任务 → 替换任务 → 插新子任务
    #[instrument(skip(self, draft), fields(tournee_id = %draft.tournee_id, editing = draft.editing))]
    pub fn commit(&self, draft: &TourneeDraft) -> ApiResult<Tournee> {
        let agencies = self.agency_repo.list_all()?;
        let equipments = self.equipment_repo.list_all()?;
        let contracts = self.contract_repo.list_all()?;
        let now = chrono::Local::now().naive_local();

        let batch = TourneeGenerator::generate(draft, &agencies, &equipments, &contracts, now)?;

        if draft.editing {
            // created_at 保留原值
            let original = self.tournee_repo.get(&draft.tournee_id)?;
            let mut tournee = batch.tournee.clone();
            tournee.created_at = original.created_at;

            self.tournee_repo.update(&tournee)?;
            self.sub_mission_repo.delete_for_tournee(&draft.tournee_id)?;
            self.mission_repo
                .replace_for_tournee(&draft.tournee_id, &batch.missions)?;
            self.sub_mission_repo.insert_batch(&batch.sub_missions)?;

            self.action_log_repo.append(
                &draft.created_by,
                ActionType::TourneeRegenerated,
                &format!(
                    "轮次 {} 重生成: {} 任务 / {} 子任务",
                    tournee.code,
                    batch.missions.len(),
                    batch.sub_missions.len()
                ),
            )?;
            info!(missions = batch.missions.len(), "轮次编辑提交完成");
            Ok(tournee)
        } else {
            self.tournee_repo.insert(&batch.tournee)?;
            self.mission_repo.insert_batch(&batch.missions)?;
            self.sub_mission_repo.insert_batch(&batch.sub_missions)?;

            self.action_log_repo.append(
                &draft.created_by,
                ActionType::TourneeCreated,
                &format!(
                    "轮次 {} 创建: {} 任务 / {} 子任务",
                    batch.tournee.code,
                    batch.missions.len(),
                    batch.sub_missions.len()
                ),
            )?;
            info!(missions = batch.missions.len(), "轮次创建提交完成");
            Ok(batch.tournee)
        }
    }
}
