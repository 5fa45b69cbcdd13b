// ==========================================
// 银行设备维保运维控制台 - 轮次生成器
// ==========================================
// 职责: 消费向导草稿, 原子性推导出 轮次 + 任务 + 子任务 的完整批次
// 红线: 生成是纯函数, 不触库; 全部一致性检查在任何写入之前完成
// 红线: 提交时重新判定资格, 不信任向导早期缓存
// ==========================================

use crate::domain::bank::Agency;
use crate::domain::contract::Contract;
use crate::domain::equipment::Equipment;
use crate::domain::tournee::{Mission, SubMission, Tournee};
use crate::domain::types::{Functionality, MissionStatus, SubMissionStatus};
use crate::engine::draft::{TourneeDraft, ValidationViolation};
use crate::engine::eligibility::EligibilityEngine;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// GenerationError - 生成失败原因
// ==========================================
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("草稿校验未通过: {violations:?}")]
    InvalidDraft { violations: Vec<ValidationViolation> },

    #[error("所选合同范围内不存在任何入选网点")]
    NoEligibleAgency,

    #[error("以下网点尚未指派技师: {agency_ids:?}")]
    UnassignedAgencies { agency_ids: Vec<String> },
}

// ==========================================
// GeneratedTournee - 生成结果批次
// ==========================================
#[derive(Debug, Clone)]
pub struct GeneratedTournee {
    pub tournee: Tournee,
    pub missions: Vec<Mission>,
    pub sub_missions: Vec<SubMission>,
}

// ==========================================
// TourneeGenerator - 生成器
// ==========================================
pub struct TourneeGenerator;

impl TourneeGenerator {
    /// 从草稿生成轮次批次
    ///
    /// # 流程
    /// 1. 草稿三步整体校验
    /// 2. 以当前参照数据重新判定入选网点
    /// 3. 指派完整性检查
    /// 4. 推导任务(每入选网点一条)与子任务(每台范围内设备一条)
    pub fn generate(
        draft: &TourneeDraft,
        agencies: &[Agency],
        equipments: &[Equipment],
        contracts: &[Contract],
        now: NaiveDateTime,
    ) -> Result<GeneratedTournee, GenerationError> {
        let mut violations = draft.validate_info();
        violations.extend(draft.validate_contracts());
        if !violations.is_empty() {
            return Err(GenerationError::InvalidDraft { violations });
        }

        let eligible = EligibilityEngine::resolve(
            &draft.selected_contract_ids,
            agencies,
            equipments,
            contracts,
        );
        if eligible.is_empty() {
            return Err(GenerationError::NoEligibleAgency);
        }
        debug!(
            tournee_id = %draft.tournee_id,
            eligible = eligible.len(),
            "资格判定完成"
        );

        let mut unassigned = draft.ledger.unassigned(&eligible);
        if !unassigned.is_empty() {
            unassigned.sort();
            return Err(GenerationError::UnassignedAgencies {
                agency_ids: unassigned,
            });
        }

        // 校验通过后 date_start/date_deadline 必然非空
        let (Some(date_start), Some(date_deadline)) = (draft.date_start, draft.date_deadline)
        else {
            return Err(GenerationError::InvalidDraft {
                violations: vec![ValidationViolation {
                    field: "date_start".to_string(),
                    message: "日期缺失".to_string(),
                }],
            });
        };

        let tournee = Tournee {
            tournee_id: draft.tournee_id.clone(),
            code: draft.code.trim().to_string(),
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            date_start,
            date_deadline,
            status: draft.initial_status,
            created_by: draft.created_by.clone(),
            created_at: now,
        };

        let selected: HashSet<&str> = draft
            .selected_contract_ids
            .iter()
            .map(|s| s.as_str())
            .collect();

        let mut missions = Vec::with_capacity(eligible.len());
        let mut sub_missions = Vec::new();
        for entry in &eligible {
            let agency_id = &entry.agency.agency_id;
            // unassigned 检查已保证条目存在且技师非空
            let Some(assignment) = draft.ledger.get(agency_id) else {
                return Err(GenerationError::UnassignedAgencies {
                    agency_ids: vec![agency_id.clone()],
                });
            };
            let Some(technician_id) = assignment.technician_id.clone() else {
                return Err(GenerationError::UnassignedAgencies {
                    agency_ids: vec![agency_id.clone()],
                });
            };

            let mission_id = Mission::derive_id(&draft.tournee_id, agency_id);
            for equipment in equipments {
                if equipment.agency_id == *agency_id
                    && selected.contains(equipment.contract_id.as_str())
                {
                    sub_missions.push(SubMission {
                        sub_mission_id: SubMission::derive_id(
                            &draft.tournee_id,
                            &equipment.equipment_id,
                        ),
                        mission_id: mission_id.clone(),
                        equipment_id: equipment.equipment_id.clone(),
                        type_code: equipment.type_code.clone(),
                        status: SubMissionStatus::Todo,
                        functionality: Functionality::Functional,
                    });
                }
            }

            missions.push(Mission {
                mission_id,
                tournee_id: draft.tournee_id.clone(),
                agency_id: agency_id.clone(),
                technician_id,
                visit_order: assignment.order,
                status: MissionStatus::Todo,
                started_at: None,
                completed_at: None,
            });
        }

        info!(
            tournee_id = %tournee.tournee_id,
            missions = missions.len(),
            sub_missions = sub_missions.len(),
            editing = draft.editing,
            "轮次批次生成完毕"
        );

        Ok(GeneratedTournee {
            tournee,
            missions,
            sub_missions,
        })
    }
}
