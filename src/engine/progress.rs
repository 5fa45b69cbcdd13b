// ==========================================
// 银行设备维保运维控制台 - 进度聚合器
// ==========================================
// 职责: 在任务/子任务快照上做三级筛选 + 多维汇总, 纯内存计算
// 筛选流水线: 轮次 → 银行(经网点归属) → 合同(经子任务设备反推)
// 红线: 合同筛选会收窄任务集, 子任务集随最终任务集重算
// ==========================================

use crate::domain::bank::Agency;
use crate::domain::equipment::Equipment;
use crate::domain::tournee::{Mission, SubMission};
use crate::domain::user::User;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// 维度汇总里无法解析归属时落入的桶
const UNKNOWN_BUCKET: &str = "Unknown";

// ==========================================
// ProgressFilter - 聚合筛选条件
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ProgressFilter {
    pub tournee_id: Option<String>,
    pub bank_id: Option<String>,
    pub contract_id: Option<String>,
}

// ==========================================
// BreakdownEntry - 单维度汇总行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub total: usize,
    pub done: usize,
}

impl BreakdownEntry {
    fn bump(&mut self, done: bool) {
        self.total += 1;
        if done {
            self.done += 1;
        }
    }
}

// ==========================================
// ProgressReport - 聚合报表
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub total_agencies: usize,
    pub agencies_done: usize,
    pub total_equipment: usize,
    pub equipment_done: usize,
    /// 整体进度 = 完工网点 / 入选网点, 四舍五入到整数百分比; 空集为 0
    pub progress_percent: u32,
    pub by_region: BTreeMap<String, BreakdownEntry>,
    pub by_technician: BTreeMap<String, BreakdownEntry>,
    /// 最终任务集, 按 (轮次, 拜访顺序) 排序
    pub missions: Vec<Mission>,
}

// ==========================================
// ProgressAggregator - 聚合器
// ==========================================
pub struct ProgressAggregator;

impl ProgressAggregator {
    pub fn aggregate(
        filter: &ProgressFilter,
        missions: &[Mission],
        sub_missions: &[SubMission],
        agencies: &[Agency],
        equipments: &[Equipment],
        technicians: &[User],
    ) -> ProgressReport {
        let agency_index: HashMap<&str, &Agency> = agencies
            .iter()
            .map(|a| (a.agency_id.as_str(), a))
            .collect();
        let equipment_index: HashMap<&str, &Equipment> = equipments
            .iter()
            .map(|e| (e.equipment_id.as_str(), e))
            .collect();
        let technician_index: HashMap<&str, &User> = technicians
            .iter()
            .map(|u| (u.user_id.as_str(), u))
            .collect();

        // 第一级: 轮次筛选
        let mut kept: Vec<&Mission> = missions
            .iter()
            .filter(|m| {
                filter
                    .tournee_id
                    .as_deref()
                    .map_or(true, |t| m.tournee_id == t)
            })
            .collect();

        // 第二级: 银行筛选 (任务本身不带银行, 经网点归属判断)
        if let Some(bank_id) = filter.bank_id.as_deref() {
            kept.retain(|m| {
                agency_index
                    .get(m.agency_id.as_str())
                    .map_or(false, |a| a.bank_id == bank_id)
            });
        }

        // 第三级: 合同筛选 (从子任务设备反推, 收窄任务集)
        if let Some(contract_id) = filter.contract_id.as_deref() {
            let kept_ids: HashSet<&str> = kept.iter().map(|m| m.mission_id.as_str()).collect();
            let matching_missions: HashSet<&str> = sub_missions
                .iter()
                .filter(|s| {
                    kept_ids.contains(s.mission_id.as_str())
                        && equipment_index
                            .get(s.equipment_id.as_str())
                            .map_or(false, |e| e.contract_id == contract_id)
                })
                .map(|s| s.mission_id.as_str())
                .collect();
            kept.retain(|m| matching_missions.contains(m.mission_id.as_str()));
        }

        // 子任务集随最终任务集重算
        let kept_ids: HashSet<&str> = kept.iter().map(|m| m.mission_id.as_str()).collect();
        let kept_subs: Vec<&SubMission> = sub_missions
            .iter()
            .filter(|s| kept_ids.contains(s.mission_id.as_str()))
            .collect();

        let total_agencies = kept.len();
        let agencies_done = kept.iter().filter(|m| m.is_done()).count();
        let total_equipment = kept_subs.len();
        let equipment_done = kept_subs.iter().filter(|s| s.is_validated()).count();
        let progress_percent = if total_agencies == 0 {
            0
        } else {
            ((agencies_done as f64 / total_agencies as f64) * 100.0).round() as u32
        };

        let mut by_region: BTreeMap<String, BreakdownEntry> = BTreeMap::new();
        let mut by_technician: BTreeMap<String, BreakdownEntry> = BTreeMap::new();
        for mission in &kept {
            let region = agency_index
                .get(mission.agency_id.as_str())
                .map(|a| a.region.clone())
                .unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
            by_region.entry(region).or_default().bump(mission.is_done());

            let technician = technician_index
                .get(mission.technician_id.as_str())
                .map(|u| u.full_name())
                .unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
            by_technician
                .entry(technician)
                .or_default()
                .bump(mission.is_done());
        }

        let mut ordered: Vec<Mission> = kept.into_iter().cloned().collect();
        ordered.sort_by(|a, b| {
            a.tournee_id
                .cmp(&b.tournee_id)
                .then(a.visit_order.cmp(&b.visit_order))
        });

        ProgressReport {
            total_agencies,
            agencies_done,
            total_equipment,
            equipment_done,
            progress_percent,
            by_region,
            by_technician,
            missions: ordered,
        }
    }
}
