// ==========================================
// 银行设备维保运维控制台 - 指派台账引擎
// ==========================================
// 职责: 向导期间维护 网点 → {技师, 拜访顺序} 的临时映射
// 不变量: 任一次顺序编辑/拖拽后, 全部顺序值恰为 {1..N}, 无重复无空洞
// 算法: 稳定重插入 -- 取出目标网点, 插到 min(k-1, len), 再整体重编号
// 说明: 台账只存在于向导期间, 提交时被消费生成任务, 之后即丢弃
// ==========================================

use crate::engine::eligibility::EligibleAgency;
use std::collections::HashMap;

// ==========================================
// AssignmentEntry - 单网点指派
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentEntry {
    /// 指派技师; None 表示尚未指派 (提交前必须全部非 None)
    pub technician_id: Option<String>,
    /// 拜访顺序 (≥1, 轮次内唯一)
    pub order: i32,
}

// ==========================================
// AssignmentLedger - 指派台账
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AssignmentLedger {
    entries: HashMap<String, AssignmentEntry>,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以资格判定结果播种台账
    ///
    /// # 规则
    /// - 已有条目保留技师与顺序 (编辑场景下用户的手工调整不被覆盖)
    /// - 新入选网点按判定器的默认顺序插入
    /// - 不再入选的网点条目被移除
    /// - 最后整体重编号, 保证 {1..N}
    pub fn seed_from(&mut self, eligible: &[EligibleAgency]) {
        let mut next: HashMap<String, AssignmentEntry> = HashMap::new();
        for entry in eligible {
            let agency_id = entry.agency.agency_id.clone();
            match self.entries.get(&agency_id) {
                Some(existing) => {
                    next.insert(agency_id, existing.clone());
                }
                None => {
                    next.insert(
                        agency_id,
                        AssignmentEntry {
                            technician_id: None,
                            // 新条目排在原有条目之后, 同批内保持判定器顺序
                            order: i32::MAX - (eligible.len() as i32) + entry.order,
                        },
                    );
                }
            }
        }
        self.entries = next;
        self.renumber();
    }

    /// 从既有任务恢复台账 (编辑向导入口)
    pub fn seed_from_missions(&mut self, missions: &[crate::domain::tournee::Mission]) {
        self.entries.clear();
        for mission in missions {
            self.entries.insert(
                mission.agency_id.clone(),
                AssignmentEntry {
                    technician_id: Some(mission.technician_id.clone()),
                    order: mission.visit_order,
                },
            );
        }
        self.renumber();
    }

    /// 按大区批量指派技师, 各网点顺序保持不变
    pub fn assign_region(&mut self, region: &str, technician_id: &str, eligible: &[EligibleAgency]) {
        for entry in eligible {
            if entry.agency.region == region {
                if let Some(assignment) = self.entries.get_mut(&entry.agency.agency_id) {
                    assignment.technician_id = Some(technician_id.to_string());
                }
            }
        }
    }

    /// 指派单个网点的技师, 顺序不变
    pub fn set_technician(&mut self, agency_id: &str, technician_id: &str) {
        if let Some(assignment) = self.entries.get_mut(agency_id) {
            assignment.technician_id = Some(technician_id.to_string());
        }
    }

    /// 顺序编辑: 把 agency 移到请求位置 k
    ///
    /// # 规则
    /// - k < 1: 静默拒绝 (no-op)
    /// - k > N: 钳制到末位 (宽容式交互, 不报错)
    /// - 其余: 稳定重插入到 k-1 位, 然后整体重编号为 1..N
    pub fn set_order(&mut self, agency_id: &str, requested: i32) {
        if requested < 1 || !self.entries.contains_key(agency_id) {
            return;
        }

        let mut ordered = self.ordered_agency_ids();
        ordered.retain(|id| id != agency_id);
        let position = ((requested - 1) as usize).min(ordered.len());
        ordered.insert(position, agency_id.to_string());

        for (idx, id) in ordered.iter().enumerate() {
            if let Some(assignment) = self.entries.get_mut(id) {
                assignment.order = (idx + 1) as i32;
            }
        }
    }

    /// 拖拽重排: 等价于把被拖网点的顺序设为落点网点的当前顺序
    pub fn move_before(&mut self, dragged_agency_id: &str, target_agency_id: &str) {
        let Some(target_order) = self.entries.get(target_agency_id).map(|e| e.order) else {
            return;
        };
        self.set_order(dragged_agency_id, target_order);
    }

    /// 尚未指派技师的入选网点 (提交阻断检查)
    pub fn unassigned(&self, eligible: &[EligibleAgency]) -> Vec<String> {
        eligible
            .iter()
            .filter(|entry| {
                self.entries
                    .get(&entry.agency.agency_id)
                    .map_or(true, |a| a.technician_id.is_none())
            })
            .map(|entry| entry.agency.agency_id.clone())
            .collect()
    }

    /// 按顺序返回网点ID列表
    pub fn ordered_agency_ids(&self) -> Vec<String> {
        let mut ids: Vec<(&String, i32)> = self
            .entries
            .iter()
            .map(|(id, assignment)| (id, assignment.order))
            .collect();
        // 尾键 agency_id 仅为确定性兜底; 正常状态下 order 无重复
        ids.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        ids.into_iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn get(&self, agency_id: &str) -> Option<&AssignmentEntry> {
        self.entries.get(agency_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 整体重编号为 1..N (保持当前相对顺序)
    fn renumber(&mut self) {
        let ordered = self.ordered_agency_ids();
        for (idx, id) in ordered.iter().enumerate() {
            if let Some(assignment) = self.entries.get_mut(id) {
                assignment.order = (idx + 1) as i32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bank::Agency;

    fn eligible(id: &str, region: &str, order: i32) -> EligibleAgency {
        EligibleAgency {
            agency: Agency {
                agency_id: id.to_string(),
                bank_id: "b1".to_string(),
                code: format!("AG-{}", id),
                name: format!("Agence {}", id),
                address: String::new(),
                region: region.to_string(),
                city: "Tunis".to_string(),
                manager_name: None,
                manager_phone: None,
            },
            order,
            equipment_count: 1,
        }
    }

    fn seeded(n: usize) -> (AssignmentLedger, Vec<EligibleAgency>) {
        let list: Vec<EligibleAgency> = (1..=n)
            .map(|i| eligible(&format!("a{}", i), "Grand Tunis", i as i32))
            .collect();
        let mut ledger = AssignmentLedger::new();
        ledger.seed_from(&list);
        (ledger, list)
    }

    fn orders(ledger: &AssignmentLedger) -> Vec<(String, i32)> {
        ledger
            .ordered_agency_ids()
            .iter()
            .map(|id| (id.clone(), ledger.get(id).unwrap().order))
            .collect()
    }

    #[test]
    fn seed_assigns_contiguous_orders() {
        let (ledger, _) = seeded(4);
        let got = orders(&ledger);
        assert_eq!(
            got.iter().map(|(_, o)| *o).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn reorder_to_front_shifts_others() {
        // [a1=1, a2=2, a3=3], a3 → 1 后应为 a3=1, a1=2, a2=3
        let (mut ledger, _) = seeded(3);
        ledger.set_order("a3", 1);
        assert_eq!(ledger.get("a3").unwrap().order, 1);
        assert_eq!(ledger.get("a1").unwrap().order, 2);
        assert_eq!(ledger.get("a2").unwrap().order, 3);
    }

    #[test]
    fn out_of_range_high_clamps_to_tail() {
        let (mut ledger, _) = seeded(3);
        ledger.set_order("a1", 99);
        assert_eq!(ledger.get("a1").unwrap().order, 3);
        assert_eq!(ledger.get("a2").unwrap().order, 1);
        assert_eq!(ledger.get("a3").unwrap().order, 2);
    }

    #[test]
    fn order_below_one_is_silent_noop() {
        let (mut ledger, _) = seeded(3);
        let before = orders(&ledger);
        ledger.set_order("a2", 0);
        ledger.set_order("a2", -5);
        assert_eq!(orders(&ledger), before);
    }

    #[test]
    fn orders_stay_contiguous_after_edit_sequence() {
        let (mut ledger, _) = seeded(6);
        for (agency, k) in [("a5", 1), ("a1", 6), ("a3", 3), ("a6", 2), ("a2", 100)] {
            ledger.set_order(agency, k);
            let mut got: Vec<i32> = orders(&ledger).iter().map(|(_, o)| *o).collect();
            got.sort_unstable();
            assert_eq!(got, (1..=6).collect::<Vec<_>>());
        }
    }

    #[test]
    fn drag_reorder_matches_order_edit_on_target() {
        let (mut ledger, _) = seeded(4);
        ledger.move_before("a4", "a2");
        assert_eq!(ledger.get("a4").unwrap().order, 2);
        assert_eq!(ledger.get("a2").unwrap().order, 3);
        assert_eq!(ledger.get("a3").unwrap().order, 4);
    }

    #[test]
    fn region_bulk_assignment_preserves_orders() {
        let south = vec![
            eligible("s1", "Sud", 1),
            eligible("s2", "Sud", 2),
        ];
        let mut all = south.clone();
        all.push(eligible("n1", "Nord-Est", 3));
        let mut ledger = AssignmentLedger::new();
        ledger.seed_from(&all);
        ledger.set_order("s2", 1);

        ledger.assign_region("Sud", "tech-1", &all);
        assert_eq!(
            ledger.get("s1").unwrap().technician_id.as_deref(),
            Some("tech-1")
        );
        assert_eq!(
            ledger.get("s2").unwrap().technician_id.as_deref(),
            Some("tech-1")
        );
        assert_eq!(ledger.get("n1").unwrap().technician_id, None);
        // 顺序不被批量指派扰动
        assert_eq!(ledger.get("s2").unwrap().order, 1);
        assert_eq!(ledger.get("s1").unwrap().order, 2);
    }

    #[test]
    fn reseed_keeps_manual_choices_and_drops_ineligible() {
        let (mut ledger, list) = seeded(3);
        ledger.set_technician("a2", "tech-9");
        ledger.set_order("a3", 1);

        // a1 失去资格, 新增 a4
        let mut next: Vec<EligibleAgency> = list
            .into_iter()
            .filter(|e| e.agency.agency_id != "a1")
            .collect();
        next.push(eligible("a4", "Grand Tunis", 3));
        ledger.seed_from(&next);

        assert!(ledger.get("a1").is_none());
        assert_eq!(
            ledger.get("a2").unwrap().technician_id.as_deref(),
            Some("tech-9")
        );
        // a3 仍在 a2 之前, a4 排在末位
        assert_eq!(ledger.get("a3").unwrap().order, 1);
        assert_eq!(ledger.get("a2").unwrap().order, 2);
        assert_eq!(ledger.get("a4").unwrap().order, 3);
    }

    #[test]
    fn unassigned_reports_missing_technicians() {
        let (mut ledger, list) = seeded(3);
        ledger.set_technician("a1", "tech-1");
        let mut missing = ledger.unassigned(&list);
        missing.sort();
        assert_eq!(missing, vec!["a2".to_string(), "a3".to_string()]);
    }
}
