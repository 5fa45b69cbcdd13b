// ==========================================
// 银行设备维保运维控制台 - 资格判定引擎
// ==========================================
// 职责: 由所选合同集推导可纳入轮次的网点集合
// 规则: 网点入选须同时满足
//   (a) 网点所属银行 ∈ 所选合同的银行集
//   (b) 网点存在至少一台挂靠所选合同的设备
//   仅银行匹配不充分 -- 避免把无可服务设备的网点排进轮次
// 红线: 纯函数, 无状态, 无 I/O
// ==========================================

use crate::domain::bank::Agency;
use crate::domain::contract::Contract;
use crate::domain::equipment::Equipment;
use std::collections::{BTreeMap, HashMap, HashSet};

// ==========================================
// EligibleAgency - 入选网点
// ==========================================
/// 资格判定输出: 一个入选网点与其默认拜访顺序
#[derive(Debug, Clone)]
pub struct EligibleAgency {
    pub agency: Agency,
    /// 默认拜访顺序 (大区/城市字母序播种, 1..N)
    pub order: i32,
    /// 所选合同范围内该网点的设备台数
    pub equipment_count: usize,
}

// ==========================================
// EligibilityEngine - 资格判定引擎
// ==========================================
pub struct EligibilityEngine;

impl EligibilityEngine {
    /// 推导入选网点列表
    ///
    /// # 参数
    /// - selected_contract_ids: 向导中勾选的合同集
    /// - agencies / equipments / contracts: 参照数据全量快照
    ///
    /// # 返回
    /// 入选网点, 按 (大区, 城市, 名称) 字母序排列, order 为 1..N 连续整数
    ///
    /// # 说明
    /// 提交时必须重新调用本函数 (不复用向导早期的选择结果),
    /// 以防参照数据在向导过程中发生变化
    pub fn resolve(
        selected_contract_ids: &[String],
        agencies: &[Agency],
        equipments: &[Equipment],
        contracts: &[Contract],
    ) -> Vec<EligibleAgency> {
        let selected: HashSet<&str> = selected_contract_ids.iter().map(|s| s.as_str()).collect();
        if selected.is_empty() {
            return Vec::new();
        }

        // 所选合同覆盖的银行集
        let selected_banks: HashSet<&str> = contracts
            .iter()
            .filter(|c| selected.contains(c.contract_id.as_str()))
            .map(|c| c.bank_id.as_str())
            .collect();

        // 网点 → 所选合同范围内的设备台数
        let mut equipment_per_agency: HashMap<&str, usize> = HashMap::new();
        for eq in equipments {
            if selected.contains(eq.contract_id.as_str()) {
                *equipment_per_agency.entry(eq.agency_id.as_str()).or_insert(0) += 1;
            }
        }

        let mut qualified: Vec<(&Agency, usize)> = agencies
            .iter()
            .filter(|a| selected_banks.contains(a.bank_id.as_str()))
            .filter_map(|a| {
                equipment_per_agency
                    .get(a.agency_id.as_str())
                    .map(|&count| (a, count))
            })
            .collect();

        // 默认顺序: 大区 → 城市 → 名称 → ID (尾键保证确定性)
        qualified.sort_by(|(a, _), (b, _)| {
            a.region
                .cmp(&b.region)
                .then_with(|| a.city.cmp(&b.city))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.agency_id.cmp(&b.agency_id))
        });

        qualified
            .into_iter()
            .enumerate()
            .map(|(idx, (agency, equipment_count))| EligibleAgency {
                agency: agency.clone(),
                order: (idx + 1) as i32,
                equipment_count,
            })
            .collect()
    }

    /// 按大区分组 (展示用), 分组键字母序排列保证渲染确定性
    pub fn group_by_region<'a>(
        eligible: &'a [EligibleAgency],
    ) -> BTreeMap<String, Vec<&'a EligibleAgency>> {
        let mut groups: BTreeMap<String, Vec<&EligibleAgency>> = BTreeMap::new();
        for entry in eligible {
            groups
                .entry(entry.agency.region.clone())
                .or_default()
                .push(entry);
        }
        groups
    }
}
