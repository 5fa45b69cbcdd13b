// ==========================================
// 轮次生成测试 (经规划API落库)
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use bankmaint_ops::domain::tournee::{Mission, SubMission};
use bankmaint_ops::domain::types::{MissionStatus, SubMissionStatus, TourneeStatus};
use chrono::NaiveDate;
use test_helpers::seeded_app_state;

fn prepared_draft(
    state: &bankmaint_ops::app::AppState,
    contract_ids: &[&str],
) -> bankmaint_ops::engine::draft::TourneeDraft {
    let mut draft = state.planning_api.start_draft("u1");
    draft.code = "T2026-TEST".to_string();
    draft.name = "Tournée de test".to_string();
    draft.date_start = NaiveDate::from_ymd_opt(2026, 9, 1);
    draft.date_deadline = NaiveDate::from_ymd_opt(2026, 12, 31);
    draft.selected_contract_ids = contract_ids.iter().map(|s| s.to_string()).collect();

    let eligible = state.planning_api.eligible_agencies(&draft).unwrap();
    draft.ledger.seed_from(&eligible);
    for entry in &eligible {
        draft.ledger.set_technician(&entry.agency.agency_id, "u2");
    }
    draft
}

#[test]
fn commit_persists_complete_batch() {
    let state = seeded_app_state();
    let draft = prepared_draft(&state, &["cont-b1-1"]);
    let eligible = state.planning_api.eligible_agencies(&draft).unwrap();
    let expected_equipment: usize = eligible.iter().map(|e| e.equipment_count).sum();

    let tournee = state.planning_api.commit(&draft).unwrap();
    assert_eq!(tournee.status, TourneeStatus::Planned);

    let missions = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    assert_eq!(missions.len(), eligible.len());

    // 拜访顺序为 1..N 连续
    let mut orders: Vec<i32> = missions.iter().map(|m| m.visit_order).collect();
    orders.sort_unstable();
    assert_eq!(orders, (1..=missions.len() as i32).collect::<Vec<_>>());

    // 每台范围内设备恰有一条子任务, 初始 a_faire / fonctionnel
    let mut sub_total = 0;
    for mission in &missions {
        let subs = state
            .execution_api
            .sub_missions_of(&mission.mission_id)
            .unwrap();
        assert!(subs.iter().all(|s| s.status == SubMissionStatus::Todo));
        sub_total += subs.len();
    }
    assert_eq!(sub_total, expected_equipment);

    // 确定性ID
    for mission in &missions {
        assert_eq!(
            mission.mission_id,
            Mission::derive_id(&tournee.tournee_id, &mission.agency_id)
        );
    }
}

#[test]
fn commit_rejects_unassigned_agencies() {
    let state = seeded_app_state();
    let mut draft = state.planning_api.start_draft("u1");
    draft.code = "T2026-MISS".to_string();
    draft.name = "Tournée incomplète".to_string();
    draft.date_start = NaiveDate::from_ymd_opt(2026, 9, 1);
    draft.date_deadline = NaiveDate::from_ymd_opt(2026, 12, 31);
    draft.selected_contract_ids = vec!["cont-b1-1".to_string()];
    let eligible = state.planning_api.eligible_agencies(&draft).unwrap();
    draft.ledger.seed_from(&eligible);
    // 只指派一部分网点
    draft
        .ledger
        .set_technician(&eligible[0].agency.agency_id, "u2");

    let err = state.planning_api.commit(&draft).unwrap_err();
    assert!(matches!(
        err,
        bankmaint_ops::api::ApiError::ValidationFailed { .. }
    ));
    // 未落任何数据
    assert!(state.planning_api.list_tournees().unwrap().is_empty());
}

#[test]
fn edit_recommit_replaces_batch_without_touching_others() {
    let state = seeded_app_state();

    // 两个独立轮次
    let first = state
        .planning_api
        .commit(&prepared_draft(&state, &["cont-b1-1"]))
        .unwrap();
    let mut second_draft = prepared_draft(&state, &["cont-b2-1"]);
    second_draft.code = "T2026-B2".to_string();
    let second = state.planning_api.commit(&second_draft).unwrap();

    let missions_before = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    let first_before: Vec<&bankmaint_ops::domain::tournee::Mission> = missions_before
        .iter()
        .filter(|m| m.tournee_id == first.tournee_id)
        .collect();

    // 编辑第二个轮次: 扩大合同范围后重提交
    let mut edit = state.planning_api.start_edit(&second.tournee_id).unwrap();
    assert!(edit.editing);
    assert_eq!(edit.selected_contract_ids, vec!["cont-b2-1".to_string()]);
    edit.selected_contract_ids =
        vec!["cont-b2-1".to_string(), "cont-b2-2".to_string()];
    let eligible = state.planning_api.eligible_agencies(&edit).unwrap();
    edit.ledger.seed_from(&eligible);
    for entry in &eligible {
        edit.ledger.set_technician(&entry.agency.agency_id, "u3");
    }
    state.planning_api.commit(&edit).unwrap();

    // 第一个轮次的任务原封不动
    let missions_after = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    let first_after: Vec<&bankmaint_ops::domain::tournee::Mission> = missions_after
        .iter()
        .filter(|m| m.tournee_id == first.tournee_id)
        .collect();
    assert_eq!(first_before.len(), first_after.len());

    // 第二个轮次的任务整批换给了 u3, 子任务覆盖两份合同
    let second_missions = state
        .execution_api
        .missions_for_technician("u3", &Default::default())
        .unwrap();
    assert!(!second_missions.is_empty());
    assert!(second_missions
        .iter()
        .all(|m| m.tournee_id == second.tournee_id));

    let mut sub_ids: Vec<String> = Vec::new();
    for mission in &second_missions {
        for sub in state
            .execution_api
            .sub_missions_of(&mission.mission_id)
            .unwrap()
        {
            assert_eq!(
                sub.sub_mission_id,
                SubMission::derive_id(&second.tournee_id, &sub.equipment_id)
            );
            sub_ids.push(sub.sub_mission_id);
        }
    }
    sub_ids.sort();
    sub_ids.dedup();
    // BNA 两份合同各 10 台设备
    assert_eq!(sub_ids.len(), 20);
}

#[test]
fn edit_preserves_manual_order_and_assignment() {
    let state = seeded_app_state();
    let mut draft = prepared_draft(&state, &["cont-b1-1"]);
    let eligible = state.planning_api.eligible_agencies(&draft).unwrap();
    assert!(eligible.len() >= 3);

    // 把第三个网点提到首位后提交
    let third = eligible[2].agency.agency_id.clone();
    draft.ledger.set_order(&third, 1);
    let tournee = state.planning_api.commit(&draft).unwrap();

    // 编辑入口恢复的台账保留该顺序
    let edit = state.planning_api.start_edit(&tournee.tournee_id).unwrap();
    assert_eq!(edit.ledger.get(&third).map(|e| e.order), Some(1));
    assert_eq!(
        edit.ledger.get(&third).and_then(|e| e.technician_id.clone()),
        Some("u2".to_string())
    );
}

#[test]
fn started_missions_keep_status_semantics_after_creation() {
    let state = seeded_app_state();
    let draft = prepared_draft(&state, &["cont-b1-1"]);
    state.planning_api.commit(&draft).unwrap();

    let missions = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    assert!(missions.iter().all(|m| m.status == MissionStatus::Todo
        && m.started_at.is_none()
        && m.completed_at.is_none()));
}
