// ==========================================
// 全链路场景测试: 向导 → 触发 → 现场执行 → 自动完工 → 关账
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use bankmaint_ops::domain::types::{
    Functionality, MissionStatus, SubMissionStatus, TourneeStatus,
};
use bankmaint_ops::engine::progress::ProgressFilter;
use chrono::NaiveDate;
use test_helpers::seeded_app_state;

#[test]
fn full_business_flow() {
    let state = seeded_app_state();

    // ==========================================
    // 第一步: 规划向导
    // ==========================================
    let mut draft = state.planning_api.start_draft("u1");
    draft.code = "T2026-E2E".to_string();
    draft.name = "Maintenance Trimestrielle".to_string();
    draft.description = "Parc ATM BIAT".to_string();
    draft.date_start = NaiveDate::from_ymd_opt(2026, 9, 1);
    draft.date_deadline = NaiveDate::from_ymd_opt(2026, 11, 30);
    draft.selected_contract_ids = vec!["cont-b1-1".to_string()];

    let eligible = state.planning_api.eligible_agencies(&draft).unwrap();
    assert!(!eligible.is_empty());
    draft.ledger.seed_from(&eligible);

    // 按大区批量指派 + 单点覆写
    for region in eligible
        .iter()
        .map(|e| e.agency.region.clone())
        .collect::<std::collections::BTreeSet<_>>()
    {
        draft.ledger.assign_region(&region, "u2", &eligible);
    }
    let first_agency = eligible[0].agency.agency_id.clone();
    draft.ledger.set_technician(&first_agency, "u3");
    // 把首网点挪到末位
    draft
        .ledger
        .set_order(&first_agency, eligible.len() as i32);

    let tournee = state.planning_api.commit(&draft).unwrap();
    assert_eq!(tournee.status, TourneeStatus::Planned);

    // ==========================================
    // 第二步: 触发
    // ==========================================
    state
        .lifecycle_api
        .trigger(&tournee.tournee_id, "u1")
        .unwrap();

    // ==========================================
    // 第三步: 现场执行 (u3 负责被覆写的首网点)
    // ==========================================
    let u3_missions = state
        .execution_api
        .missions_for_technician("u3", &Default::default())
        .unwrap();
    assert_eq!(u3_missions.len(), 1);
    assert_eq!(u3_missions[0].agency_id, first_agency);
    assert_eq!(u3_missions[0].visit_order, eligible.len() as i32);

    let mission = state
        .execution_api
        .start_mission(&u3_missions[0].mission_id, "u3")
        .unwrap();
    assert_eq!(mission.status, MissionStatus::InProgress);
    assert!(mission.started_at.is_some());

    // 子任务逐台验证, 其中一台标记故障
    let subs = state
        .execution_api
        .sub_missions_of(&mission.mission_id)
        .unwrap();
    assert!(!subs.is_empty());
    for (idx, sub) in subs.iter().enumerate() {
        let functionality = if idx == 0 {
            Functionality::NonFunctional
        } else {
            Functionality::Functional
        };
        let updated = state
            .execution_api
            .update_sub_mission(
                &sub.sub_mission_id,
                SubMissionStatus::Validated,
                functionality,
                "u3",
            )
            .unwrap();
        assert_eq!(updated.status, SubMissionStatus::Validated);
    }

    let done = state
        .execution_api
        .complete_mission(&mission.mission_id, "u3")
        .unwrap();
    assert!(done.is_done());
    assert!(done.completed_at.is_some());

    // u2 完成其余网点
    let u2_missions = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    assert_eq!(u2_missions.len(), eligible.len() - 1);
    for mission in &u2_missions {
        state
            .execution_api
            .complete_mission(&mission.mission_id, "u2")
            .unwrap();
    }

    // ==========================================
    // 第四步: 自动完工与报表
    // ==========================================
    let final_tournee = state
        .planning_api
        .get_tournee(&tournee.tournee_id)
        .unwrap();
    assert_eq!(final_tournee.status, TourneeStatus::Completed);

    let report = state
        .dashboard_api
        .progress(&ProgressFilter {
            tournee_id: Some(tournee.tournee_id.clone()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(report.progress_percent, 100);
    assert_eq!(report.total_agencies, eligible.len());
    // 首网点的子任务全部验证
    assert!(report.equipment_done >= subs.len());

    // ==========================================
    // 第五步: 关账
    // ==========================================
    state
        .lifecycle_api
        .close(&tournee.tournee_id, "u1")
        .unwrap();
    assert_eq!(
        state
            .planning_api
            .get_tournee(&tournee.tournee_id)
            .unwrap()
            .status,
        TourneeStatus::Closed
    );

    // 留痕覆盖创建/触发/完工/自动完工/关账
    let actions: Vec<String> = state
        .dashboard_api
        .recent_actions(100)
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();
    for expected in [
        "TOURNEE_CREATED",
        "TOURNEE_TRIGGERED",
        "MISSION_STARTED",
        "MISSION_COMPLETED",
        "SUB_MISSION_UPDATED",
        "TOURNEE_AUTO_COMPLETED",
        "TOURNEE_CLOSED",
    ] {
        assert!(
            actions.iter().any(|a| a == expected),
            "缺少留痕: {}",
            expected
        );
    }
}

#[test]
fn technician_list_filters_by_geography_and_completion() {
    let state = seeded_app_state();

    let mut draft = state.planning_api.start_draft("u1");
    draft.code = "T2026-FILTER".to_string();
    draft.name = "Tournée filtres".to_string();
    draft.date_start = NaiveDate::from_ymd_opt(2026, 9, 1);
    draft.date_deadline = NaiveDate::from_ymd_opt(2026, 12, 31);
    draft.selected_contract_ids = vec!["cont-b1-1".to_string()];
    let eligible = state.planning_api.eligible_agencies(&draft).unwrap();
    draft.ledger.seed_from(&eligible);
    for entry in &eligible {
        draft.ledger.set_technician(&entry.agency.agency_id, "u2");
    }
    let tournee = state.planning_api.commit(&draft).unwrap();
    state
        .lifecycle_api
        .trigger(&tournee.tournee_id, "u1")
        .unwrap();

    // 大区筛选只留该大区网点
    let some_region = eligible[0].agency.region.clone();
    let in_region = state
        .execution_api
        .missions_for_technician(
            "u2",
            &bankmaint_ops::api::MissionListFilter {
                region: Some(some_region.clone()),
                ..Default::default()
            },
        )
        .unwrap();
    let expected = eligible
        .iter()
        .filter(|e| e.agency.region == some_region)
        .count();
    assert_eq!(in_region.len(), expected);

    // 完工任务默认隐藏, include_finished 显示
    let all = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    state
        .execution_api
        .complete_mission(&all[0].mission_id, "u2")
        .unwrap();

    let hidden = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    assert_eq!(hidden.len(), all.len() - 1);

    let shown = state
        .execution_api
        .missions_for_technician(
            "u2",
            &bankmaint_ops::api::MissionListFilter {
                include_finished: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(shown.len(), all.len());
}
