// ==========================================
// 进度看板测试 (聚合 / 筛选 / 洞察回退)
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use bankmaint_ops::app::AppState;
use bankmaint_ops::engine::insight::INSIGHT_FALLBACK;
use bankmaint_ops::engine::progress::ProgressFilter;
use chrono::NaiveDate;
use test_helpers::seeded_app_state;

fn commit_tournee(state: &AppState, code: &str, contract_id: &str, technician: &str) -> String {
    let mut draft = state.planning_api.start_draft("u1");
    draft.code = code.to_string();
    draft.name = format!("Tournée {}", code);
    draft.date_start = NaiveDate::from_ymd_opt(2026, 9, 1);
    draft.date_deadline = NaiveDate::from_ymd_opt(2026, 12, 31);
    draft.selected_contract_ids = vec![contract_id.to_string()];

    let eligible = state.planning_api.eligible_agencies(&draft).unwrap();
    draft.ledger.seed_from(&eligible);
    for entry in &eligible {
        draft
            .ledger
            .set_technician(&entry.agency.agency_id, technician);
    }
    state.planning_api.commit(&draft).unwrap().tournee_id
}

#[test]
fn tournee_filter_isolates_single_tournee() {
    let state = seeded_app_state();
    let t1 = commit_tournee(&state, "T1", "cont-b1-1", "u2");
    let _t2 = commit_tournee(&state, "T2", "cont-b2-1", "u3");

    let all = state
        .dashboard_api
        .progress(&ProgressFilter::default())
        .unwrap();
    let only_t1 = state
        .dashboard_api
        .progress(&ProgressFilter {
            tournee_id: Some(t1.clone()),
            ..Default::default()
        })
        .unwrap();

    assert!(all.total_agencies > only_t1.total_agencies);
    assert!(only_t1.missions.iter().all(|m| m.tournee_id == t1));
    // 未开工: 0%
    assert_eq!(only_t1.progress_percent, 0);
    assert_eq!(only_t1.agencies_done, 0);
}

#[test]
fn bank_filter_keeps_only_that_banks_agencies() {
    let state = seeded_app_state();
    commit_tournee(&state, "T1", "cont-b1-1", "u2");
    commit_tournee(&state, "T2", "cont-b2-1", "u3");

    let report = state
        .dashboard_api
        .progress(&ProgressFilter {
            bank_id: Some("b2".to_string()),
            ..Default::default()
        })
        .unwrap();

    assert!(!report.missions.is_empty());
    let agencies = state.agency_repo.list_by_bank("b2").unwrap();
    for mission in &report.missions {
        assert!(agencies.iter().any(|a| a.agency_id == mission.agency_id));
    }
}

#[test]
fn contract_filter_narrows_via_equipment() {
    let state = seeded_app_state();
    let t1 = commit_tournee(&state, "T1", "cont-b1-1", "u2");

    // 无关合同: 任务集清空
    let empty = state
        .dashboard_api
        .progress(&ProgressFilter {
            tournee_id: Some(t1.clone()),
            contract_id: Some("cont-b2-1".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(empty.total_agencies, 0);
    assert_eq!(empty.progress_percent, 0);

    // 本合同: 与不加合同筛选相同
    let matching = state
        .dashboard_api
        .progress(&ProgressFilter {
            tournee_id: Some(t1.clone()),
            contract_id: Some("cont-b1-1".to_string()),
            ..Default::default()
        })
        .unwrap();
    let unfiltered = state
        .dashboard_api
        .progress(&ProgressFilter {
            tournee_id: Some(t1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(matching.total_agencies, unfiltered.total_agencies);
}

#[test]
fn percent_reaches_100_when_all_done() {
    let state = seeded_app_state();
    let t1 = commit_tournee(&state, "T1", "cont-b1-1", "u2");
    state.lifecycle_api.trigger(&t1, "u1").unwrap();

    let missions = state
        .execution_api
        .missions_for_technician("u2", &Default::default())
        .unwrap();
    for mission in &missions {
        state
            .execution_api
            .complete_mission(&mission.mission_id, "u2")
            .unwrap();
    }

    let report = state
        .dashboard_api
        .progress(&ProgressFilter {
            tournee_id: Some(t1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(report.progress_percent, 100);
    assert_eq!(report.agencies_done, report.total_agencies);
    for entry in report.by_region.values() {
        assert_eq!(entry.done, entry.total);
    }
}

#[test]
fn technician_breakdown_uses_full_names() {
    let state = seeded_app_state();
    let t1 = commit_tournee(&state, "T1", "cont-b1-1", "u2");

    let report = state
        .dashboard_api
        .progress(&ProgressFilter {
            tournee_id: Some(t1),
            ..Default::default()
        })
        .unwrap();
    // u2 = Ali Ben Salah (种子数据)
    assert!(report.by_technician.contains_key("Ali Ben Salah"));
}

#[tokio::test]
async fn insight_falls_back_when_service_disabled() {
    let state = seeded_app_state();
    commit_tournee(&state, "T1", "cont-b1-1", "u2");

    let text = state
        .dashboard_api
        .insight(&ProgressFilter::default())
        .await
        .unwrap();
    assert_eq!(text, INSIGHT_FALLBACK);
}

#[test]
fn recent_actions_respects_limit_and_order() {
    let state = seeded_app_state();
    let t1 = commit_tournee(&state, "T1", "cont-b1-1", "u2");
    state.lifecycle_api.trigger(&t1, "u1").unwrap();
    state.lifecycle_api.pause(&t1, "u1").unwrap();

    let logs = state.dashboard_api.recent_actions(2).unwrap();
    assert_eq!(logs.len(), 2);
    // 倒序: 最近的在前
    assert!(logs[0].timestamp >= logs[1].timestamp);
    assert_eq!(logs[0].action, "TOURNEE_PAUSED");
}
