// ==========================================
// 银行设备维保运维控制台 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 巡检排程与进度决策支持
// ==========================================
// 演示流程: 装载参照数据 → 规划向导提交 → 触发轮次 →
//           现场执行至自动完工 → 进度报表与洞察输出
// ==========================================

use bankmaint_ops::app::AppState;
use bankmaint_ops::config::AppConfig;
use bankmaint_ops::domain::types::{Functionality, SubMissionStatus};
use bankmaint_ops::engine::progress::ProgressFilter;
use bankmaint_ops::{logging, seed};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("银行设备维保运维控制台");
    tracing::info!("系统版本: {}", bankmaint_ops::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env();
    tracing::info!("使用数据库: {}", config.db_path);

    let state = AppState::new(config)?;
    seed::load_referential(&state)?;

    // ==========================================
    // 规划向导: 三步走 + 提交
    // ==========================================
    let planning = &state.planning_api;
    let mut draft = planning.start_draft("u1");
    draft.code = "T2026-S2".to_string();
    draft.name = "Maintenance Semestrielle S2".to_string();
    draft.description = "Visite préventive du parc ATM BIAT".to_string();
    draft.date_start = NaiveDate::from_ymd_opt(2026, 9, 1);
    draft.date_deadline = NaiveDate::from_ymd_opt(2026, 12, 31);
    draft.selected_contract_ids = vec!["cont-b1-1".to_string()];

    let eligible = planning.eligible_agencies(&draft)?;
    tracing::info!("入选网点: {}", eligible.len());
    draft.ledger.seed_from(&eligible);
    for entry in &eligible {
        draft.ledger.set_technician(&entry.agency.agency_id, "u2");
    }

    let tournee = planning.commit(&draft)?;
    tracing::info!("轮次已创建: {} ({})", tournee.code, tournee.tournee_id);

    // ==========================================
    // 生命周期 + 现场执行
    // ==========================================
    state.lifecycle_api.trigger(&tournee.tournee_id, "u1")?;

    let missions = state
        .execution_api
        .missions_for_technician("u2", &Default::default())?;
    tracing::info!("技师任务清单: {} 项", missions.len());

    for mission in &missions {
        state.execution_api.start_mission(&mission.mission_id, "u2")?;
        for sub in state.execution_api.sub_missions_of(&mission.mission_id)? {
            state.execution_api.update_sub_mission(
                &sub.sub_mission_id,
                SubMissionStatus::Validated,
                Functionality::Functional,
                "u2",
            )?;
        }
        state
            .execution_api
            .complete_mission(&mission.mission_id, "u2")?;
    }

    // ==========================================
    // 进度看板
    // ==========================================
    let filter = ProgressFilter {
        tournee_id: Some(tournee.tournee_id.clone()),
        ..Default::default()
    };
    let report = state.dashboard_api.progress(&filter)?;
    tracing::info!(
        "进度: {}% ({}/{} 网点, {}/{} 设备)",
        report.progress_percent,
        report.agencies_done,
        report.total_agencies,
        report.equipment_done,
        report.total_equipment
    );

    let insight = state.dashboard_api.insight(&filter).await?;
    tracing::info!("洞察: {}", insight);

    let final_state = state.planning_api.get_tournee(&tournee.tournee_id)?;
    tracing::info!("轮次最终状态: {}", final_state.status);

    for log in state.dashboard_api.recent_actions(10)? {
        tracing::info!("[{}] {} - {}", log.timestamp, log.action, log.details);
    }

    Ok(())
}
