// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、装配好的应用状态与小型数据构造器
// ==========================================

#![allow(dead_code)]

use bankmaint_ops::app::AppState;
use bankmaint_ops::config::AppConfig;
use bankmaint_ops::db;
use bankmaint_ops::domain::bank::{Agency, Bank};
use bankmaint_ops::domain::contract::Contract;
use bankmaint_ops::domain::equipment::Equipment;
use bankmaint_ops::domain::types::{ContractFrequency, UserRole};
use bankmaint_ops::domain::user::User;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非UTF-8")?
        .to_string();

    let conn = Connection::open(&db_path)?;
    db::configure_connection(&conn)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 装配好的内存库应用状态 (schema 已初始化, 无参照数据)
pub fn app_state() -> AppState {
    AppState::new(AppConfig::default()).expect("无法初始化测试 AppState")
}

/// 装配好的内存库应用状态 + 突尼斯参照数据
pub fn seeded_app_state() -> AppState {
    let state = app_state();
    bankmaint_ops::seed::load_referential(&state).expect("参照数据装载失败");
    state
}

// ===== 小型数据构造器 =====

pub fn bank(id: &str, name: &str) -> Bank {
    Bank {
        bank_id: id.to_string(),
        name: name.to_string(),
        head_office_address: "Tunis".to_string(),
        contact_email: format!("it@{}.tn", id),
        contact_phone: "71 000 000".to_string(),
    }
}

pub fn agency(id: &str, bank_id: &str, region: &str, city: &str) -> Agency {
    Agency {
        agency_id: id.to_string(),
        bank_id: bank_id.to_string(),
        code: format!("AG-{}", id),
        name: format!("Agence {}", id),
        address: format!("Centre ville, {}", city),
        region: region.to_string(),
        city: city.to_string(),
        manager_name: None,
        manager_phone: None,
    }
}

pub fn contract(id: &str, bank_id: &str) -> Contract {
    Contract {
        contract_id: id.to_string(),
        bank_id: bank_id.to_string(),
        contract_no: format!("CT-{}", id),
        date_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        date_end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        frequency: ContractFrequency::Quarterly,
        status: "actif".to_string(),
        penalty_per_day: 100.0,
        sla_conditions: "Maintenance préventive".to_string(),
    }
}

pub fn equipment(id: &str, agency_id: &str, bank_id: &str, contract_id: &str) -> Equipment {
    Equipment {
        equipment_id: id.to_string(),
        serial_no: format!("SN-{}", id),
        type_code: "ATM (GAB)".to_string(),
        brand_model: "NCR SelfServ 22".to_string(),
        agency_id: agency_id.to_string(),
        bank_id: bank_id.to_string(),
        contract_id: contract_id.to_string(),
        installed_on: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        last_intervention_on: None,
        status: "actif".to_string(),
    }
}

pub fn technician(id: &str, first: &str, last: &str) -> User {
    User {
        user_id: id.to_string(),
        last_name: last.to_string(),
        first_name: first.to_string(),
        roles: vec![UserRole::Technician],
        email: format!("{}@bankmaint.tn", id),
        phone: "98 000 000".to_string(),
        login: id.to_string(),
        regions: vec!["Grand Tunis".to_string()],
        active: true,
    }
}
