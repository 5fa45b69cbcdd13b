// ==========================================
// 银行设备维保运维控制台 - 突尼斯参照数据种子
// ==========================================
// 职责: 演示/测试用的确定性参照数据 (4银行 / 40网点 / 8合同 / 80设备)
// 红线: 种子必须确定性生成, 同一版本两次装载得到完全相同的数据
// ==========================================

use crate::app::AppState;
use crate::domain::bank::{Agency, Bank};
use crate::domain::contract::Contract;
use crate::domain::equipment::Equipment;
use crate::domain::types::{ContractFrequency, UserRole};
use crate::domain::user::User;
use crate::repository::RepositoryResult;
use chrono::NaiveDate;
use tracing::info;

/// 城市参照表: (城市, 大区)
const VILLES_REF: &[(&str, &str)] = &[
    ("Tunis Médina", "Grand Tunis"),
    ("La Marsa", "Grand Tunis"),
    ("Ariana Ville", "Grand Tunis"),
    ("Raoued", "Grand Tunis"),
    ("Ben Arous Ville", "Grand Tunis"),
    ("Megrine", "Grand Tunis"),
    ("Manouba Ville", "Grand Tunis"),
    ("Nabeul Ville", "Nord-Est"),
    ("Hammamet", "Nord-Est"),
    ("Bizerte Ville", "Nord-Est"),
    ("Ras Jebel", "Nord-Est"),
    ("Sousse Ville", "Sahel"),
    ("Hammam Sousse", "Sahel"),
    ("Monastir Ville", "Sahel"),
    ("Sahline", "Sahel"),
    ("Mahdia Ville", "Sahel"),
    ("Chebba", "Sahel"),
    ("Sfax Ville", "Sud"),
    ("Sakiet Ezzit", "Sud"),
    ("Kairouan Ville", "Centre"),
    ("Sbikha", "Centre"),
    ("Gabès Ville", "Sud"),
    ("Metouia", "Sud"),
    ("Djerba Houmt Souk", "Sud"),
    ("Zarzis", "Sud"),
    ("Gafsa Ville", "Sud"),
    ("Metlaoui", "Sud"),
    ("Béja Ville", "Nord-Ouest"),
    ("Medjez El Bab", "Nord-Ouest"),
    ("Jendouba Ville", "Nord-Ouest"),
    ("Tabarka", "Nord-Ouest"),
    ("Le Kef Ville", "Nord-Ouest"),
    ("Siliana Ville", "Nord-Ouest"),
    ("Zaghouan Ville", "Nord-Est"),
    ("Kasserine Ville", "Centre"),
    ("Sidi Bouzid Ville", "Centre"),
    ("Tataouine Ville", "Sud"),
    ("Kebili Ville", "Sud"),
    ("Tozeur Ville", "Sud"),
    ("El Hamma", "Sud"),
];

/// 设备型号参照表: (型号, 类型)
const MODELS_REF: &[(&str, &str)] = &[
    ("NCR SelfServ 22", "ATM (GAB)"),
    ("DN Series 200", "ATM (GAB)"),
    ("GLORY GFS-220", "Compteuse de billets"),
    ("Hyosung Monimax 5600", "ATM (GAB)"),
    ("SARTRE Safe 500", "Coffre-fort intelligent"),
];

const AGENCIES_PER_BANK: usize = 10;
const EQUIPMENT_PER_BANK: usize = 20;

pub fn banks() -> Vec<Bank> {
    let rows: &[(&str, &str, &str, &str, &str)] = &[
        ("b1", "BIAT", "Tunis, Avenue Habib Bourguiba", "it.support@biat.com.tn", "71 131 000"),
        ("b2", "STB Bank", "Tunis, Rue Hedi Nouira", "maintenance@stb.com.tn", "71 340 101"),
        ("b3", "BNA Bank", "Tunis, Rue de la Monnaie", "infrastructure@bna.com.tn", "71 835 400"),
        ("b4", "BH Bank", "Tunis, Avenue Mohamed V", "tech@bh.com.tn", "71 126 000"),
    ];
    rows.iter()
        .map(|(id, name, address, email, phone)| Bank {
            bank_id: id.to_string(),
            name: name.to_string(),
            head_office_address: address.to_string(),
            contact_email: email.to_string(),
            contact_phone: phone.to_string(),
        })
        .collect()
}

pub fn agencies(banks: &[Bank]) -> Vec<Agency> {
    let mut out = Vec::with_capacity(banks.len() * AGENCIES_PER_BANK);
    for (bank_idx, bank) in banks.iter().enumerate() {
        for i in 0..AGENCIES_PER_BANK {
            let (city, region) = VILLES_REF[(bank_idx * AGENCIES_PER_BANK + i) % VILLES_REF.len()];
            let agency_id = format!("ag-{}-{}", bank.bank_id, i + 1);
            out.push(Agency {
                agency_id,
                bank_id: bank.bank_id.clone(),
                code: format!("AG{}{:03}", bank.bank_id.to_uppercase(), i + 1),
                name: format!("{} Agence {}", bank.name, city),
                address: format!("Boulevard de l'Indépendance, {}", city),
                region: region.to_string(),
                city: city.to_string(),
                manager_name: Some(format!("Responsable {}", city)),
                manager_phone: Some(format!("71 {:03} {:03}", 100 + bank_idx * 37, 100 + i * 53)),
            });
        }
    }
    out
}

pub fn contracts(banks: &[Bank]) -> Vec<Contract> {
    let mut out = Vec::with_capacity(banks.len() * 2);
    for bank in banks {
        out.push(Contract {
            contract_id: format!("cont-{}-1", bank.bank_id),
            bank_id: bank.bank_id.clone(),
            contract_no: format!("MAIN-2024-{}-ATM", bank.bank_id),
            date_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            date_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            frequency: ContractFrequency::Quarterly,
            status: "actif".to_string(),
            penalty_per_day: 150.0,
            sla_conditions: "Maintenance Préventive ATM".to_string(),
        });
        out.push(Contract {
            contract_id: format!("cont-{}-2", bank.bank_id),
            bank_id: bank.bank_id.clone(),
            contract_no: format!("MAIN-2024-{}-BACK", bank.bank_id),
            date_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            date_end: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default(),
            frequency: ContractFrequency::SemiAnnual,
            status: "actif".to_string(),
            penalty_per_day: 100.0,
            sla_conditions: "Maintenance Compteuses & Change".to_string(),
        });
    }
    out
}

pub fn equipments(banks: &[Bank], agencies: &[Agency], contracts: &[Contract]) -> Vec<Equipment> {
    let mut out = Vec::with_capacity(banks.len() * EQUIPMENT_PER_BANK);
    for bank in banks {
        let bank_agencies: Vec<&Agency> = agencies
            .iter()
            .filter(|a| a.bank_id == bank.bank_id)
            .collect();
        let bank_contracts: Vec<&Contract> = contracts
            .iter()
            .filter(|c| c.bank_id == bank.bank_id)
            .collect();
        if bank_agencies.is_empty() || bank_contracts.len() < 2 {
            continue;
        }

        for i in 1..=EQUIPMENT_PER_BANK {
            let agency = bank_agencies[(i - 1) % bank_agencies.len()];
            let (model, type_code) = MODELS_REF[i % MODELS_REF.len()];
            let contract = bank_contracts[if i % 2 == 0 { 0 } else { 1 }];
            let serial_no = format!("SN-{}-{:04}", bank.bank_id.to_uppercase(), i);
            out.push(Equipment {
                equipment_id: serial_no.clone(),
                serial_no,
                type_code: type_code.to_string(),
                brand_model: model.to_string(),
                agency_id: agency.agency_id.clone(),
                bank_id: bank.bank_id.clone(),
                contract_id: contract.contract_id.clone(),
                installed_on: NaiveDate::from_ymd_opt(2020 + (i % 4) as i32, 1, 1)
                    .unwrap_or_default(),
                last_intervention_on: NaiveDate::from_ymd_opt(2024, 3, 15),
                status: "actif".to_string(),
            });
        }
    }
    out
}

pub fn users() -> Vec<User> {
    vec![
        User {
            user_id: "u1".to_string(),
            last_name: "Bouzid".to_string(),
            first_name: "Karim".to_string(),
            roles: vec![UserRole::Admin, UserRole::Coordinator],
            email: "k.bouzid@bankmaint.tn".to_string(),
            phone: "98 111 222".to_string(),
            login: "kbouzid".to_string(),
            regions: vec![],
            active: true,
        },
        User {
            user_id: "u2".to_string(),
            last_name: "Ben Salah".to_string(),
            first_name: "Ali".to_string(),
            roles: vec![UserRole::Technician],
            email: "a.bensalah@bankmaint.tn".to_string(),
            phone: "98 333 444".to_string(),
            login: "abensalah".to_string(),
            regions: vec!["Grand Tunis".to_string(), "Nord-Est".to_string()],
            active: true,
        },
        User {
            user_id: "u3".to_string(),
            last_name: "Trabelsi".to_string(),
            first_name: "Sana".to_string(),
            roles: vec![UserRole::Technician],
            email: "s.trabelsi@bankmaint.tn".to_string(),
            phone: "98 555 666".to_string(),
            login: "strabelsi".to_string(),
            regions: vec!["Sahel".to_string(), "Centre".to_string()],
            active: true,
        },
        User {
            user_id: "u4".to_string(),
            last_name: "Gharbi".to_string(),
            first_name: "Mounir".to_string(),
            roles: vec![UserRole::Technician],
            email: "m.gharbi@bankmaint.tn".to_string(),
            phone: "98 777 888".to_string(),
            login: "mgharbi".to_string(),
            regions: vec!["Sud".to_string(), "Nord-Ouest".to_string()],
            active: true,
        },
        // 离职技师, 不应出现在可指派清单
        User {
            user_id: "u5".to_string(),
            last_name: "Mansour".to_string(),
            first_name: "Hedi".to_string(),
            roles: vec![UserRole::Technician],
            email: "h.mansour@bankmaint.tn".to_string(),
            phone: "98 999 000".to_string(),
            login: "hmansour".to_string(),
            regions: vec!["Grand Tunis".to_string()],
            active: false,
        },
    ]
}

/// 把全套参照数据装载进应用 (整集合替换, 可重复调用)
pub fn load_referential(state: &AppState) -> RepositoryResult<()> {
    let banks = banks();
    let agencies = agencies(&banks);
    let contracts = contracts(&banks);
    let equipments = equipments(&banks, &agencies, &contracts);
    let users = users();

    state.bank_repo.replace_all(&banks)?;
    state.agency_repo.replace_all(&agencies)?;
    state.contract_repo.replace_all(&contracts)?;
    state.equipment_repo.replace_all(&equipments)?;
    state.user_repo.replace_all(&users)?;

    info!(
        banks = banks.len(),
        agencies = agencies.len(),
        contracts = contracts.len(),
        equipments = equipments.len(),
        users = users.len(),
        "突尼斯参照数据装载完成"
    );
    Ok(())
}
