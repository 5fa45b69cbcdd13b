// ==========================================
// 银行设备维保运维控制台 - 设备领域模型
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Equipment - 银行设备(ATM/点钞机/智能保险柜)
// ==========================================
// 归属链: equipment → agency → bank; contract 决定可服务性
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_id: String,                      // 设备ID(序列号)
    pub serial_no: String,                         // 出厂序列号
    pub type_code: String,                         // 设备类型 (如 "ATM (GAB)")
    pub brand_model: String,                       // 品牌型号
    pub agency_id: String,                         // 所在网点
    pub bank_id: String,                           // 所属银行
    pub contract_id: String,                       // 挂靠合同
    pub installed_on: NaiveDate,                   // 安装日期
    pub last_intervention_on: Option<NaiveDate>,   // 最近一次维保日期
    pub status: String,                            // 设备台账状态 (Actif 等, 外部维护)
}
