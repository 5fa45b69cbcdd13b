// ==========================================
// 银行设备维保运维控制台 - 维保合同领域模型
// ==========================================

use crate::domain::types::ContractFrequency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Contract - 维保合同
// ==========================================
// 作用: 限定某次巡检轮次可服务的设备范围
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: String,          // 合同ID
    pub bank_id: String,              // 所属银行
    pub contract_no: String,          // 合同编号
    pub date_start: NaiveDate,        // 生效日期
    pub date_end: NaiveDate,          // 截止日期
    pub frequency: ContractFrequency, // 维保频率
    pub status: String,               // 合同状态 (Actif/Expire 等, 外部维护)
    pub penalty_per_day: f64,         // 逾期日罚金
    pub sla_conditions: String,       // SLA 描述
}

impl Contract {
    /// 判断合同在给定日期是否在有效期内
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.date_start <= date && date <= self.date_end
    }
}
