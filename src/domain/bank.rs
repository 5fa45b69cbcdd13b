// ==========================================
// 银行设备维保运维控制台 - 银行与网点领域模型
// ==========================================
// 红线: 参照数据由外部维护, 核心流程只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Bank - 银行(机构客户)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub bank_id: String,             // 银行ID
    pub name: String,                // 银行名称
    pub head_office_address: String, // 总部地址
    pub contact_email: String,       // 负责人邮箱
    pub contact_phone: String,       // 负责人电话
}

// ==========================================
// Agency - 网点(分行/分支机构)
// ==========================================
// 地理归属: region / city 用于排程默认排序与分组展示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    pub agency_id: String,             // 网点ID
    pub bank_id: String,               // 所属银行
    pub code: String,                  // 网点编号
    pub name: String,                  // 网点名称
    pub address: String,               // 地址
    pub region: String,                // 大区
    pub city: String,                  // 城市
    pub manager_name: Option<String>,  // 网点负责人
    pub manager_phone: Option<String>, // 负责人电话
}
