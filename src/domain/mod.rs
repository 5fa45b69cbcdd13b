// ==========================================
// 银行设备维保运维控制台 - 领域层
// ==========================================
// 职责: 实体与类型定义, 不含数据访问与业务编排
// ==========================================

pub mod action_log;
pub mod bank;
pub mod contract;
pub mod equipment;
pub mod tournee;
pub mod types;
pub mod user;

// 重导出领域实体
pub use action_log::{ActionLog, ActionType};
pub use bank::{Agency, Bank};
pub use contract::Contract;
pub use equipment::Equipment;
pub use tournee::{Mission, SubMission, Tournee};
pub use user::User;
