// ==========================================
// 银行设备维保运维控制台 - 应用装配层
// ==========================================

pub mod state;

pub use state::AppState;
