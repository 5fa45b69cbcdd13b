// ==========================================
// 银行设备维保运维控制台 - API层
// ==========================================
// 面向前端的用例入口: 规划向导 / 生命周期 / 现场执行 / 进度看板
// 分层: API 编排仓储与引擎, 业务算法一律下沉引擎层
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod execution_api;
pub mod lifecycle_api;
pub mod planning_api;

pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use execution_api::{ExecutionApi, MissionListFilter};
pub use lifecycle_api::LifecycleApi;
pub use planning_api::PlanningApi;
