// ==========================================
// 银行设备维保运维控制台 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 银行设备巡检排程与进度决策支持 (协调员最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 启动参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// 参照数据种子
pub mod seed;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ContractFrequency, Functionality, MissionStatus, SubMissionStatus, TourneeStatus, UserRole,
};

// 领域实体
pub use domain::{
    ActionLog, ActionType, Agency, Bank, Contract, Equipment, Mission, SubMission, Tournee, User,
};

// API
pub use api::{ApiError, ApiResult, DashboardApi, ExecutionApi, LifecycleApi, PlanningApi};

// 应用状态
pub use app::AppState;

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
