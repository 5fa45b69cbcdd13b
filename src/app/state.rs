// ==========================================
// 银行设备维保运维控制台 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接与API实例
// 组装顺序: 连接 → 仓储 → 生命周期API(兼任事件订阅者) → 其余API
// ==========================================

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::api::{DashboardApi, ExecutionApi, LifecycleApi, PlanningApi};
use crate::config::{AppConfig, IN_MEMORY_DB};
use crate::db;
use crate::engine::insight::{DisabledInsightGenerator, InsightGenerator};
use crate::repository::{
    ActionLogRepository, AgencyRepository, BankRepository, ContractRepository,
    EquipmentRepository, MissionRepository, RepositoryError, RepositoryResult,
    SubMissionRepository, TourneeRepository, UserRepository,
};

/// 应用状态
///
/// 持有全部API实例; 各实例共享同一把数据库连接
pub struct AppState {
    pub config: AppConfig,

    /// 规划向导API (协调员侧)
    pub planning_api: Arc<PlanningApi>,

    /// 生命周期API (状态机 + 自动完工订阅)
    pub lifecycle_api: Arc<LifecycleApi>,

    /// 现场执行API (技师侧)
    pub execution_api: Arc<ExecutionApi>,

    /// 进度看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 参照数据仓储 (种子/导入入口)
    pub bank_repo: Arc<BankRepository>,
    pub agency_repo: Arc<AgencyRepository>,
    pub contract_repo: Arc<ContractRepository>,
    pub equipment_repo: Arc<EquipmentRepository>,
    pub user_repo: Arc<UserRepository>,
}

impl AppState {
    /// 按配置组装应用状态
    ///
    /// 会初始化数据库 Schema (幂等), 随后逐层装配仓储与API
    pub fn new(config: AppConfig) -> RepositoryResult<Self> {
        info!(db_path = %config.db_path, "初始化 AppState");

        let conn = if config.db_path == IN_MEMORY_DB {
            db::open_in_memory()
        } else {
            db::open_connection(&config.db_path)
        }
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        db::init_schema(&conn)
            .map_err(|e| RepositoryError::DatabaseQueryError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        // 仓储层
        let tournee_repo = TourneeRepository::from_connection(Arc::clone(&conn));
        let mission_repo = MissionRepository::from_connection(Arc::clone(&conn));
        let sub_mission_repo = SubMissionRepository::from_connection(Arc::clone(&conn));
        let bank_repo = Arc::new(BankRepository::from_connection(Arc::clone(&conn)));
        let agency_repo = Arc::new(AgencyRepository::from_connection(Arc::clone(&conn)));
        let contract_repo = Arc::new(ContractRepository::from_connection(Arc::clone(&conn)));
        let equipment_repo = Arc::new(EquipmentRepository::from_connection(Arc::clone(&conn)));
        let user_repo = Arc::new(UserRepository::from_connection(Arc::clone(&conn)));
        let action_log_repo = ActionLogRepository::from_connection(Arc::clone(&conn));

        // 生命周期API先行创建, 作为执行层的事件订阅者
        let lifecycle_api = Arc::new(LifecycleApi::new(
            TourneeRepository::from_connection(Arc::clone(&conn)),
            MissionRepository::from_connection(Arc::clone(&conn)),
            ActionLogRepository::from_connection(Arc::clone(&conn)),
        ));

        let execution_api = Arc::new(ExecutionApi::new(
            TourneeRepository::from_connection(Arc::clone(&conn)),
            MissionRepository::from_connection(Arc::clone(&conn)),
            SubMissionRepository::from_connection(Arc::clone(&conn)),
            AgencyRepository::from_connection(Arc::clone(&conn)),
            ActionLogRepository::from_connection(Arc::clone(&conn)),
            Arc::clone(&lifecycle_api) as Arc<dyn crate::engine::events::MissionEventPublisher>,
        ));

        let planning_api = Arc::new(PlanningApi::new(
            tournee_repo,
            mission_repo,
            sub_mission_repo,
            AgencyRepository::from_connection(Arc::clone(&conn)),
            EquipmentRepository::from_connection(Arc::clone(&conn)),
            ContractRepository::from_connection(Arc::clone(&conn)),
            UserRepository::from_connection(Arc::clone(&conn)),
            action_log_repo,
        ));

        // 外部分析服务尚未接线, 统一走回退文案
        let insight_generator: Arc<dyn InsightGenerator> = Arc::new(DisabledInsightGenerator);

        let dashboard_api = Arc::new(DashboardApi::new(
            MissionRepository::from_connection(Arc::clone(&conn)),
            SubMissionRepository::from_connection(Arc::clone(&conn)),
            AgencyRepository::from_connection(Arc::clone(&conn)),
            EquipmentRepository::from_connection(Arc::clone(&conn)),
            UserRepository::from_connection(Arc::clone(&conn)),
            ActionLogRepository::from_connection(Arc::clone(&conn)),
            insight_generator,
        ));

        info!("AppState 初始化完成");
        Ok(Self {
            config,
            planning_api,
            lifecycle_api,
            execution_api,
            dashboard_api,
            bank_repo,
            agency_repo,
            contract_repo,
            equipment_repo,
            user_repo,
        })
    }

    /// 内存库快捷入口 (演示与测试)
    pub fn in_memory() -> RepositoryResult<Self> {
        Self::new(AppConfig::default())
    }
}
