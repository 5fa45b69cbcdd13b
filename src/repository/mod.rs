// ==========================================
// 银行设备维保运维控制台 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================
// 存储契约 (核心三操作):
// - replace_all          整集合替换
// - insert / insert_batch 追加
// - replace_for_tournee  按轮次过滤后替换 (编辑再生成用)
// ==========================================

pub mod action_log_repo;
pub mod bank_repo;
pub mod contract_repo;
pub mod equipment_repo;
pub mod error;
pub mod tournee_repo;
pub mod user_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use bank_repo::{AgencyRepository, BankRepository};
pub use contract_repo::ContractRepository;
pub use equipment_repo::EquipmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use tournee_repo::{MissionRepository, SubMissionRepository, TourneeRepository};
pub use user_repo::UserRepository;

use chrono::NaiveDateTime;

/// 日期时间统一存储格式
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 格式化日期时间为存储字符串
pub(crate) fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// 解析存储字符串为日期时间 (兼容 'T' 分隔的旧值)
pub(crate) fn parse_datetime(s: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| RepositoryError::FieldValueError {
            field: "datetime".to_string(),
            message: format!("无法解析日期时间 '{}': {}", s, e),
        })
}
