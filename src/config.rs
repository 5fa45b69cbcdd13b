// ==========================================
// 银行设备维保运维控制台 - 应用配置
// ==========================================
// 职责: 启动参数集中管理, 环境变量覆写
// 约定: 默认内存库 (演示/测试); 生产部署经 BANKMAINT_DB_PATH 指定文件库
// ==========================================

use std::env;

/// 内存数据库标记值 (rusqlite 语义)
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据库路径; ":memory:" 表示内存库
    pub db_path: String,
    /// 是否启用外部洞察服务 (关闭时恒回退固定文案)
    pub insight_enabled: bool,
    /// 操作留痕回看默认条数
    pub action_log_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: IN_MEMORY_DB.to_string(),
            insight_enabled: false,
            action_log_limit: 50,
        }
    }
}

impl AppConfig {
    /// 从环境变量加载, 缺省回落默认值
    ///
    /// # 环境变量
    /// - BANKMAINT_DB_PATH: 数据库文件路径
    /// - BANKMAINT_INSIGHT_ENABLED: "1"/"true" 启用洞察服务
    /// - BANKMAINT_ACTION_LOG_LIMIT: 留痕回看条数
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("BANKMAINT_DB_PATH").unwrap_or(defaults.db_path),
            insight_enabled: env::var("BANKMAINT_INSIGHT_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.insight_enabled),
            action_log_limit: env::var("BANKMAINT_ACTION_LOG_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.action_log_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_in_memory_db() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, IN_MEMORY_DB);
        assert!(!config.insight_enabled);
        assert_eq!(config.action_log_limit, 50);
    }
}
