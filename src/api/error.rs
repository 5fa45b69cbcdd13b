// ==========================================
// 银行设备维保运维控制台 - API层错误
// ==========================================
// 分层约定: RepositoryError / GenerationError 在此统一收敛为 ApiError,
// 前端只见到本层错误与其文案
// ==========================================

use crate::engine::draft::ValidationViolation;
use crate::engine::generator::GenerationError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("校验未通过")]
    ValidationFailed { violations: Vec<ValidationViolation> },

    #[error("所选合同范围内不存在任何入选网点")]
    NoEligibleAgency,

    #[error("非法状态迁移: {from} → {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("{entity} 不存在: {id}")]
    NotFound { entity: String, id: String },

    #[error("入参非法: {0}")]
    InvalidInput(String),

    #[error("业务规则冲突: {0}")]
    BusinessRuleViolation(String),

    #[error("存储层错误: {0}")]
    Storage(#[from] RepositoryError),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidDraft { violations } => {
                ApiError::ValidationFailed { violations }
            }
            GenerationError::NoEligibleAgency => ApiError::NoEligibleAgency,
            GenerationError::UnassignedAgencies { agency_ids } => ApiError::ValidationFailed {
                violations: agency_ids
                    .into_iter()
                    .map(|agency_id| ValidationViolation {
                        field: "assignments".to_string(),
                        message: format!("网点 {} 尚未指派技师", agency_id),
                    })
                    .collect(),
            },
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
