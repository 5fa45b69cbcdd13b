// ==========================================
// 银行设备维保运维控制台 - 引擎层
// ==========================================
// 纯内存业务算法: 资格判定 / 指派台账 / 轮次生成 / 进度聚合 / 生命周期 / 洞察
// 引擎层不触库, 数据由 API 层从仓储取出后喂入
// ==========================================

pub mod assignment;
pub mod draft;
pub mod eligibility;
pub mod events;
pub mod generator;
pub mod insight;
pub mod lifecycle;
pub mod progress;

pub use assignment::{AssignmentEntry, AssignmentLedger};
pub use draft::{TourneeDraft, ValidationViolation};
pub use eligibility::{EligibilityEngine, EligibleAgency};
pub use events::{MissionEvent, MissionEventPublisher, MissionEventType, NoOpEventPublisher};
pub use generator::{GeneratedTournee, GenerationError, TourneeGenerator};
pub use insight::{
    generate_or_fallback, DisabledInsightGenerator, InsightGenerator, ProgressSnapshot,
    INSIGHT_FALLBACK,
};
pub use lifecycle::LifecycleController;
pub use progress::{BreakdownEntry, ProgressAggregator, ProgressFilter, ProgressReport};
