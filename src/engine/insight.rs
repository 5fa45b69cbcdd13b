// ==========================================
// 银行设备维保运维控制台 - 运维洞察生成
// ==========================================
// 职责: 把进度报表压缩为快照喂给外部分析服务, 失败时回退固定文案
// 红线: 洞察是装饰性能力, 生成失败绝不拖垮进度查询本身
// ==========================================

use crate::engine::progress::ProgressReport;
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

/// 分析服务不可用时返回给前端的固定回退文案
pub const INSIGHT_FALLBACK: &str = "L'analyse AI est temporairement indisponible.";

// ==========================================
// ProgressSnapshot - 喂给分析服务的压缩快照
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub total_agencies: usize,
    pub agencies_done: usize,
    pub total_equipment: usize,
    pub equipment_done: usize,
    pub progress_percent: u32,
    /// (大区, 完工数, 总数)
    pub regions: Vec<(String, usize, usize)>,
    /// (技师, 完工数, 总数)
    pub technicians: Vec<(String, usize, usize)>,
}

impl ProgressSnapshot {
    pub fn from_report(report: &ProgressReport) -> Self {
        Self {
            total_agencies: report.total_agencies,
            agencies_done: report.agencies_done,
            total_equipment: report.total_equipment,
            equipment_done: report.equipment_done,
            progress_percent: report.progress_percent,
            regions: report
                .by_region
                .iter()
                .map(|(region, entry)| (region.clone(), entry.done, entry.total))
                .collect(),
            technicians: report
                .by_technician
                .iter()
                .map(|(tech, entry)| (tech.clone(), entry.done, entry.total))
                .collect(),
        }
    }
}

/// 外部分析服务接入口; 实现方自行处理鉴权/网络
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, snapshot: &ProgressSnapshot) -> anyhow::Result<String>;
}

/// 调用分析服务, 任何失败一律回退固定文案
pub async fn generate_or_fallback(
    generator: &dyn InsightGenerator,
    report: &ProgressReport,
) -> String {
    let snapshot = ProgressSnapshot::from_report(report);
    match generator.generate(&snapshot).await {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "洞察生成失败, 使用回退文案");
            INSIGHT_FALLBACK.to_string()
        }
    }
}

/// 关闭洞察能力时使用: 恒定返回回退文案
pub struct DisabledInsightGenerator;

#[async_trait]
impl InsightGenerator for DisabledInsightGenerator {
    async fn generate(&self, _snapshot: &ProgressSnapshot) -> anyhow::Result<String> {
        anyhow::bail!("洞察能力未启用")
    }
}
