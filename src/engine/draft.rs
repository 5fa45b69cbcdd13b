// ==========================================
// 银行设备维保运维控制台 - 轮次草稿
// ==========================================
// 职责: 承载规划向导三步的全部中间状态, 提交前做逐步校验
// 说明: 草稿只活在向导会话内, 校验违规按字段聚合返回供前端标红
// ==========================================

use crate::domain::types::TourneeStatus;
use crate::engine::assignment::AssignmentLedger;
use crate::engine::eligibility::EligibleAgency;
use chrono::NaiveDate;
use serde::Serialize;

// ==========================================
// ValidationViolation - 单条校验违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationViolation {
    pub field: String,
    pub message: String,
}

impl ValidationViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// TourneeDraft - 向导草稿
// ==========================================
#[derive(Debug, Clone)]
pub struct TourneeDraft {
    /// 新建时预生成, 编辑时沿用原轮次ID
    pub tournee_id: String,
    /// true = 编辑既有轮次, 提交走替换式重生成
    pub editing: bool,
    pub code: String,
    pub name: String,
    pub description: String,
    pub date_start: Option<NaiveDate>,
    pub date_deadline: Option<NaiveDate>,
    /// 提交时写入的初始状态 (仅允许可编辑状态)
    pub initial_status: TourneeStatus,
    pub selected_contract_ids: Vec<String>,
    pub ledger: AssignmentLedger,
    pub created_by: String,
}

impl TourneeDraft {
    pub fn new(tournee_id: String, created_by: String) -> Self {
        Self {
            tournee_id,
            editing: false,
            code: String::new(),
            name: String::new(),
            description: String::new(),
            date_start: None,
            date_deadline: None,
            initial_status: TourneeStatus::Planned,
            selected_contract_ids: Vec::new(),
            ledger: AssignmentLedger::new(),
            created_by,
        }
    }

    /// 第一步录入: 基本信息整体写入
    pub fn set_info(
        &mut self,
        code: &str,
        name: &str,
        description: &str,
        date_start: Option<NaiveDate>,
        date_deadline: Option<NaiveDate>,
    ) {
        self.code = code.to_string();
        self.name = name.to_string();
        self.description = description.to_string();
        self.date_start = date_start;
        self.date_deadline = date_deadline;
    }

    /// 第二步交互: 勾选/取消一份合同
    pub fn toggle_contract(&mut self, contract_id: &str) {
        if let Some(pos) = self
            .selected_contract_ids
            .iter()
            .position(|id| id == contract_id)
        {
            self.selected_contract_ids.remove(pos);
        } else {
            self.selected_contract_ids.push(contract_id.to_string());
        }
    }

    /// 第一步: 基本信息校验
    pub fn validate_info(&self) -> Vec<ValidationViolation> {
        let mut violations = Vec::new();
        if self.code.trim().is_empty() {
            violations.push(ValidationViolation::new("code", "轮次编号不能为空"));
        }
        if self.name.trim().is_empty() {
            violations.push(ValidationViolation::new("name", "轮次名称不能为空"));
        }
        match (self.date_start, self.date_deadline) {
            (None, _) => {
                violations.push(ValidationViolation::new("date_start", "开始日期不能为空"));
            }
            (_, None) => {
                violations.push(ValidationViolation::new(
                    "date_deadline",
                    "截止日期不能为空",
                ));
            }
            (Some(start), Some(deadline)) if deadline < start => {
                violations.push(ValidationViolation::new(
                    "date_deadline",
                    "截止日期不能早于开始日期",
                ));
            }
            _ => {}
        }
        if !self.initial_status.is_editable() {
            violations.push(ValidationViolation::new(
                "initial_status",
                format!("初始状态不允许为 {}", self.initial_status),
            ));
        }
        violations
    }

    /// 第二步: 合同选择校验
    pub fn validate_contracts(&self) -> Vec<ValidationViolation> {
        if self.selected_contract_ids.is_empty() {
            vec![ValidationViolation::new(
                "selected_contract_ids",
                "至少选择一份合同",
            )]
        } else {
            Vec::new()
        }
    }

    /// 第三步: 指派完整性校验 (每个入选网点必须有技师)
    pub fn validate_assignments(&self, eligible: &[EligibleAgency]) -> Vec<ValidationViolation> {
        let missing = self.ledger.unassigned(eligible);
        missing
            .into_iter()
            .map(|agency_id| {
                ValidationViolation::new(
                    "assignments",
                    format!("网点 {} 尚未指派技师", agency_id),
                )
            })
            .collect()
    }

    /// 提交前的整体校验
    pub fn validate_all(&self, eligible: &[EligibleAgency]) -> Vec<ValidationViolation> {
        let mut violations = self.validate_info();
        violations.extend(self.validate_contracts());
        violations.extend(self.validate_assignments(eligible));
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> TourneeDraft {
        let mut draft = TourneeDraft::new("t-1".to_string(), "coordinator-1".to_string());
        draft.code = "TRN-2024-07".to_string();
        draft.name = "Tournée semestrielle".to_string();
        draft.date_start = NaiveDate::from_ymd_opt(2024, 7, 1);
        draft.date_deadline = NaiveDate::from_ymd_opt(2024, 7, 31);
        draft.selected_contract_ids = vec!["c-1".to_string()];
        draft
    }

    #[test]
    fn filled_draft_passes_info_validation() {
        assert!(filled_draft().validate_info().is_empty());
    }

    #[test]
    fn empty_code_and_name_are_reported() {
        let mut draft = filled_draft();
        draft.code = "  ".to_string();
        draft.name = String::new();
        let violations = draft.validate_info();
        let fields: Vec<&str> = violations
            .iter()
            .map(|v| v.field.as_str())
            .collect::<Vec<_>>()
            .into_iter()
            .collect();
        assert!(fields.contains(&"code"));
        assert!(fields.contains(&"name"));
    }

    #[test]
    fn deadline_before_start_is_rejected() {
        let mut draft = filled_draft();
        draft.date_deadline = NaiveDate::from_ymd_opt(2024, 6, 30);
        let violations = draft.validate_info();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "date_deadline");
    }

    #[test]
    fn non_editable_initial_status_is_rejected() {
        let mut draft = filled_draft();
        draft.initial_status = TourneeStatus::Triggered;
        assert!(draft
            .validate_info()
            .iter()
            .any(|v| v.field == "initial_status"));
    }

    #[test]
    fn toggle_contract_flips_selection() {
        let mut draft = filled_draft();
        draft.toggle_contract("c-2");
        assert_eq!(draft.selected_contract_ids, vec!["c-1", "c-2"]);
        draft.toggle_contract("c-1");
        assert_eq!(draft.selected_contract_ids, vec!["c-2"]);
    }

    #[test]
    fn empty_contract_selection_is_rejected() {
        let mut draft = filled_draft();
        draft.selected_contract_ids.clear();
        assert_eq!(draft.validate_contracts().len(), 1);
    }
}
