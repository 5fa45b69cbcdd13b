// ==========================================
// 银行设备维保运维控制台 - 用户领域模型
// ==========================================
// 技师即带 TECHNICIEN 角色的用户
// ==========================================

use crate::domain::types::UserRole;
use serde::{Deserialize, Serialize};

// ==========================================
// User - 系统用户
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,         // 用户ID
    pub last_name: String,       // 姓
    pub first_name: String,      // 名
    pub roles: Vec<UserRole>,    // 角色列表
    pub email: String,           // 邮箱
    pub phone: String,           // 电话
    pub login: String,           // 登录名
    pub regions: Vec<String>,    // 负责大区(技师)
    pub active: bool,            // 是否在职
}

impl User {
    /// 展示名: "名 姓" (标签协作方约定)
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 判断是否为技师
    pub fn is_technician(&self) -> bool {
        self.roles.contains(&UserRole::Technician)
    }
}
