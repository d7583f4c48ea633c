use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use super::{AccountSummary, LeadStatus, Task, TaskStatus};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total: usize,
    pub rented: usize,
    pub vacant: usize,
    /// Sum of monthly rent over rented units
    pub monthly_rent_roll: f64,
    pub monthly_rent_roll_formatted: String,
}

/// Landing page numbers for the signed-in user
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub leads_by_status: BTreeMap<LeadStatus, usize>,
    pub total_leads: usize,
    pub follow_ups_due: usize,
    pub tasks_by_status: BTreeMap<TaskStatus, usize>,
    pub my_open_tasks: Vec<Task>,
    pub inventory: InventoryStats,
    pub unread_notifications: usize,
    /// Current month, admins only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_this_month: Option<AccountSummary>,
}
