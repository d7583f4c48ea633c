use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{new_id, now};
use crate::store::Record;

string_enum! {
    pub enum NotificationKind {
        TaskAssigned => "taskAssigned",
        TaskComment => "taskComment",
        TaskStatus => "taskStatus",
        LeadAssigned => "leadAssigned",
        CampaignAssigned => "campaignAssigned",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: &str, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            kind,
            message: message.into(),
            read: false,
            task_id: None,
            lead_id: None,
            campaign_id: None,
            created_at: now(),
        }
    }

    pub fn for_task(mut self, task_id: &str) -> Self {
        self.task_id = Some(task_id.to_string());
        self
    }

    pub fn for_lead(mut self, lead_id: &str) -> Self {
        self.lead_id = Some(lead_id.to_string());
        self
    }

    pub fn for_campaign(mut self, campaign_id: &str) -> Self {
        self.campaign_id = Some(campaign_id.to_string());
        self
    }
}

impl Record for Notification {
    const COLLECTION: &'static str = "notifications";
    const KIND: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: usize,
}
