use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::store::Record;

string_enum! {
    pub enum CampaignStatus {
        Active => "active",
        Paused => "paused",
        Completed => "completed",
    }
}

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Active
    }
}

string_enum! {
    /// Outcome of calling one externally sourced contact
    pub enum CampaignLeadStatus {
        Pending => "pending",
        Called => "called",
        Interested => "interested",
        NotInterested => "notInterested",
        Converted => "converted",
    }
}

impl Default for CampaignLeadStatus {
    fn default() -> Self {
        CampaignLeadStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CampaignLead {
    pub id: String,
    pub name: String,
    pub contact_no: String,
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub status: CampaignLeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Set once the contact has been converted into a pipeline lead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
}

/// A batch of externally sourced contacts assigned to a manager
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub assigned_to: String,
    #[serde(default)]
    pub leads: Vec<CampaignLead>,
    #[serde(default)]
    pub status: CampaignStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Campaign {
    const COLLECTION: &'static str = "campaigns";
    const KIND: &'static str = "Campaign";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub counts: BTreeMap<CampaignLeadStatus, usize>,
}

impl From<Campaign> for CampaignView {
    fn from(campaign: Campaign) -> Self {
        let mut counts = BTreeMap::new();
        for lead in &campaign.leads {
            *counts.entry(lead.status).or_insert(0) += 1;
        }
        Self { campaign, counts }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CampaignLeadInput {
    pub name: String,
    pub contact_no: String,
    #[serde(default)]
    pub requirement: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaign {
    pub name: String,
    pub assigned_to: String,
    #[serde(default)]
    pub leads: Vec<CampaignLeadInput>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImportLeads {
    pub leads: Vec<CampaignLeadInput>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub added: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignLead {
    pub status: Option<CampaignLeadStatus>,
    pub remark: Option<String>,
}
