use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::TimelineEntry;
use crate::format::DatePreset;
use crate::store::Record;

string_enum! {
    /// Sales pipeline stage of a lead
    pub enum LeadStatus {
        New => "new",
        Contacted => "contacted",
        FollowUp => "followUp",
        SiteVisit => "siteVisit",
        Negotiation => "negotiation",
        Converted => "converted",
        Lost => "lost",
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

impl LeadStatus {
    /// Converted and lost leads need no further follow-up
    pub fn is_closed(self) -> bool {
        matches!(self, LeadStatus::Converted | LeadStatus::Lost)
    }
}

/// A prospective customer tracked through the sales pipeline
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub contact_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub remarks: Vec<TimelineEntry>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Lead {
    const COLLECTION: &'static str = "leads";
    const KIND: &'static str = "Lead";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateLead {
    pub name: String,
    pub contact_no: String,
    pub email: Option<String>,
    #[serde(default)]
    pub requirement: String,
    pub status: Option<LeadStatus>,
    pub referred_by: Option<String>,
    pub lead_source: Option<String>,
    pub project_id: Option<String>,
    pub assigned_to: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    /// Optional first remark
    pub remark: Option<String>,
}

/// Partial update; absent fields are left unchanged and empty strings
/// clear optional fields.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLead {
    pub name: Option<String>,
    pub contact_no: Option<String>,
    pub email: Option<String>,
    pub requirement: Option<String>,
    pub status: Option<LeadStatus>,
    pub referred_by: Option<String>,
    pub lead_source: Option<String>,
    pub project_id: Option<String>,
    pub assigned_to: Option<String>,
    /// `null` clears the date
    #[serde(default, deserialize_with = "super::nullable")]
    #[ts(optional)]
    pub follow_up_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SetLeadStatus {
    pub status: LeadStatus,
}

/// Query parameters of the lead table
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilter {
    /// Case-insensitive text over name, contact, requirement, referrer and source
    pub q: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub project_id: Option<String>,
    pub assigned_to: Option<String>,
    pub range: Option<DatePreset>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
