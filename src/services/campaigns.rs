//! Calling campaigns over externally sourced contacts
//!
//! Admins create campaigns and assign them to a manager. The assigned
//! manager works through the rows and may convert interested contacts into
//! pipeline leads.

use std::collections::HashSet;

use super::access::require_admin;
use super::{leads, validate, Notifier};
use crate::error::{AppError, AppResult};
use crate::format::normalize_phone;
use crate::models::campaign::{
    CampaignLeadInput, CampaignView, CreateCampaign, ImportLeads, ImportResult, UpdateCampaign,
    UpdateCampaignLead,
};
use crate::models::{
    clean, new_id, now, Campaign, CampaignLead, CampaignLeadStatus, Lead, LeadStatus, Notification,
    NotificationKind, TimelineEntry, User,
};
use crate::store::Store;

fn can_see(actor: &User, campaign: &Campaign) -> bool {
    actor.is_admin() || campaign.assigned_to == actor.id
}

fn ensure_visible(actor: &User, campaign: &Campaign) -> AppResult<()> {
    if can_see(actor, campaign) {
        Ok(())
    } else {
        Err(AppError::forbidden("Campaign is not assigned to you"))
    }
}

/// Append `rows` to `existing`, skipping contacts whose normalized number is
/// already present (including duplicates within `rows`). Returns
/// `(added, skipped)`.
pub fn merge_rows(existing: &mut Vec<CampaignLead>, rows: Vec<CampaignLeadInput>) -> AppResult<(usize, usize)> {
    let mut known: HashSet<String> = existing
        .iter()
        .map(|l| normalize_phone(&l.contact_no))
        .collect();
    let mut prepared = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for row in rows {
        let name = validate::required("Name", &row.name)?;
        let contact_no = validate::phone(&row.contact_no)?;
        if !known.insert(normalize_phone(&contact_no)) {
            skipped += 1;
            continue;
        }
        prepared.push(CampaignLead {
            id: new_id(),
            name,
            contact_no,
            requirement: row.requirement.trim().to_string(),
            status: CampaignLeadStatus::Pending,
            remark: None,
            lead_id: None,
        });
    }

    let added = prepared.len();
    existing.extend(prepared);
    Ok((added, skipped))
}

async fn notify_assigned(notifier: &Notifier, store: &Store, actor: &User, campaign: &Campaign) {
    if campaign.assigned_to != actor.id {
        let message = format!(
            "{} assigned you the campaign {} ({} contacts)",
            actor.name,
            campaign.name,
            campaign.leads.len()
        );
        notifier
            .notify(
                store,
                Notification::new(&campaign.assigned_to, NotificationKind::CampaignAssigned, message)
                    .for_campaign(&campaign.id),
            )
            .await;
    }
}

async fn require_assignee(store: &Store, id: &str) -> AppResult<String> {
    validate::user_ref(store, Some(id.to_string()))
        .await?
        .ok_or_else(|| AppError::invalid_params("Campaign must be assigned to a user"))
}

pub async fn create_campaign(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    req: CreateCampaign,
) -> AppResult<CampaignView> {
    require_admin(actor)?;
    let name = validate::required("Campaign name", &req.name)?;
    let assigned_to = require_assignee(store, &req.assigned_to).await?;

    let mut rows = Vec::new();
    let (added, skipped) = merge_rows(&mut rows, req.leads)?;

    let at = now();
    let campaign = store
        .campaigns
        .insert(Campaign {
            id: new_id(),
            name,
            assigned_to,
            leads: rows,
            status: Default::default(),
            created_by: actor.id.clone(),
            created_at: at,
            updated_at: at,
        })
        .await?;

    tracing::info!(campaign = %campaign.id, added, skipped, "Campaign created");
    notify_assigned(notifier, store, actor, &campaign).await;
    Ok(campaign.into())
}

/// Admins see every campaign, managers the ones assigned to them. Newest first.
pub async fn list_campaigns(store: &Store, actor: &User) -> AppResult<Vec<CampaignView>> {
    let mut campaigns: Vec<Campaign> = store
        .campaigns
        .list()
        .await?
        .into_iter()
        .filter(|c| can_see(actor, c))
        .collect();
    campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(campaigns.into_iter().map(CampaignView::from).collect())
}

pub async fn get_campaign(store: &Store, actor: &User, id: &str) -> AppResult<CampaignView> {
    let campaign = store.campaigns.require(id).await?;
    ensure_visible(actor, &campaign)?;
    Ok(campaign.into())
}

/// Admins may rename or reassign; the assigned manager may only change the
/// status
pub async fn update_campaign(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    id: &str,
    req: UpdateCampaign,
) -> AppResult<CampaignView> {
    if !actor.is_admin() && (req.name.is_some() || req.assigned_to.is_some()) {
        return Err(AppError::forbidden("Only admins can rename or reassign a campaign"));
    }
    let name = req.name.as_deref().map(|n| validate::required("Campaign name", n)).transpose()?;
    let assigned_to = match req.assigned_to.as_deref() {
        Some(user) => Some(require_assignee(store, user).await?),
        None => None,
    };

    let mut reassigned = false;
    let campaign = store
        .campaigns
        .update(id, |campaign, _| {
            ensure_visible(actor, campaign)?;
            if let Some(name) = name {
                campaign.name = name;
            }
            if let Some(assigned_to) = assigned_to {
                reassigned = assigned_to != campaign.assigned_to;
                campaign.assigned_to = assigned_to;
            }
            if let Some(status) = req.status {
                campaign.status = status;
            }
            campaign.updated_at = now();
            Ok(())
        })
        .await?;

    if reassigned {
        notify_assigned(notifier, store, actor, &campaign).await;
    }
    Ok(campaign.into())
}

pub async fn delete_campaign(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    require_admin(actor)?;
    store.campaigns.remove(id).await?;
    tracing::info!(campaign = %id, "Campaign deleted");
    Ok(())
}

pub async fn import_leads(
    store: &Store,
    actor: &User,
    id: &str,
    req: ImportLeads,
) -> AppResult<ImportResult> {
    let mut counts = (0, 0);
    store
        .campaigns
        .update(id, |campaign, _| {
            ensure_visible(actor, campaign)?;
            counts = merge_rows(&mut campaign.leads, req.leads)?;
            campaign.updated_at = now();
            Ok(())
        })
        .await?;

    let (added, skipped) = counts;
    tracing::info!(campaign = %id, added, skipped, "Campaign contacts imported");
    Ok(ImportResult { added, skipped })
}

pub async fn update_campaign_lead(
    store: &Store,
    actor: &User,
    id: &str,
    row_id: &str,
    req: UpdateCampaignLead,
) -> AppResult<CampaignView> {
    let campaign = store
        .campaigns
        .update(id, |campaign, _| {
            ensure_visible(actor, campaign)?;
            let row = find_row(campaign, row_id)?;
            if let Some(status) = req.status {
                if row.lead_id.is_some() && status != CampaignLeadStatus::Converted {
                    return Err(AppError::conflict("Contact was already converted to a lead"));
                }
                if row.lead_id.is_none() && status == CampaignLeadStatus::Converted {
                    return Err(AppError::invalid_params("Use the convert action to convert a contact"));
                }
                row.status = status;
            }
            if let Some(remark) = req.remark {
                row.remark = clean(Some(remark));
            }
            campaign.updated_at = now();
            Ok(())
        })
        .await?;
    Ok(campaign.into())
}

fn find_row<'a>(campaign: &'a mut Campaign, row_id: &str) -> AppResult<&'a mut CampaignLead> {
    campaign
        .leads
        .iter_mut()
        .find(|l| l.id == row_id)
        .ok_or_else(|| AppError::not_found("Campaign contact", row_id))
}

/// Turn a campaign contact into a pipeline lead owned by the campaign's
/// manager. Returns the new lead.
pub async fn convert_campaign_lead(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    id: &str,
    row_id: &str,
) -> AppResult<Lead> {
    let mut campaign = store.campaigns.require(id).await?;
    ensure_visible(actor, &campaign)?;
    let row = find_row(&mut campaign, row_id)?.clone();
    if row.lead_id.is_some() {
        return Err(AppError::conflict("Contact was already converted to a lead").with_details(row.id));
    }

    let at = now();
    let mut lead = Lead {
        id: new_id(),
        name: row.name.clone(),
        contact_no: row.contact_no.clone(),
        email: None,
        requirement: row.requirement.clone(),
        status: LeadStatus::New,
        referred_by: None,
        lead_source: Some(format!("campaign:{}", campaign.name)),
        project_id: None,
        assigned_to: Some(campaign.assigned_to.clone()),
        follow_up_date: None,
        campaign_id: Some(campaign.id.clone()),
        remarks: Vec::new(),
        created_by: actor.id.clone(),
        created_at: at,
        updated_at: at,
    };
    if let Some(remark) = &row.remark {
        lead.remarks.push(TimelineEntry::new(remark, actor));
    }
    let lead_id = lead.id.clone();

    // Claim the row first so a concurrent conversion loses cleanly
    store
        .campaigns
        .update(id, |campaign, _| {
            let row = find_row(campaign, row_id)?;
            if row.lead_id.is_some() {
                return Err(AppError::conflict("Contact was already converted to a lead"));
            }
            row.lead_id = Some(lead_id.clone());
            row.status = CampaignLeadStatus::Converted;
            campaign.updated_at = now();
            Ok(())
        })
        .await?;

    match leads::insert_converted(store, notifier, actor, lead).await {
        Ok(lead) => {
            tracing::info!(campaign = %id, lead = %lead.id, "Campaign contact converted");
            Ok(lead)
        }
        Err(e) => {
            // Release the claim so the conversion can be retried
            let released = store
                .campaigns
                .update(id, |campaign, _| {
                    let claimed = find_row(campaign, row_id)?;
                    claimed.lead_id = None;
                    claimed.status = row.status;
                    Ok(())
                })
                .await;
            if let Err(release) = released {
                tracing::error!("Failed to release campaign contact {}: {}", row_id, release);
            }
            Err(e)
        }
    }
}
