//! Lead pipeline
//!
//! A manager sees leads of projects in its scope plus leads assigned to it.
//! Leads a manager creates without an assignee are assigned to that manager.

use chrono::NaiveDate;

use super::access::{require_admin, Scope};
use super::{validate, Notifier};
use crate::error::{AppError, AppResult};
use crate::format::{matches_text, DateRange};
use crate::models::lead::{CreateLead, LeadFilter, UpdateLead};
use crate::models::{clean, new_id, now, Lead, LeadStatus, Notification, NotificationKind, TimelineEntry, User};
use crate::store::Store;

fn can_see(scope: &Scope, lead: &Lead) -> bool {
    scope.covers_project(lead.project_id.as_deref()) || scope.is_self(lead.assigned_to.as_deref())
}

/// Whether `lead` passes every criterion in `filter`
pub fn lead_matches(lead: &Lead, filter: &LeadFilter, range: Option<DateRange>) -> bool {
    if let Some(q) = &filter.q {
        let hit = matches_text(
            q,
            &[
                Some(&lead.name),
                Some(&lead.contact_no),
                Some(&lead.requirement),
                lead.referred_by.as_deref(),
                lead.lead_source.as_deref(),
            ],
        );
        if !hit {
            return false;
        }
    }
    if filter.status.is_some_and(|s| s != lead.status) {
        return false;
    }
    if let Some(source) = clean(filter.source.clone()) {
        if !lead
            .lead_source
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(&source))
        {
            return false;
        }
    }
    if let Some(project_id) = clean(filter.project_id.clone()) {
        if lead.project_id.as_deref() != Some(project_id.as_str()) {
            return false;
        }
    }
    if let Some(assigned_to) = clean(filter.assigned_to.clone()) {
        if lead.assigned_to.as_deref() != Some(assigned_to.as_str()) {
            return false;
        }
    }
    if let Some(range) = range {
        if !range.contains(lead.created_at.date_naive()) {
            return false;
        }
    }
    true
}

async fn load_visible(store: &Store, actor: &User, id: &str) -> AppResult<(Scope, Lead)> {
    let scope = Scope::load(store, actor).await?;
    let lead = store.leads.require(id).await?;
    if !can_see(&scope, &lead) {
        return Err(AppError::forbidden("Lead is outside your assigned projects"));
    }
    Ok((scope, lead))
}

async fn notify_assignment(notifier: &Notifier, store: &Store, actor: &User, lead: &Lead) {
    if let Some(assignee) = lead.assigned_to.as_deref() {
        if assignee != actor.id {
            let message = format!("{} assigned you the lead {}", actor.name, lead.name);
            notifier
                .notify(
                    store,
                    Notification::new(assignee, NotificationKind::LeadAssigned, message)
                        .for_lead(&lead.id),
                )
                .await;
        }
    }
}

pub async fn create_lead(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    req: CreateLead,
) -> AppResult<Lead> {
    let scope = Scope::load(store, actor).await?;
    let name = validate::required("Name", &req.name)?;
    let contact_no = validate::phone(&req.contact_no)?;
    let email = clean(req.email).map(|e| validate::email(&e)).transpose()?;
    let project_id = validate::project_ref(store, req.project_id).await?;
    scope.check_project(project_id.as_deref())?;
    let assigned_to = match validate::user_ref(store, req.assigned_to).await? {
        Some(user) => Some(user),
        None if !actor.is_admin() => Some(actor.id.clone()),
        None => None,
    };

    let at = now();
    let mut lead = Lead {
        id: new_id(),
        name,
        contact_no,
        email,
        requirement: req.requirement.trim().to_string(),
        status: req.status.unwrap_or_default(),
        referred_by: clean(req.referred_by),
        lead_source: clean(req.lead_source),
        project_id,
        assigned_to,
        follow_up_date: req.follow_up_date,
        campaign_id: None,
        remarks: Vec::new(),
        created_by: actor.id.clone(),
        created_at: at,
        updated_at: at,
    };
    if let Some(remark) = clean(req.remark) {
        lead.remarks.push(TimelineEntry::new(&remark, actor));
    }

    let lead = store.leads.insert(lead).await?;
    tracing::info!(lead = %lead.id, by = %actor.id, "Lead created");
    notify_assignment(notifier, store, actor, &lead).await;
    Ok(lead)
}

/// Insert an already built lead (campaign conversion)
pub(crate) async fn insert_converted(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    lead: Lead,
) -> AppResult<Lead> {
    let lead = store.leads.insert(lead).await?;
    notify_assignment(notifier, store, actor, &lead).await;
    Ok(lead)
}

/// Visible leads matching `filter`, newest first
pub async fn list_leads(
    store: &Store,
    actor: &User,
    filter: &LeadFilter,
    today: NaiveDate,
) -> AppResult<Vec<Lead>> {
    let range = DateRange::resolve(filter.range, filter.from, filter.to, today)
        .map_err(AppError::invalid_params)?;
    let scope = Scope::load(store, actor).await?;

    let mut leads: Vec<Lead> = store
        .leads
        .list()
        .await?
        .into_iter()
        .filter(|lead| can_see(&scope, lead) && lead_matches(lead, filter, range))
        .collect();
    leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(leads)
}

pub async fn get_lead(store: &Store, actor: &User, id: &str) -> AppResult<Lead> {
    load_visible(store, actor, id).await.map(|(_, lead)| lead)
}

pub async fn update_lead(
    store: &Store,
    notifier: &Notifier,
    actor: &User,
    id: &str,
    req: UpdateLead,
) -> AppResult<Lead> {
    let (scope, current) = load_visible(store, actor, id).await?;

    let name = req.name.as_deref().map(|n| validate::required("Name", n)).transpose()?;
    let contact_no = req.contact_no.as_deref().map(validate::phone).transpose()?;
    let email = match req.email {
        Some(raw) => Some(clean(Some(raw)).map(|e| validate::email(&e)).transpose()?),
        None => None,
    };
    let project_id = match req.project_id {
        Some(raw) => {
            let project_id = validate::project_ref(store, Some(raw)).await?;
            scope.check_project(project_id.as_deref())?;
            Some(project_id)
        }
        None => None,
    };
    let assigned_to = match req.assigned_to {
        Some(raw) => Some(validate::user_ref(store, Some(raw)).await?),
        None => None,
    };
    let reassigned = assigned_to
        .as_ref()
        .is_some_and(|new| new.as_deref() != current.assigned_to.as_deref());

    let lead = store
        .leads
        .update(id, |lead, _| {
            if let Some(name) = name {
                lead.name = name;
            }
            if let Some(contact_no) = contact_no {
                lead.contact_no = contact_no;
            }
            if let Some(email) = email {
                lead.email = email;
            }
            if let Some(requirement) = req.requirement {
                lead.requirement = requirement.trim().to_string();
            }
            if let Some(status) = req.status {
                lead.status = status;
            }
            if let Some(referred_by) = req.referred_by {
                lead.referred_by = clean(Some(referred_by));
            }
            if let Some(lead_source) = req.lead_source {
                lead.lead_source = clean(Some(lead_source));
            }
            if let Some(project_id) = project_id {
                lead.project_id = project_id;
            }
            if let Some(assigned_to) = assigned_to {
                lead.assigned_to = assigned_to;
            }
            if let Some(follow_up_date) = req.follow_up_date {
                lead.follow_up_date = follow_up_date;
            }
            lead.updated_at = now();
            Ok(())
        })
        .await?;

    if reassigned {
        notify_assignment(notifier, store, actor, &lead).await;
    }
    Ok(lead)
}

pub async fn update_status(
    store: &Store,
    actor: &User,
    id: &str,
    status: LeadStatus,
) -> AppResult<Lead> {
    load_visible(store, actor, id).await?;
    store
        .leads
        .update(id, |lead, _| {
            lead.status = status;
            lead.updated_at = now();
            Ok(())
        })
        .await
}

/// Append a remark to the lead's timeline
pub async fn add_remark(store: &Store, actor: &User, id: &str, text: &str) -> AppResult<Lead> {
    let text = validate::required("Remark", text)?;
    load_visible(store, actor, id).await?;
    store
        .leads
        .update(id, |lead, _| {
            lead.remarks.push(TimelineEntry::new(&text, actor));
            lead.updated_at = now();
            Ok(())
        })
        .await
}

pub async fn delete_lead(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    require_admin(actor)?;
    store.leads.remove(id).await?;
    tracing::info!(lead = %id, "Lead deleted");
    Ok(())
}
