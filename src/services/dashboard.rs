use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::access::Scope;
use super::{accounts, notifications, tasks};
use crate::error::AppResult;
use crate::format::{format_inr, DateRange};
use crate::models::dashboard::InventoryStats;
use crate::models::task::TaskFilter;
use crate::models::{DashboardSummary, InventoryItem, Lead, User};
use crate::store::Store;

pub fn inventory_stats(items: &[InventoryItem]) -> InventoryStats {
    let rented: Vec<&InventoryItem> = items.iter().filter(|i| i.rented).collect();
    let monthly_rent_roll: f64 = rented.iter().map(|i| i.rent).sum();
    InventoryStats {
        total: items.len(),
        rented: rented.len(),
        vacant: items.len() - rented.len(),
        monthly_rent_roll,
        monthly_rent_roll_formatted: format_inr(monthly_rent_roll),
    }
}

/// Open leads with a follow-up date on or before `today`
fn follow_ups_due(leads: &[Lead], today: NaiveDate) -> usize {
    leads
        .iter()
        .filter(|l| !l.status.is_closed() && l.follow_up_date.is_some_and(|d| d <= today))
        .count()
}

pub async fn summary(store: &Store, actor: &User, today: NaiveDate) -> AppResult<DashboardSummary> {
    let scope = Scope::load(store, actor).await?;
    let leads: Vec<Lead> = store
        .leads
        .list()
        .await?
        .into_iter()
        .filter(|l| {
            scope.covers_project(l.project_id.as_deref()) || scope.is_self(l.assigned_to.as_deref())
        })
        .collect();

    let mut leads_by_status = BTreeMap::new();
    for lead in &leads {
        *leads_by_status.entry(lead.status).or_insert(0) += 1;
    }

    let visible_tasks = tasks::list_tasks(store, actor, &TaskFilter::default()).await?;
    let mut tasks_by_status = BTreeMap::new();
    for task in &visible_tasks {
        *tasks_by_status.entry(task.status).or_insert(0) += 1;
    }
    let mut my_open_tasks: Vec<_> = visible_tasks
        .into_iter()
        .filter(|t| t.status.is_open() && scope.is_self(t.assigned_to.as_deref()))
        .collect();
    // Soonest due first; undated tasks last
    my_open_tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.number));

    let inventory = inventory_stats(&store.inventory.list().await?);
    let unread_notifications = notifications::unread_count(store, actor).await?.unread;

    let accounts_this_month = if actor.is_admin() {
        let month = DateRange::month_of(today);
        let entries: Vec<_> = store
            .accounts
            .list()
            .await?
            .into_iter()
            .filter(|e| month.contains(e.date))
            .collect();
        Some(accounts::summarize(&entries))
    } else {
        None
    };

    Ok(DashboardSummary {
        leads_by_status,
        total_leads: leads.len(),
        follow_ups_due: follow_ups_due(&leads, today),
        tasks_by_status,
        my_open_tasks,
        inventory,
        unread_notifications,
        accounts_this_month,
    })
}
