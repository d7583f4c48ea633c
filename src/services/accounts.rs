//! Finance ledger. Every operation here is admin only.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::access::require_admin;
use super::validate;
use crate::error::{AppError, AppResult};
use crate::format::{format_inr, matches_text, DateRange};
use crate::models::account::{CreateEntry, UpdateEntry};
use crate::models::{clean, new_id, now, AccountEntry, AccountFilter, AccountSummary, User};
use crate::store::Store;

pub fn entry_matches(entry: &AccountEntry, filter: &AccountFilter, range: Option<DateRange>) -> bool {
    if let Some(q) = &filter.q {
        if !matches_text(q, &[Some(&entry.description), Some(&entry.category)]) {
            return false;
        }
    }
    if filter.entry_type.is_some_and(|t| t != entry.entry_type) {
        return false;
    }
    if filter.mode.is_some_and(|m| m != entry.mode) {
        return false;
    }
    if let Some(category) = clean(filter.category.clone()) {
        if !entry.category.eq_ignore_ascii_case(&category) {
            return false;
        }
    }
    if let Some(project_id) = clean(filter.project_id.clone()) {
        if entry.project_id.as_deref() != Some(project_id.as_str()) {
            return false;
        }
    }
    range.map_or(true, |r| r.contains(entry.date))
}

/// Totals per type and mode plus the net balance of `entries`
pub fn summarize(entries: &[AccountEntry]) -> AccountSummary {
    let mut summary = AccountSummary::default();
    for entry in entries {
        *summary.totals_by_type.entry(entry.entry_type).or_insert(0.0) += entry.amount;
        *summary.totals_by_mode.entry(entry.mode).or_insert(0.0) += entry.amount;
        *summary.balance_by_mode.entry(entry.mode).or_insert(0.0) += entry.signed_amount();
        if entry.entry_type.sign() > 0.0 {
            summary.total_in += entry.amount;
        } else {
            summary.total_out += entry.amount;
        }
    }
    summary.net_balance = summary.total_in - summary.total_out;
    summary.entry_count = entries.len();
    summary.net_balance_formatted = format_inr(summary.net_balance);
    summary
}

async fn filtered(store: &Store, filter: &AccountFilter, today: NaiveDate) -> AppResult<Vec<AccountEntry>> {
    let range = DateRange::resolve(filter.range, filter.from, filter.to, today)
        .map_err(AppError::invalid_params)?;
    Ok(store
        .accounts
        .list()
        .await?
        .into_iter()
        .filter(|e| entry_matches(e, filter, range))
        .collect())
}

pub async fn create_entry(store: &Store, actor: &User, req: CreateEntry) -> AppResult<AccountEntry> {
    require_admin(actor)?;
    let amount = validate::positive("Amount", req.amount)?;
    let project_id = validate::project_ref(store, req.project_id).await?;

    let at = now();
    let entry = store
        .accounts
        .insert(AccountEntry {
            id: new_id(),
            date: req.date,
            amount,
            entry_type: req.entry_type,
            mode: req.mode,
            category: req.category.trim().to_string(),
            description: req.description.trim().to_string(),
            project_id,
            created_by: actor.id.clone(),
            created_at: at,
            updated_at: at,
        })
        .await?;
    tracing::info!(entry = %entry.id, kind = %entry.entry_type, "Account entry created");
    Ok(entry)
}

/// Matching entries, latest date first
pub async fn list_entries(
    store: &Store,
    actor: &User,
    filter: &AccountFilter,
    today: NaiveDate,
) -> AppResult<Vec<AccountEntry>> {
    require_admin(actor)?;
    let mut entries = filtered(store, filter, today).await?;
    entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    Ok(entries)
}

pub async fn get_entry(store: &Store, actor: &User, id: &str) -> AppResult<AccountEntry> {
    require_admin(actor)?;
    store.accounts.require(id).await
}

pub async fn update_entry(
    store: &Store,
    actor: &User,
    id: &str,
    req: UpdateEntry,
) -> AppResult<AccountEntry> {
    require_admin(actor)?;
    let amount = req.amount.map(|a| validate::positive("Amount", a)).transpose()?;
    let project_id = match req.project_id {
        Some(raw) => Some(validate::project_ref(store, Some(raw)).await?),
        None => None,
    };

    store
        .accounts
        .update(id, |entry, _| {
            if let Some(date) = req.date {
                entry.date = date;
            }
            if let Some(amount) = amount {
                entry.amount = amount;
            }
            if let Some(entry_type) = req.entry_type {
                entry.entry_type = entry_type;
            }
            if let Some(mode) = req.mode {
                entry.mode = mode;
            }
            if let Some(category) = req.category {
                entry.category = category.trim().to_string();
            }
            if let Some(description) = req.description {
                entry.description = description.trim().to_string();
            }
            if let Some(project_id) = project_id {
                entry.project_id = project_id;
            }
            entry.updated_at = now();
            Ok(())
        })
        .await
}

pub async fn delete_entry(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    require_admin(actor)?;
    store.accounts.remove(id).await?;
    tracing::info!(entry = %id, "Account entry deleted");
    Ok(())
}

pub async fn summary(
    store: &Store,
    actor: &User,
    filter: &AccountFilter,
    today: NaiveDate,
) -> AppResult<AccountSummary> {
    require_admin(actor)?;
    Ok(summarize(&filtered(store, filter, today).await?))
}

/// Distinct non-empty categories, sorted case-insensitively
pub async fn categories(store: &Store, actor: &User) -> AppResult<Vec<String>> {
    require_admin(actor)?;
    // Keyed by lowercase so "Rent" and "rent" collapse; first spelling wins
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for entry in store.accounts.list().await? {
        let category = entry.category.trim();
        if !category.is_empty() {
            seen.entry(category.to_lowercase())
                .or_insert_with(|| category.to_string());
        }
    }
    Ok(seen.into_values().collect())
}
