//! Rentable commercial units
//!
//! Every signed-in user sees the whole inventory. Linking a unit to a
//! project, and changing a unit that belongs to a project, requires that
//! project to be in the actor's scope. Units without a project are shared.

use super::access::{require_admin, Scope};
use super::validate;
use crate::error::{AppError, AppResult};
use crate::format::{format_inr, matches_text, number_to_words};
use crate::models::inventory::{
    CreateInventory, InventoryFilter, InventoryView, RentOut, UpdateInventory,
};
use crate::models::{clean, new_id, now, InventoryItem, TimelineEntry, User};
use crate::store::Store;

impl From<InventoryItem> for InventoryView {
    fn from(item: InventoryItem) -> Self {
        let rent_formatted = format_inr(item.rent);
        let rent_in_words = number_to_words(item.rent.max(0.0).round() as u64);
        Self {
            item,
            rent_formatted,
            rent_in_words,
        }
    }
}

pub fn inventory_matches(item: &InventoryItem, filter: &InventoryFilter) -> bool {
    if let Some(q) = &filter.q {
        let hit = matches_text(
            q,
            &[
                Some(&item.location),
                Some(&item.floor),
                item.tenant_name.as_deref(),
                Some(item.property_type.as_str()),
            ],
        );
        if !hit {
            return false;
        }
    }
    if filter.property_type.is_some_and(|t| t != item.property_type) {
        return false;
    }
    if let Some(project_id) = clean(filter.project_id.clone()) {
        if item.project_id.as_deref() != Some(project_id.as_str()) {
            return false;
        }
    }
    if filter.rented.is_some_and(|r| r != item.rented) {
        return false;
    }
    let bounds = [
        (filter.min_size, filter.max_size, item.size),
        (filter.min_rent, filter.max_rent, item.rent),
    ];
    bounds.iter().all(|&(min, max, value)| {
        min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
    })
}

fn check_writable(scope: &Scope, item: &InventoryItem) -> AppResult<()> {
    scope.check_project(item.project_id.as_deref())
}

struct Money {
    rent: f64,
    advance: f64,
    security: f64,
    commission: f64,
}

fn check_money(money: Money) -> AppResult<Money> {
    Ok(Money {
        rent: validate::non_negative("Rent", money.rent)?,
        advance: validate::non_negative("Advance", money.advance)?,
        security: validate::non_negative("Security", money.security)?,
        commission: validate::non_negative("Commission", money.commission)?,
    })
}

pub async fn create_item(
    store: &Store,
    actor: &User,
    req: CreateInventory,
) -> AppResult<InventoryView> {
    let location = validate::required("Location", &req.location)?;
    let size = validate::positive("Size", req.size)?;
    let money = check_money(Money {
        rent: req.rent,
        advance: req.advance,
        security: req.security,
        commission: req.commission,
    })?;
    let project_id = validate::project_ref(store, req.project_id).await?;
    Scope::load(store, actor)
        .await?
        .check_project(project_id.as_deref())?;

    let at = now();
    let mut item = InventoryItem {
        id: new_id(),
        project_id,
        location,
        property_type: req.property_type,
        floor: req.floor.trim().to_string(),
        size,
        unit: req.unit,
        rent: money.rent,
        advance: money.advance,
        security: money.security,
        commission: money.commission,
        rented: false,
        tenant_name: None,
        tenant_contact: None,
        rented_on: None,
        notes: Vec::new(),
        created_at: at,
        updated_at: at,
    };
    if let Some(note) = clean(req.note) {
        item.notes.push(TimelineEntry::new(&note, actor));
    }

    let item = store.inventory.insert(item).await?;
    tracing::info!(item = %item.id, "Inventory item created");
    Ok(item.into())
}

/// Matching units, vacant first, then by location
pub async fn list_items(store: &Store, filter: &InventoryFilter) -> AppResult<Vec<InventoryView>> {
    let mut items: Vec<InventoryItem> = store
        .inventory
        .list()
        .await?
        .into_iter()
        .filter(|item| inventory_matches(item, filter))
        .collect();
    items.sort_by(|a, b| {
        a.rented
            .cmp(&b.rented)
            .then_with(|| a.location.to_lowercase().cmp(&b.location.to_lowercase()))
    });
    Ok(items.into_iter().map(InventoryView::from).collect())
}

pub async fn get_item(store: &Store, id: &str) -> AppResult<InventoryView> {
    store.inventory.require(id).await.map(InventoryView::from)
}

pub async fn update_item(
    store: &Store,
    actor: &User,
    id: &str,
    req: UpdateInventory,
) -> AppResult<InventoryView> {
    let location = req.location.as_deref().map(|l| validate::required("Location", l)).transpose()?;
    let size = req.size.map(|s| validate::positive("Size", s)).transpose()?;
    let rent = req.rent.map(|v| validate::non_negative("Rent", v)).transpose()?;
    let advance = req.advance.map(|v| validate::non_negative("Advance", v)).transpose()?;
    let security = req.security.map(|v| validate::non_negative("Security", v)).transpose()?;
    let commission = req.commission.map(|v| validate::non_negative("Commission", v)).transpose()?;
    let scope = Scope::load(store, actor).await?;
    let project_id = match req.project_id {
        Some(raw) => {
            let project_id = validate::project_ref(store, Some(raw)).await?;
            scope.check_project(project_id.as_deref())?;
            Some(project_id)
        }
        None => None,
    };

    let item = store
        .inventory
        .update(id, |item, _| {
            check_writable(&scope, item)?;
            if let Some(project_id) = project_id {
                item.project_id = project_id;
            }
            if let Some(location) = location {
                item.location = location;
            }
            if let Some(property_type) = req.property_type {
                item.property_type = property_type;
            }
            if let Some(floor) = req.floor {
                item.floor = floor.trim().to_string();
            }
            if let Some(size) = size {
                item.size = size;
            }
            if let Some(unit) = req.unit {
                item.unit = unit;
            }
            if let Some(rent) = rent {
                item.rent = rent;
            }
            if let Some(advance) = advance {
                item.advance = advance;
            }
            if let Some(security) = security {
                item.security = security;
            }
            if let Some(commission) = commission {
                item.commission = commission;
            }
            item.updated_at = now();
            Ok(())
        })
        .await?;
    Ok(item.into())
}

pub async fn add_note(store: &Store, actor: &User, id: &str, text: &str) -> AppResult<InventoryView> {
    let text = validate::required("Note", text)?;
    let scope = Scope::load(store, actor).await?;
    let item = store
        .inventory
        .update(id, |item, _| {
            check_writable(&scope, item)?;
            item.notes.push(TimelineEntry::new(&text, actor));
            item.updated_at = now();
            Ok(())
        })
        .await?;
    Ok(item.into())
}

/// Record a tenant. Renting an already rented unit replaces the tenant.
pub async fn mark_rented(
    store: &Store,
    actor: &User,
    id: &str,
    req: RentOut,
) -> AppResult<InventoryView> {
    let tenant_name = validate::required("Tenant name", &req.tenant_name)?;
    let tenant_contact = clean(req.tenant_contact)
        .map(|c| validate::phone(&c))
        .transpose()?;
    let scope = Scope::load(store, actor).await?;
    let item = store
        .inventory
        .update(id, |item, _| {
            check_writable(&scope, item)?;
            item.rented = true;
            item.tenant_name = Some(tenant_name);
            item.tenant_contact = tenant_contact;
            item.rented_on = req.rented_on;
            item.updated_at = now();
            Ok(())
        })
        .await?;
    tracing::info!(item = %id, "Inventory item rented");
    Ok(item.into())
}

pub async fn mark_vacant(store: &Store, actor: &User, id: &str) -> AppResult<InventoryView> {
    let scope = Scope::load(store, actor).await?;
    let item = store
        .inventory
        .update(id, |item, _| {
            check_writable(&scope, item)?;
            if !item.rented {
                return Err(AppError::conflict("Inventory item is already vacant"));
            }
            item.rented = false;
            item.tenant_name = None;
            item.tenant_contact = None;
            item.rented_on = None;
            item.updated_at = now();
            Ok(())
        })
        .await?;
    Ok(item.into())
}

pub async fn delete_item(store: &Store, actor: &User, id: &str) -> AppResult<()> {
    require_admin(actor)?;
    store.inventory.remove(id).await?;
    tracing::info!(item = %id, "Inventory item deleted");
    Ok(())
}
