use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::TimelineEntry;
use crate::store::Record;

string_enum! {
    pub enum PropertyType {
        Shop => "shop",
        Office => "office",
        Showroom => "showroom",
        Warehouse => "warehouse",
        Land => "land",
        Other => "other",
    }
}

string_enum! {
    pub enum AreaUnit {
        SqFt => "sqFt",
        SqYd => "sqYd",
        SqM => "sqM",
        Acre => "acre",
    }
}

/// A commercial unit available for rent
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub location: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub floor: String,
    pub size: f64,
    pub unit: AreaUnit,
    #[serde(default)]
    pub rent: f64,
    #[serde(default)]
    pub advance: f64,
    #[serde(default)]
    pub security: f64,
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub rented: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rented_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for InventoryItem {
    const COLLECTION: &'static str = "inventory";
    const KIND: &'static str = "Inventory item";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Inventory item with display-ready money fields
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub rent_formatted: String,
    pub rent_in_words: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventory {
    pub project_id: Option<String>,
    pub location: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub floor: String,
    pub size: f64,
    pub unit: AreaUnit,
    #[serde(default)]
    pub rent: f64,
    #[serde(default)]
    pub advance: f64,
    #[serde(default)]
    pub security: f64,
    #[serde(default)]
    pub commission: f64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventory {
    pub project_id: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub floor: Option<String>,
    pub size: Option<f64>,
    pub unit: Option<AreaUnit>,
    pub rent: Option<f64>,
    pub advance: Option<f64>,
    pub security: Option<f64>,
    pub commission: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RentOut {
    pub tenant_name: String,
    pub tenant_contact: Option<String>,
    pub rented_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilter {
    /// Text over location, floor, tenant and property type
    pub q: Option<String>,
    pub property_type: Option<PropertyType>,
    pub project_id: Option<String>,
    pub rented: Option<bool>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
}
