//! Entity shapes shared by the store, services and HTTP API.
//!
//! Every type here is exported to TypeScript (`bindings/`) for the web client.

/// Declares a lower camelCase string enum with `Display`, `FromStr` and
/// an `ALL` list in declaration order.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
                 serde::Serialize, serde::Deserialize, ts_rs::TS)]
        #[ts(export)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| format!("Invalid {}: {}", stringify!($name), s))
            }
        }
    };
}

pub(crate) use string_enum;

pub mod account;
pub mod campaign;
pub mod dashboard;
pub mod inventory;
pub mod lead;
pub mod notification;
pub mod project;
pub mod task;
pub mod timeline;
pub mod user;

pub use account::{AccountEntry, AccountFilter, AccountSummary, EntryType, PaymentMode};
pub use campaign::{Campaign, CampaignLead, CampaignLeadStatus, CampaignStatus};
pub use dashboard::DashboardSummary;
pub use inventory::{AreaUnit, InventoryItem, PropertyType};
pub use lead::{Lead, LeadStatus};
pub use notification::{Notification, NotificationKind};
pub use project::Project;
pub use task::{Task, TaskStatus};
pub use timeline::{Comment, CommentThread, TimelineEntry};
pub use user::{Role, User, UserProfile};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Deserialize a patch field where an explicit `null` clears the value:
/// absent is `None`, `null` is `Some(None)`. Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Trim an optional text field; blank values become `None`
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trips_through_text() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), *status);
        }
        assert_eq!("SITEVISIT".parse::<LeadStatus>().unwrap(), LeadStatus::SiteVisit);
        assert!("archived".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_enum_serde_matches_display() {
        let json = serde_json::to_string(&EntryType::IncomingLoan).unwrap();
        assert_eq!(json, format!("\"{}\"", EntryType::IncomingLoan));
    }

    #[test]
    fn test_nullable_patch_fields() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "nullable")]
            due: Option<Option<chrono::NaiveDate>>,
        }
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.due, None);
        let cleared: Patch = serde_json::from_str(r#"{"due":null}"#).unwrap();
        assert_eq!(cleared.due, Some(None));
        let set: Patch = serde_json::from_str(r#"{"due":"2026-05-01"}"#).unwrap();
        assert_eq!(set.due, Some(chrono::NaiveDate::from_ymd_opt(2026, 5, 1)));
    }

    #[test]
    fn test_clean_drops_blank() {
        assert_eq!(clean(Some("  ".into())), None);
        assert_eq!(clean(Some(" x ".into())), Some("x".into()));
        assert_eq!(clean(None), None);
    }
}
