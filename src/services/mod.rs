//! Business rules over the record store.
//!
//! Every operation takes the acting user so role gating happens in one
//! place regardless of which surface (HTTP, tests) calls it.

pub mod access;
pub mod accounts;
pub mod campaigns;
pub mod dashboard;
pub mod inventory;
pub mod leads;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod users;
mod validate;

pub use access::Scope;
pub use notifications::Notifier;
