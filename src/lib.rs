//! PropDesk: lead, task, inventory and accounts backend for commercial
//! real-estate teams.

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
