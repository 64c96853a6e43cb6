//! Core domain types and logic: trades, rollups, summaries and reports.

pub mod category;
pub mod config_validation;
pub mod daily_stat;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod patterns;
pub mod summary;
pub mod trade;
pub mod weekly_report;
