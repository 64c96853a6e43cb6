//! Port traits: the boundary between the ledger domain and storage/config/reporting.

pub mod config_port;
pub mod daily_stat_port;
pub mod journal_port;
pub mod report_port;
pub mod trade_port;
