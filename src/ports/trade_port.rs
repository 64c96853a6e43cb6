//! Trade store port trait.

use crate::domain::error::JournalError;
use crate::domain::trade::{NewTrade, Trade, TradeFilter};

/// Append-only trade log.
pub trait TradePort {
    /// Appends one row atomically and returns it with its id and creation time.
    fn insert_trade(&self, trade: &NewTrade) -> Result<Trade, JournalError>;

    /// Trades matching `filter`, newest trade date first, then newest insert first.
    fn query_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, JournalError>;
}
