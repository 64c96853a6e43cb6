//! Combined storage port implemented by each backend.

use crate::domain::error::JournalError;
use crate::ports::daily_stat_port::DailyStatPort;
use crate::ports::trade_port::TradePort;

pub trait JournalPort: TradePort + DailyStatPort {
    /// Creates tables and indices if they do not exist yet.
    fn initialize_schema(&self) -> Result<(), JournalError>;
}
