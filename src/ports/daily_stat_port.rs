//! Daily statistics cache port trait.

use crate::domain::daily_stat::DailyStat;
use crate::domain::error::JournalError;
use chrono::NaiveDate;

pub trait DailyStatPort {
    /// Recomputes the rollup for `date` from the trade log and upserts it, all
    /// inside one transaction. Nothing is written if any trade row is invalid.
    fn refresh_daily_stat(&self, date: NaiveDate) -> Result<DailyStat, JournalError>;

    /// The cached row, if one exists. Never recomputes.
    fn get_daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>, JournalError>;
}
