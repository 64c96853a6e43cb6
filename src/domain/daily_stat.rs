//! Per-day rollups of the trade log.

use super::category::Category;
use super::error::JournalError;
use super::trade::{Trade, add_pnl};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Counts and PnL sums for one day. Trades outside strategy/impulse are folded
/// into the totals only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTotals {
    pub total_trades: i64,
    pub strategy_trades: i64,
    pub impulse_trades: i64,
    pub total_pnl: Decimal,
    pub strategy_pnl: Decimal,
    pub impulse_pnl: Decimal,
}

impl DailyTotals {
    /// Full recompute over every trade of `date`. A trade dated elsewhere means
    /// the store handed back the wrong rows.
    pub fn compute(date: NaiveDate, trades: &[Trade]) -> Result<Self, JournalError> {
        let mut totals = DailyTotals::default();

        for trade in trades {
            if trade.trade_date != date {
                return Err(JournalError::consistency(format!(
                    "trade {} dated {} found while aggregating {}",
                    trade.id, trade.trade_date, date
                )));
            }

            totals.total_trades += 1;
            totals.total_pnl = add_pnl(totals.total_pnl, trade)?;

            match trade.category {
                Category::Strategy => {
                    totals.strategy_trades += 1;
                    totals.strategy_pnl = add_pnl(totals.strategy_pnl, trade)?;
                }
                Category::Impulse => {
                    totals.impulse_trades += 1;
                    totals.impulse_pnl = add_pnl(totals.impulse_pnl, trade)?;
                }
                Category::Unknown => {}
            }
        }

        Ok(totals)
    }

    pub fn other_trades(&self) -> i64 {
        self.total_trades - self.strategy_trades - self.impulse_trades
    }

    pub fn other_pnl(&self) -> Decimal {
        self.total_pnl
            .saturating_sub(self.strategy_pnl)
            .saturating_sub(self.impulse_pnl)
    }
}

/// Cached rollup row, unique per date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStat {
    pub stat_date: NaiveDate,
    pub totals: DailyTotals,
    pub updated_at: DateTime<Utc>,
}

impl DailyStat {
    /// Decides what a refresh should store. An unchanged recompute keeps the
    /// existing row, timestamp included, so repeated refreshes are identical.
    pub fn refreshed(
        date: NaiveDate,
        existing: Option<DailyStat>,
        totals: DailyTotals,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        match existing {
            Some(stat) if stat.totals == totals => RefreshOutcome::Unchanged(stat),
            _ => RefreshOutcome::Changed(DailyStat {
                stat_date: date,
                totals,
                updated_at: now,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Unchanged(DailyStat),
    Changed(DailyStat),
}
