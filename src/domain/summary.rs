//! On-demand (date, category) report over live trades.

use super::category::Category;
use super::error::JournalError;
use super::trade::{Trade, add_pnl};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub category: Category,
    pub trades_count: i64,
    pub total_pnl: Decimal,
    pub avg_pnl: Decimal,
    pub winning_trades: i64,
    pub losing_trades: i64,
    pub best_pnl: Decimal,
    pub worst_pnl: Decimal,
}

impl SummaryRow {
    pub fn win_rate_pct(&self) -> Decimal {
        Decimal::from(self.winning_trades) * Decimal::ONE_HUNDRED / Decimal::from(self.trades_count)
    }
}

struct Group {
    count: i64,
    total: Decimal,
    wins: i64,
    losses: i64,
    best: Decimal,
    worst: Decimal,
}

impl Group {
    fn new(pnl: Decimal) -> Self {
        Self {
            count: 0,
            total: Decimal::ZERO,
            wins: 0,
            losses: 0,
            best: pnl,
            worst: pnl,
        }
    }

    fn add(&mut self, trade: &Trade) -> Result<(), JournalError> {
        self.count += 1;
        self.total = add_pnl(self.total, trade)?;
        if trade.is_win() {
            self.wins += 1;
        } else if trade.is_loss() {
            self.losses += 1;
        }
        self.best = self.best.max(trade.pnl_usd);
        self.worst = self.worst.min(trade.pnl_usd);
        Ok(())
    }
}

/// Groups trades by (date, category). Rows come back newest date first and in
/// `Category` order within a date; only groups with trades produce a row.
pub fn summarize(trades: &[Trade]) -> Result<Vec<SummaryRow>, JournalError> {
    let mut groups: BTreeMap<(Reverse<NaiveDate>, Category), Group> = BTreeMap::new();

    for trade in trades {
        groups
            .entry((Reverse(trade.trade_date), trade.category))
            .or_insert_with(|| Group::new(trade.pnl_usd))
            .add(trade)?;
    }

    let rows = groups
        .into_iter()
        .map(|((Reverse(date), category), g)| SummaryRow {
            date,
            category,
            trades_count: g.count,
            total_pnl: g.total,
            avg_pnl: g.total / Decimal::from(g.count),
            winning_trades: g.wins,
            losing_trades: g.losses,
            best_pnl: g.best,
            worst_pnl: g.worst,
        })
        .collect();
    Ok(rows)
}
