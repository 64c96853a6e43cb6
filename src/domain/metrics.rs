//! Performance metrics over a set of trades.

use super::category::Category;
use super::error::JournalError;
use super::trade::{Trade, add_pnl};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    /// Percentage of winning trades, 0–100.
    pub win_rate: Decimal,
    pub total_pnl: Decimal,
    pub avg_win: Decimal,
    /// Mean of losing PnL values; negative or zero.
    pub avg_loss: Decimal,
    /// Gross wins over gross losses; `None` when nothing was lost.
    pub profit_factor: Option<Decimal>,
}

impl Metrics {
    /// Fails with a consistency error when a PnL sum or the profit factor
    /// leaves the `Decimal` range.
    pub fn compute(trades: &[Trade], category: Option<Category>) -> Result<Self, JournalError> {
        let mut metrics = Metrics::default();
        let mut total_wins = Decimal::ZERO;
        let mut total_losses = Decimal::ZERO;

        for trade in trades
            .iter()
            .filter(|t| category.is_none_or(|c| t.category == c))
        {
            let pnl = trade.pnl_usd;
            metrics.total_trades += 1;
            metrics.total_pnl = add_pnl(metrics.total_pnl, trade)?;
            if pnl > Decimal::ZERO {
                metrics.trades_won += 1;
                total_wins = add_pnl(total_wins, trade)?;
            } else if pnl < Decimal::ZERO {
                metrics.trades_lost += 1;
                total_losses = add_pnl(total_losses, trade)?;
            }
        }

        if metrics.total_trades > 0 {
            metrics.win_rate = Decimal::from(metrics.trades_won) * Decimal::ONE_HUNDRED
                / Decimal::from(metrics.total_trades);
        }

        if metrics.trades_won > 0 {
            metrics.avg_win = total_wins / Decimal::from(metrics.trades_won);
        }

        if metrics.trades_lost > 0 {
            metrics.avg_loss = total_losses / Decimal::from(metrics.trades_lost);
            let factor = total_wins.checked_div(total_losses.abs()).ok_or_else(|| {
                JournalError::consistency(format!(
                    "profit factor out of range ({total_wins} / {})",
                    total_losses.abs()
                ))
            })?;
            metrics.profit_factor = Some(factor);
        }

        Ok(metrics)
    }
}
