//! Behaviour patterns detected in a window of trades.

use super::category::Category;
use super::trade::Trade;
use chrono::Timelike;
use rust_decimal::Decimal;

pub const DEFAULT_LATE_NIGHT_HOUR: u32 = 22;

/// Shortest losing run worth reporting.
const MIN_LOSS_STREAK: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Share of impulse trades opened at or after `hour`.
    LateNightImpulse { share_pct: Decimal, hour: u32 },
    LossStreak { length: usize },
    /// Impulse trades placed directly after a losing trade.
    RevengeTrading { count: usize },
}

pub fn detect_patterns(trades: &[Trade], late_night_hour: u32) -> Vec<Pattern> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| (t.trade_date, t.trade_time, t.id));

    let mut patterns = Vec::new();

    let impulse: Vec<&&Trade> = ordered
        .iter()
        .filter(|t| t.category == Category::Impulse)
        .collect();
    if !impulse.is_empty() {
        let late = impulse
            .iter()
            .filter(|t| t.trade_time.hour() >= late_night_hour)
            .count();
        if late > 0 {
            patterns.push(Pattern::LateNightImpulse {
                share_pct: Decimal::from(late) * Decimal::ONE_HUNDRED
                    / Decimal::from(impulse.len()),
                hour: late_night_hour,
            });
        }
    }

    let longest = longest_loss_streak(&ordered);
    if longest >= MIN_LOSS_STREAK {
        patterns.push(Pattern::LossStreak { length: longest });
    }

    let revenge = ordered
        .windows(2)
        .filter(|w| w[0].is_loss() && w[1].category == Category::Impulse)
        .count();
    if revenge > 0 {
        patterns.push(Pattern::RevengeTrading { count: revenge });
    }

    patterns
}

fn longest_loss_streak(trades: &[&Trade]) -> usize {
    let mut current = 0;
    let mut longest = 0;
    for trade in trades {
        if trade.is_loss() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
