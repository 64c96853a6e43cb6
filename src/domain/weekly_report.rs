//! Periodic performance review: metrics per category, patterns, recommendations.

use super::category::Category;
use super::error::JournalError;
use super::metrics::Metrics;
use super::patterns::{Pattern, detect_patterns};
use super::trade::Trade;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    ImpulseOutnumbersStrategy,
    /// Impulse trades lost money overall; `amount` is positive.
    ImpulseCost { amount: Decimal },
    /// Strategy trades are profitable but the overall result lags behind them.
    DisciplineIssue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyReport {
    pub total: Metrics,
    pub strategy: Metrics,
    pub impulse: Metrics,
    pub patterns: Vec<Pattern>,
    pub recommendations: Vec<Recommendation>,
}

impl WeeklyReport {
    pub fn build(trades: &[Trade], late_night_hour: u32) -> Result<Self, JournalError> {
        let total = Metrics::compute(trades, None)?;
        let strategy = Metrics::compute(trades, Some(Category::Strategy))?;
        let impulse = Metrics::compute(trades, Some(Category::Impulse))?;
        let patterns = detect_patterns(trades, late_night_hour);
        let recommendations = recommend(&total, &strategy, &impulse);

        Ok(Self {
            total,
            strategy,
            impulse,
            patterns,
            recommendations,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total.total_trades == 0
    }
}

fn recommend(total: &Metrics, strategy: &Metrics, impulse: &Metrics) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if impulse.total_trades > strategy.total_trades {
        out.push(Recommendation::ImpulseOutnumbersStrategy);
    }

    if impulse.total_pnl < Decimal::ZERO {
        out.push(Recommendation::ImpulseCost {
            amount: impulse.total_pnl.abs(),
        });
    }

    if strategy.total_pnl > Decimal::ZERO && total.total_pnl < strategy.total_pnl {
        out.push(Recommendation::DisciplineIssue);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Direction;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal_macros::dec;

    fn trade(id: i64, category: Category, pnl: Decimal) -> Trade {
        Trade {
            id,
            created_at: Utc::now(),
            trade_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            trade_time: NaiveTime::from_hms_opt(10, id as u32, 0).unwrap(),
            pair: "ETH".into(),
            direction: Direction::Short,
            entry_price: dec!(10),
            exit_price: dec!(9),
            position_size: None,
            pnl_usd: pnl,
            pnl_pct: dec!(10),
            category,
            tags: None,
            comment: None,
        }
    }

    #[test]
    fn empty_window() {
        let report = WeeklyReport::build(&[], 22).unwrap();
        assert!(report.is_empty());
        assert!(report.patterns.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn undisciplined_week() {
        let trades = vec![
            trade(1, Category::Strategy, dec!(100)),
            trade(2, Category::Impulse, dec!(-40)),
            trade(3, Category::Impulse, dec!(-20)),
        ];
        let report = WeeklyReport::build(&trades, 22).unwrap();

        assert_eq!(report.total.total_pnl, dec!(40));
        assert_eq!(report.strategy.total_trades, 1);
        assert_eq!(report.impulse.total_trades, 2);
        assert_eq!(
            report.recommendations,
            vec![
                Recommendation::ImpulseOutnumbersStrategy,
                Recommendation::ImpulseCost { amount: dec!(60) },
                Recommendation::DisciplineIssue,
            ]
        );
        assert!(report
            .patterns
            .contains(&Pattern::RevengeTrading { count: 1 }));
    }

    #[test]
    fn clean_week_has_no_recommendations() {
        let trades = vec![
            trade(1, Category::Strategy, dec!(10)),
            trade(2, Category::Strategy, dec!(15)),
        ];
        let report = WeeklyReport::build(&trades, 22).unwrap();
        assert!(report.recommendations.is_empty());
        assert_eq!(report.total.win_rate, dec!(100));
    }
}
