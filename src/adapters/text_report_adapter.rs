//! Plain-text rendering for terminal output.
//!
//! `TextReportAdapter` implements `ReportPort` for the weekly review; the free
//! `render_*` functions format the tables printed by the other commands.

use crate::domain::daily_stat::DailyStat;
use crate::domain::metrics::Metrics;
use crate::domain::patterns::Pattern;
use crate::domain::summary::SummaryRow;
use crate::domain::trade::{DATE_FORMAT, TIME_FORMAT, Trade};
use crate::domain::weekly_report::{Recommendation, WeeklyReport};
use crate::ports::report_port::ReportPort;
use rust_decimal::{Decimal, RoundingStrategy};

/// Two decimals with an explicit sign, e.g. `+12.50` or `-3.00`. Halves round
/// away from zero; values that round to zero print as `+0.00`.
fn signed(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("{:.2}", rounded)
    } else {
        format!("+{:.2}", rounded.abs())
    }
}

pub struct TextReportAdapter {
    title: String,
}

impl TextReportAdapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new("Weekly trading report")
    }
}

fn metrics_block(out: &mut String, label: &str, m: &Metrics) {
    out.push_str(&format!("{label}\n"));
    out.push_str(&format!("  trades:        {}\n", m.total_trades));
    out.push_str(&format!("  win rate:      {:.1}%\n", m.win_rate));
    out.push_str(&format!("  total pnl:     ${}\n", signed(m.total_pnl)));
    if m.trades_won > 0 {
        out.push_str(&format!("  avg win:       ${}\n", signed(m.avg_win)));
    }
    if m.trades_lost > 0 {
        out.push_str(&format!("  avg loss:      ${}\n", signed(m.avg_loss)));
    }
    if let Some(pf) = m.profit_factor {
        out.push_str(&format!("  profit factor: {:.2}\n", pf));
    }
}

fn describe_pattern(p: &Pattern) -> String {
    match p {
        Pattern::LateNightImpulse { share_pct, hour } => {
            format!("{share_pct:.0}% of impulse trades opened after {hour}:00")
        }
        Pattern::LossStreak { length } => format!("losing streak of {length} trades"),
        Pattern::RevengeTrading { count } => {
            format!("{count} impulse trade(s) right after a loss")
        }
    }
}

fn describe_recommendation(r: &Recommendation) -> String {
    match r {
        Recommendation::ImpulseOutnumbersStrategy => {
            "impulse trades outnumber planned ones; review entries against your plan".into()
        }
        Recommendation::ImpulseCost { amount } => {
            format!("impulse trades cost ${amount:.2} this period")
        }
        Recommendation::DisciplineIssue => {
            "the strategy is profitable but overall results lag behind it".into()
        }
    }
}

impl ReportPort for TextReportAdapter {
    fn render(&self, report: &WeeklyReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.title));
        out.push_str(&format!("{}\n", "=".repeat(self.title.chars().count())));

        if report.is_empty() {
            out.push_str("No trades in this period.\n");
            return out;
        }

        metrics_block(&mut out, "Overall", &report.total);
        metrics_block(&mut out, "Strategy", &report.strategy);
        metrics_block(&mut out, "Impulse", &report.impulse);

        if !report.patterns.is_empty() {
            out.push_str("Patterns\n");
            for p in &report.patterns {
                out.push_str(&format!("  - {}\n", describe_pattern(p)));
            }
        }

        if !report.recommendations.is_empty() {
            out.push_str("Recommendations\n");
            for r in &report.recommendations {
                out.push_str(&format!("  - {}\n", describe_recommendation(r)));
            }
        }

        out
    }
}

pub fn render_trades(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "No trades found.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>6}  {:<10} {:<8} {:<12} {:<5} {:>12} {:>12} {:>10} {:>8}  {:<8}\n",
        "id", "date", "time", "pair", "side", "entry", "exit", "pnl $", "pnl %", "category"
    ));
    for t in trades {
        out.push_str(&format!(
            "{:>6}  {:<10} {:<8} {:<12} {:<5} {:>12} {:>12} {:>10} {:>8}  {:<8}\n",
            t.id,
            t.trade_date.format(DATE_FORMAT).to_string(),
            t.trade_time.format(TIME_FORMAT).to_string(),
            t.pair,
            t.direction.as_str(),
            t.entry_price.to_string(),
            t.exit_price.to_string(),
            signed(t.pnl_usd),
            format!("{:.2}", t.pnl_pct),
            t.category.as_str(),
        ));
        if let Some(tags) = &t.tags {
            out.push_str(&format!("        tags: {tags}\n"));
        }
        if let Some(comment) = &t.comment {
            out.push_str(&format!("        comment: {comment}\n"));
        }
    }
    out
}

pub fn render_summary(rows: &[SummaryRow]) -> String {
    if rows.is_empty() {
        return "No trades in this period.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<8} {:>6} {:>11} {:>10} {:>4} {:>4} {:>7} {:>10} {:>10}\n",
        "date", "category", "trades", "total $", "avg $", "won", "lost", "win %", "best $",
        "worst $"
    ));
    for r in rows {
        out.push_str(&format!(
            "{:<10} {:<8} {:>6} {:>11} {:>10} {:>4} {:>4} {:>7} {:>10} {:>10}\n",
            r.date.format(DATE_FORMAT).to_string(),
            r.category.as_str(),
            r.trades_count,
            signed(r.total_pnl),
            signed(r.avg_pnl),
            r.winning_trades,
            r.losing_trades,
            format!("{:.1}", r.win_rate_pct()),
            signed(r.best_pnl),
            signed(r.worst_pnl),
        ));
    }
    out
}

fn bucket_line(label: &str, trades: i64, pnl: Decimal) -> String {
    format!("  {:<9} {} trades, ${}\n", format!("{label}:"), trades, signed(pnl))
}

pub fn render_daily_stat(stat: &DailyStat) -> String {
    let t = &stat.totals;
    let mut out = format!("Daily stats for {}\n", stat.stat_date.format(DATE_FORMAT));
    out.push_str(&bucket_line("total", t.total_trades, t.total_pnl));
    out.push_str(&bucket_line("strategy", t.strategy_trades, t.strategy_pnl));
    out.push_str(&bucket_line("impulse", t.impulse_trades, t.impulse_pnl));
    if t.other_trades() > 0 {
        out.push_str(&bucket_line("other", t.other_trades(), t.other_pnl()));
    }
    out.push_str(&format!(
        "  updated:  {}\n",
        stat.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}
