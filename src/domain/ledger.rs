//! Ledger operations composed over the storage ports.
//!
//! Recording validates raw fields, appends the trade, then refreshes the
//! rollup for the trade's date. Reads come straight from the trade log
//! (summaries, reports) or from the rollup cache (daily stats).

use crate::domain::category::CategoryTags;
use crate::domain::daily_stat::DailyStat;
use crate::domain::error::JournalError;
use crate::domain::summary::{SummaryRow, summarize};
use crate::domain::trade::{DateRange, Trade, TradeFields, TradeFilter};
use crate::domain::weekly_report::WeeklyReport;
use crate::ports::daily_stat_port::DailyStatPort;
use crate::ports::journal_port::JournalPort;
use crate::ports::trade_port::TradePort;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Validates and appends one trade.
///
/// A failed rollup refresh does not undo the insert: the trade log stays the
/// source of truth and the next refresh for that date catches up.
pub fn record_trade(
    store: &dyn JournalPort,
    fields: &TradeFields,
    tags: &CategoryTags,
) -> Result<Trade, JournalError> {
    let new_trade = fields.validate(tags)?;
    let trade = store.insert_trade(&new_trade)?;
    info!(
        id = trade.id,
        pair = %trade.pair,
        direction = %trade.direction,
        category = %trade.category,
        pnl = %trade.pnl_usd,
        "trade recorded"
    );

    if let Err(e) = store.refresh_daily_stat(trade.trade_date) {
        warn!(date = %trade.trade_date, error = %e, "daily stat refresh failed after insert");
    }

    Ok(trade)
}

/// Records a batch of submissions, e.g. rows read from a CSV file.
///
/// Every row is validated before the first insert, so a bad row rejects the
/// whole batch. Rows are numbered from 1. Each touched date is refreshed once.
pub fn import_trades(
    store: &dyn JournalPort,
    rows: &[TradeFields],
    tags: &CategoryTags,
) -> Result<Vec<Trade>, JournalError> {
    let validated = rows
        .iter()
        .enumerate()
        .map(|(i, fields)| {
            fields
                .validate(tags)
                .map_err(|source| JournalError::ImportRow { row: i + 1, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut trades = Vec::with_capacity(validated.len());
    for new_trade in &validated {
        trades.push(store.insert_trade(new_trade)?);
    }

    let dates: BTreeSet<NaiveDate> = trades.iter().map(|t| t.trade_date).collect();
    for date in &dates {
        if let Err(e) = store.refresh_daily_stat(*date) {
            warn!(%date, error = %e, "daily stat refresh failed after import");
        }
    }

    info!(trades = trades.len(), dates = dates.len(), "import finished");
    Ok(trades)
}

/// Cached rollup for `date`, recomputing first when `refresh` is set.
pub fn daily_stat<S: DailyStatPort + ?Sized>(
    store: &S,
    date: NaiveDate,
    refresh: bool,
) -> Result<Option<DailyStat>, JournalError> {
    if refresh {
        return store.refresh_daily_stat(date).map(Some);
    }
    let stat = store.get_daily_stat(date)?;
    if stat.is_none() {
        debug!(%date, "no cached daily stat");
    }
    Ok(stat)
}

/// Summary rows for `range`, always computed from the live trade log.
pub fn summarize_range<S: TradePort + ?Sized>(
    store: &S,
    range: DateRange,
) -> Result<Vec<SummaryRow>, JournalError> {
    let trades = store.query_trades(&TradeFilter::range(range))?;
    debug!(trades = trades.len(), "summarizing");
    summarize(&trades)
}

pub fn weekly_report<S: TradePort + ?Sized>(
    store: &S,
    range: DateRange,
    late_night_hour: u32,
) -> Result<WeeklyReport, JournalError> {
    let trades = store.query_trades(&TradeFilter::range(range))?;
    WeeklyReport::build(&trades, late_night_hour)
}
