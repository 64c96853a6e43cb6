//! CSV trade file adapter.
//!
//! Columns mirror the `trades` table. On import `id` and `created_at` are
//! ignored and every other column goes through normal trade validation.

use crate::domain::error::JournalError;
use crate::domain::trade::{DATE_FORMAT, TIME_FORMAT, Trade, TradeFields};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TradeCsvRecord {
    id: Option<i64>,
    created_at: Option<String>,
    trade_date: Option<String>,
    trade_time: Option<String>,
    pair: Option<String>,
    trade_type: Option<String>,
    entry_price: Option<String>,
    exit_price: Option<String>,
    position_size: Option<String>,
    pnl_usd: Option<String>,
    pnl_pct: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    comment: Option<String>,
}

impl From<&Trade> for TradeCsvRecord {
    fn from(t: &Trade) -> Self {
        Self {
            id: Some(t.id),
            created_at: Some(t.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
            trade_date: Some(t.trade_date.format(DATE_FORMAT).to_string()),
            trade_time: Some(t.trade_time.format(TIME_FORMAT).to_string()),
            pair: Some(t.pair.clone()),
            trade_type: Some(t.direction.as_str().to_string()),
            entry_price: Some(t.entry_price.to_string()),
            exit_price: Some(t.exit_price.to_string()),
            position_size: t.position_size.map(|d| d.to_string()),
            pnl_usd: Some(t.pnl_usd.to_string()),
            pnl_pct: Some(t.pnl_pct.to_string()),
            category: Some(t.category.as_str().to_string()),
            tags: t.tags.clone(),
            comment: t.comment.clone(),
        }
    }
}

impl From<TradeCsvRecord> for TradeFields {
    fn from(r: TradeCsvRecord) -> Self {
        Self {
            trade_date: r.trade_date.unwrap_or_default(),
            trade_time: r.trade_time.unwrap_or_default(),
            pair: r.pair.unwrap_or_default(),
            trade_type: r.trade_type.unwrap_or_default(),
            entry_price: r.entry_price.unwrap_or_default(),
            exit_price: r.exit_price.unwrap_or_default(),
            position_size: r.position_size,
            pnl_usd: r.pnl_usd.unwrap_or_default(),
            pnl_pct: r.pnl_pct,
            category: r.category,
            tags: r.tags,
            comment: r.comment,
        }
    }
}

fn csv_err(e: csv::Error) -> JournalError {
    JournalError::Csv {
        reason: e.to_string(),
    }
}

pub fn write_trades<W: Write>(writer: W, trades: &[Trade]) -> Result<(), JournalError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for trade in trades {
        wtr.serialize(TradeCsvRecord::from(trade)).map_err(csv_err)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_trade_fields<R: Read>(reader: R) -> Result<Vec<TradeFields>, JournalError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize::<TradeCsvRecord>() {
        rows.push(result.map_err(csv_err)?.into());
    }
    Ok(rows)
}

/// A trade CSV file on disk.
pub struct CsvTradeFile {
    path: PathBuf,
}

impl CsvTradeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn export(&self, trades: &[Trade]) -> Result<(), JournalError> {
        let file = File::create(&self.path)?;
        write_trades(file, trades)?;
        debug!(path = %self.path.display(), rows = trades.len(), "wrote csv");
        Ok(())
    }

    pub fn read(&self) -> Result<Vec<TradeFields>, JournalError> {
        let file = File::open(&self.path)?;
        let rows = read_trade_fields(file)?;
        debug!(path = %self.path.display(), rows = rows.len(), "read csv");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::{Category, CategoryTags};
    use crate::domain::trade::Direction;
    use chrono::{NaiveDate, NaiveTime, SubsecRound, Utc};
    use rust_decimal_macros::dec;

    fn trade() -> Trade {
        Trade {
            id: 4,
            created_at: Utc::now().trunc_subsecs(6),
            trade_date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            trade_time: NaiveTime::from_hms_opt(23, 5, 0).unwrap(),
            pair: "SOLUSDT".into(),
            direction: Direction::Short,
            entry_price: dec!(150.25),
            exit_price: dec!(151.00),
            position_size: None,
            pnl_usd: dec!(-7.50),
            pnl_pct: dec!(-0.5),
            category: Category::Impulse,
            tags: Some("фомо, tilt".into()),
            comment: Some("chased, \"quoted\"".into()),
        }
    }

    #[test]
    fn exported_rows_import_as_the_same_trade() {
        let original = trade();
        let mut buf = Vec::new();
        write_trades(&mut buf, std::slice::from_ref(&original)).unwrap();

        let rows = read_trade_fields(buf.as_slice()).unwrap();
        assert_eq!(rows.len(), 1);
        let validated = rows[0].validate(&CategoryTags::default()).unwrap();
        assert_eq!(validated, original.to_new_trade());
    }

    #[test]
    fn header_only_file_is_empty() {
        let mut buf = Vec::new();
        write_trades(&mut buf, &[]).unwrap();
        assert!(read_trade_fields(buf.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn import_accepts_subset_of_columns() {
        let data = "trade_date,trade_time,pair,trade_type,entry_price,exit_price,pnl_usd,tags\n\
                    2024-01-01,09:30,eth,лонг,3000,3030,+15,план\n";
        let rows = read_trade_fields(data.as_bytes()).unwrap();
        assert_eq!(rows[0].pnl_pct, None);
        assert_eq!(rows[0].category, None);

        let trade = rows[0].validate(&CategoryTags::default()).unwrap();
        assert_eq!(trade.pair, "ETH");
        assert_eq!(trade.direction, Direction::Long);
        assert_eq!(trade.pnl_pct, dec!(1.00));
        assert_eq!(trade.category, Category::Strategy);
    }

    #[test]
    fn missing_required_column_fails_validation() {
        let data = "trade_date,pair\n2024-01-01,BTC\n";
        let rows = read_trade_fields(data.as_bytes()).unwrap();
        assert!(rows[0].validate(&CategoryTags::default()).is_err());
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let data = "trade_date,pair\n2024-01-01,BTC,extra\n";
        assert!(matches!(
            read_trade_fields(data.as_bytes()),
            Err(JournalError::Csv { .. })
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = CsvTradeFile::new(dir.path().join("trades.csv"));
        file.export(&[trade()]).unwrap();
        assert_eq!(file.read().unwrap().len(), 1);
    }

    #[test]
    fn reading_missing_file_is_io_error() {
        let file = CsvTradeFile::new("/nonexistent/dir/trades.csv");
        assert!(matches!(file.read(), Err(JournalError::Io(_))));
    }
}
